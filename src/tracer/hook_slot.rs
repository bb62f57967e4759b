//! The active line hook slot
//!
//! Each thread has exactly one slot holding the [`LineHook`] that receives
//! every [`Frame`] dispatched by `trace_line!` on that thread. Installing a
//! hook returns the one it replaced so callers can put it back later.

use super::frame::Frame;
use std::cell::{Cell, RefCell};
use std::sync::Arc;

/// What the slot should do with a hook after it handled a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookControl {
    /// Keep the hook installed for the next line.
    Continue,
    /// Remove the hook from the slot.
    Detach,
}

/// Observer invoked once per executed, instrumented line.
pub trait LineHook: Send + Sync {
    fn on_line(&self, frame: &Frame<'_>) -> HookControl;
}

thread_local! {
    static ACTIVE_HOOK: RefCell<Option<Arc<dyn LineHook>>> = const { RefCell::new(None) };
    static DISPATCHING: Cell<bool> = const { Cell::new(false) };
}

/// Install `hook` (or clear the slot with `None`), returning the previous hook.
pub fn set_line_hook(hook: Option<Arc<dyn LineHook>>) -> Option<Arc<dyn LineHook>> {
    ACTIVE_HOOK.with(|slot| slot.replace(hook))
}

/// The hook currently installed on this thread.
pub fn line_hook() -> Option<Arc<dyn LineHook>> {
    ACTIVE_HOOK.with(|slot| slot.borrow().clone())
}

/// Whether any hook is installed on this thread.
pub fn is_active() -> bool {
    ACTIVE_HOOK.with(|slot| slot.borrow().is_some())
}

/// Whether `hook` is the one currently installed on this thread.
pub fn is_installed(hook: &Arc<dyn LineHook>) -> bool {
    ACTIVE_HOOK.with(|slot| slot.borrow().as_ref().is_some_and(|h| Arc::ptr_eq(h, hook)))
}

struct DispatchGuard;

impl DispatchGuard {
    fn enter() -> Option<Self> {
        DISPATCHING.with(|flag| {
            if flag.get() {
                None
            } else {
                flag.set(true);
                Some(DispatchGuard)
            }
        })
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCHING.with(|flag| flag.set(false));
    }
}

/// Deliver `frame` to the installed hook.
///
/// Lines executed while a hook is already running on this thread are not
/// delivered.
pub fn dispatch(frame: &Frame<'_>) {
    let Some(_guard) = DispatchGuard::enter() else {
        return;
    };
    let Some(hook) = line_hook() else {
        return;
    };

    if hook.on_line(frame) == HookControl::Detach {
        ACTIVE_HOOK.with(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.as_ref().is_some_and(|h| Arc::ptr_eq(h, &hook)) {
                *slot = None;
            }
        });
    }
}
