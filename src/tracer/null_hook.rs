//! Null line hook following the Null Object Pattern
//!
//! [`NullHook`] accepts every line and records nothing. Installing it keeps
//! the slot occupied without any capture cost, which is useful as a
//! placeholder observer.

use super::frame::Frame;
use super::hook_slot::{HookControl, LineHook};

/// A line hook that silently discards every frame
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHook;

impl NullHook {
    /// Create a new null hook
    pub fn new() -> Self {
        Self
    }
}

impl LineHook for NullHook {
    fn on_line(&self, _frame: &Frame<'_>) -> HookControl {
        HookControl::Continue
    }
}
