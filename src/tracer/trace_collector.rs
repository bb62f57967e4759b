//! Scoped installation of the tracing line hook
//!
//! [`TraceCollector`] is the line hook that turns dispatched frames into
//! [`TraceRecord`]s: it filters by location, serializes locals, drops
//! consecutive duplicates and appends the rest to its recorder.
//! [`TraceCollector::open_scope`] installs it in the thread's hook slot and
//! returns a [`TraceScope`] guard that puts the previous hook back on every
//! exit path, including a panic unwinding through the traced block.
//!
//! Only one scope may be open per thread. Opening a second one fails with
//! [`TracerError::ScopeAlreadyActive`].

use super::frame::{Frame, MODULE_SENTINEL};
use super::hook_slot::{self, HookControl, LineHook};
use super::location_filter::LocationFilter;
use super::state_deduplicator::StateDeduplicator;
use super::trace_record::TraceRecord;
use super::trace_recorder::{RecordCallback, TraceRecorder};
use super::value_serializer::ValueSerializer;
use crate::config::TracerConfig;
use crate::error::{Result, TracerError};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::cell::Cell;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

thread_local! {
    static SCOPE_OPEN: Cell<bool> = const { Cell::new(false) };
}

/// Line hook that records workspace lines into a trace buffer
pub struct TraceCollector {
    filter: LocationFilter,
    serializer: ValueSerializer,
    enabled: AtomicBool,
    recorder: Arc<TraceRecorder>,
    deduplicator: Mutex<StateDeduplicator>,
}

impl TraceCollector {
    /// Create a collector for the given configuration
    pub fn new(config: &TracerConfig) -> Self {
        Self::build(config, None)
    }

    /// Create a collector that also reports every appended record to `callback`
    ///
    /// The callback runs on the traced thread, inside the line hook. Lines it
    /// executes itself are not traced.
    pub fn with_callback(config: &TracerConfig, callback: RecordCallback) -> Self {
        Self::build(config, Some(callback))
    }

    /// Create a collector configured from the process environment
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(&TracerConfig::from_env()?))
    }

    fn build(config: &TracerConfig, callback: Option<RecordCallback>) -> Self {
        Self {
            filter: LocationFilter::from_config(config),
            serializer: ValueSerializer::new(config.max_value_len),
            enabled: AtomicBool::new(false),
            recorder: Arc::new(TraceRecorder::new(callback)),
            deduplicator: Mutex::new(StateDeduplicator::new()),
        }
    }

    pub fn workspace_root(&self) -> &Path {
        self.filter.workspace_root()
    }

    /// Whether a scope opened by this collector is currently collecting
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Reader over this collector's current (or most recent) trace
    pub fn reader(&self) -> TraceReader {
        TraceReader {
            recorder: Arc::clone(&self.recorder),
        }
    }

    /// Start collecting on the current thread
    ///
    /// Clears the buffer and the remembered state, saves whatever hook is
    /// installed, and installs this collector in its place. The saved hook
    /// receives no lines until the returned scope closes.
    pub fn open_scope(self: &Arc<Self>) -> Result<TraceScope> {
        if SCOPE_OPEN.with(Cell::get) {
            return Err(TracerError::ScopeAlreadyActive);
        }

        self.recorder.clear();
        self.deduplicator.lock().reset();
        self.enabled.store(true, Ordering::SeqCst);

        let installed: Arc<dyn LineHook> = Arc::clone(self) as Arc<dyn LineHook>;
        let previous = hook_slot::set_line_hook(Some(Arc::clone(&installed)));
        SCOPE_OPEN.with(|open| open.set(true));

        debug!(
            workspace = %self.workspace_root().display(),
            replaced_hook = previous.is_some(),
            "Opened trace scope"
        );

        Ok(TraceScope {
            collector: Arc::clone(self),
            installed,
            previous,
            released: false,
            _thread_bound: PhantomData,
        })
    }

    fn capture(&self, frame: &Frame<'_>) {
        let Some(file) = self.filter.relative_path(frame.file) else {
            return;
        };

        let mut locals = IndexMap::with_capacity(frame.locals.len());
        for local in frame.locals {
            match panic::catch_unwind(AssertUnwindSafe(|| self.serializer.serialize(&local.value))) {
                Ok(text) => {
                    locals.insert(local.name.to_string(), text);
                }
                Err(_) => debug!(name = local.name, line = frame.line, "Omitting local"),
            }
        }

        let function = if frame.function.is_empty() {
            MODULE_SENTINEL
        } else {
            frame.function
        };

        if !self.deduplicator.lock().is_new_state(frame.line, function, &locals) {
            return;
        }

        self.recorder.record(TraceRecord {
            file,
            function: function.to_string(),
            line: frame.line,
            locals,
        });
    }
}

impl LineHook for TraceCollector {
    fn on_line(&self, frame: &Frame<'_>) -> HookControl {
        if self.is_enabled()
            && panic::catch_unwind(AssertUnwindSafe(|| self.capture(frame))).is_err()
        {
            warn!(file = frame.file, line = frame.line, "Trace capture failed, line skipped");
        }
        HookControl::Continue
    }
}

/// Cloneable read access to a collector's trace
#[derive(Clone)]
pub struct TraceReader {
    recorder: Arc<TraceRecorder>,
}

impl TraceReader {
    /// Owned copy of the records captured so far
    pub fn snapshot(&self) -> Vec<TraceRecord> {
        self.recorder.snapshot()
    }

    /// Owned copy of the last `n` records
    pub fn last_n(&self, n: usize) -> Vec<TraceRecord> {
        self.recorder.last_n(n)
    }

    pub fn len(&self) -> usize {
        self.recorder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorder.is_empty()
    }
}

/// Guard for an open trace scope
///
/// Dropping the guard closes the scope. The guard is tied to the thread that
/// opened it because the hook slot it restores is per thread.
#[must_use = "the trace scope closes as soon as the guard is dropped"]
pub struct TraceScope {
    collector: Arc<TraceCollector>,
    installed: Arc<dyn LineHook>,
    previous: Option<Arc<dyn LineHook>>,
    released: bool,
    _thread_bound: PhantomData<Rc<()>>,
}

impl TraceScope {
    pub fn reader(&self) -> TraceReader {
        self.collector.reader()
    }

    /// Owned copy of the records captured so far
    pub fn snapshot(&self) -> Vec<TraceRecord> {
        self.collector.recorder.snapshot()
    }

    /// Zero-argument accessor returning a fresh snapshot on every call
    ///
    /// The accessor stays usable after the scope closes; it then returns the
    /// final trace until the collector opens its next scope.
    pub fn accessor(&self) -> impl Fn() -> Vec<TraceRecord> + Send + Sync + 'static {
        let reader = self.reader();
        move || reader.snapshot()
    }

    /// Close the scope and return the final trace
    ///
    /// Fails with [`TracerError::HookDisplaced`] when something replaced this
    /// scope's hook while it was open. The saved hook is restored either way.
    pub fn close(mut self) -> Result<Vec<TraceRecord>> {
        self.release()?;
        Ok(self.collector.recorder.snapshot())
    }

    fn release(&mut self) -> Result<()> {
        self.released = true;
        self.collector.enabled.store(false, Ordering::SeqCst);

        let displaced = hook_slot::set_line_hook(self.previous.take());
        SCOPE_OPEN.with(|open| open.set(false));

        let intact = displaced.as_ref().is_some_and(|hook| Arc::ptr_eq(hook, &self.installed));
        debug!(records = self.collector.recorder.len(), "Closed trace scope");

        if intact {
            Ok(())
        } else {
            Err(TracerError::HookDisplaced)
        }
    }
}

impl Drop for TraceScope {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.release() {
            warn!("Trace scope closed with a lifecycle violation: {}", e);
        }
    }
}

/// Open a trace scope on a fresh collector configured from the environment
pub fn collect_trace() -> Result<TraceScope> {
    let collector = Arc::new(TraceCollector::from_env()?);
    collector.open_scope()
}

/// Run `block` inside a trace scope and return its result with the trace
///
/// If `block` panics the previous hook is still restored before the panic
/// continues.
pub fn trace_block<R>(block: impl FnOnce() -> R) -> Result<(R, Vec<TraceRecord>)> {
    let scope = collect_trace()?;
    let result = block();
    let trace = scope.close()?;
    Ok((result, trace))
}
