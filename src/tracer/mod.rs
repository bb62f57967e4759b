//! Line-level execution tracing
//!
//! The tracer records, for every instrumented line executed inside a trace
//! scope, the source file, the enclosing function, the line number and a
//! printable snapshot of the locals listed at that line.
//!
//! # Architecture
//!
//! - **hook_slot**: the per-thread slot holding the active [`LineHook`], and
//!   the dispatch entry point used by [`trace_line!`](crate::trace_line)
//! - **LocationFilter**: keeps only files under the workspace root, skipping
//!   registry, git, toolchain and vendored sources
//! - **ValueSerializer**: total, bounded rendering of captured values
//! - **StateDeduplicator**: collapses consecutive identical states
//! - **TraceRecorder**: append-only buffer handing out owned snapshots
//! - **TraceCollector**: the line hook tying the above together, installed
//!   for the lifetime of a [`TraceScope`]
//! - **NullHook**: a line hook that ignores every line
//!
//! # Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tracebuster::trace_line;
//! use tracebuster::tracer::TraceCollector;
//! use tracebuster::TracerConfig;
//!
//! fn double(n: i32) -> i32 {
//!     let result = n * 2;
//!     trace_line!(n, result);
//!     result
//! }
//!
//! let collector = Arc::new(TraceCollector::new(&TracerConfig::new(env!("CARGO_MANIFEST_DIR"))));
//! let scope = collector.open_scope().unwrap();
//! double(21);
//! let trace = scope.close().unwrap();
//!
//! for record in &trace {
//!     println!("{}", record.printable_summary());
//! }
//! ```
//!
//! # Usage constraints
//!
//! One scope per thread at a time. A scope only sees lines executed on the
//! thread that opened it, and an observer installed before the scope
//! receives no lines until the scope closes.

pub mod frame;
pub mod hook_slot;
pub mod location_filter;
pub mod null_hook;
pub mod state_deduplicator;
pub mod trace_collector;
pub mod trace_record;
pub mod trace_recorder;
pub mod value_serializer;

// Re-export main types
pub use frame::{Captured, Frame, Local, Scalar, TraceScalar, MODULE_SENTINEL};
pub use hook_slot::{HookControl, LineHook};
pub use location_filter::LocationFilter;
pub use null_hook::NullHook;
pub use state_deduplicator::StateDeduplicator;
pub use trace_collector::{collect_trace, trace_block, TraceCollector, TraceReader, TraceScope};
pub use trace_record::TraceRecord;
pub use trace_recorder::{RecordCallback, TraceRecorder};
pub use value_serializer::{ValueSerializer, UNPRINTABLE};
