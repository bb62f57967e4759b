#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod tracer;

pub use config::TracerConfig;
pub use error::{Result, TracerError};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::TracerConfig;
    pub use crate::error::{Result, TracerError};
    pub use crate::trace_line;
    pub use crate::tracer::{
        collect_trace, trace_block, LineHook, TraceCollector, TraceReader, TraceRecord, TraceScope,
    };
}
