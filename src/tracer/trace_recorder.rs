//! Ordered trace buffer with snapshot access
//!
//! The recorder is append-only while a scope is open. Readers only ever get
//! owned copies, so nothing they hold changes when the buffer does.

use super::trace_record::TraceRecord;
use parking_lot::Mutex;
use std::sync::Arc;

/// Type alias for record callback functions
pub type RecordCallback = Arc<dyn Fn(&TraceRecord) + Send + Sync>;

/// Buffer of trace records for the active (or most recent) scope
pub struct TraceRecorder {
    records: Mutex<Vec<TraceRecord>>,
    on_record_callback: Option<RecordCallback>,
}

impl TraceRecorder {
    /// Create a new recorder
    ///
    /// # Arguments
    ///
    /// * `on_record_callback` - Optional callback invoked after each record is appended
    pub fn new(on_record_callback: Option<RecordCallback>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            on_record_callback,
        }
    }

    /// Append a record
    pub fn record(&self, entry: TraceRecord) {
        match &self.on_record_callback {
            Some(callback) => {
                self.records.lock().push(entry.clone());
                callback(&entry);
            }
            None => self.records.lock().push(entry),
        }
    }

    /// Owned copy of every record, in capture order
    pub fn snapshot(&self) -> Vec<TraceRecord> {
        self.records.lock().clone()
    }

    /// Owned copy of the last `n` records
    pub fn last_n(&self, n: usize) -> Vec<TraceRecord> {
        let records = self.records.lock();
        let start = records.len().saturating_sub(n);
        records[start..].to_vec()
    }

    /// Drop every record
    pub fn clear(&self) {
        self.records.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new(None)
    }
}
