//! The record captured for one traced step

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One observed execution step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Source path relative to the workspace root
    pub file: String,
    /// Enclosing function name, or `<module>`
    pub function: String,
    /// 1-based source line
    pub line: u32,
    /// Serialized locals in capture order
    pub locals: IndexMap<String, String>,
}

impl TraceRecord {
    /// Format the record as a single table row: `line | function | a=1, b=2`.
    pub fn printable_summary(&self) -> String {
        let locals = self
            .locals
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(", ");

        format!("{:4} | {:<18} | {}", self.line, self.function, locals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TraceRecord {
        let mut locals = IndexMap::new();
        locals.insert("low".to_string(), "0".to_string());
        locals.insert("arr".to_string(), "Vec<i32>([2, 1])".to_string());

        TraceRecord {
            file: "demos/quicksort.rs".to_string(),
            function: "quicksort".to_string(),
            line: 12,
            locals,
        }
    }

    #[test]
    fn test_printable_summary() {
        assert_eq!(
            record().printable_summary(),
            "  12 | quicksort          | low=0, arr=Vec<i32>([2, 1])"
        );
    }

    #[test]
    fn test_printable_summary_without_locals() {
        let mut record = record();
        record.locals.clear();
        assert_eq!(record.printable_summary(), "  12 | quicksort          | ");
    }

    #[test]
    fn test_serializes_locals_in_capture_order() {
        let json = serde_json::to_string(&record()).unwrap();
        let low = json.find("\"low\"").unwrap();
        let arr = json.find("\"arr\"").unwrap();
        assert!(low < arr);
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{"file":"src/lib.rs","function":"<module>","line":1,"locals":{"x":"1"}}"#;
        let record: TraceRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.function, "<module>");
        assert_eq!(record.locals.get("x").map(String::as_str), Some("1"));
    }
}
