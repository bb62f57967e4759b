//! Suppression of consecutive identical states

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct StateKey {
    line: u32,
    function: String,
    locals: String,
}

/// Remembers the last recorded (line, function, locals) state.
#[derive(Debug, Default)]
pub struct StateDeduplicator {
    last_state: Option<StateKey>,
}

impl StateDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` and remembers the state when it differs from the last
    /// accepted one; returns `false` for a repeat.
    pub fn is_new_state(
        &mut self,
        line: u32,
        function: &str,
        locals: &IndexMap<String, String>,
    ) -> bool {
        let key = StateKey {
            line,
            function: function.to_string(),
            locals: encode_locals(locals),
        };

        if self.last_state.as_ref() == Some(&key) {
            return false;
        }
        self.last_state = Some(key);
        true
    }

    /// Forget the last state so the next one is always accepted.
    pub fn reset(&mut self) {
        self.last_state = None;
    }
}

/// Stable textual encoding of the locals, in insertion order.
fn encode_locals(locals: &IndexMap<String, String>) -> String {
    serde_json::to_string(locals).unwrap_or_else(|_| format!("{:?}", locals))
}
