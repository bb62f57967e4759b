//! Safe, bounded rendering of captured values
//!
//! [`ValueSerializer::serialize`] is total: it returns a string for every
//! captured value, including ones whose `Debug` impl panics or reports an
//! error.

use super::frame::{split_path, Captured, Scalar};
use crate::config::DEFAULT_MAX_VALUE_LEN;
use std::fmt::{self, Write};
use std::panic::{self, AssertUnwindSafe};

/// Rendered in place of a value whose textual form cannot be produced.
pub const UNPRINTABLE: &str = "<unprintable>";

const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone, Copy)]
pub struct ValueSerializer {
    max_len: usize,
}

impl ValueSerializer {
    pub fn new(max_len: usize) -> Self {
        Self { max_len: max_len.max(1) }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Render a captured value.
    ///
    /// Scalars use their literal form; anything else renders as
    /// `TypeName(<Debug form>)`.
    pub fn serialize(&self, value: &Captured<'_>) -> String {
        let rendered = match value {
            Captured::Scalar(scalar) => Some(render_scalar(scalar)),
            Captured::Other { type_name, value } => render_other(type_name, *value),
        };

        match rendered {
            Some(text) => self.bound(text),
            None => UNPRINTABLE.to_string(),
        }
    }

    fn bound(&self, mut text: String) -> String {
        if let Some((cut, _)) = text.char_indices().nth(self.max_len) {
            text.truncate(cut);
            text.push_str(TRUNCATION_MARKER);
        }
        text
    }
}

impl Default for ValueSerializer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VALUE_LEN)
    }
}

fn render_scalar(scalar: &Scalar<'_>) -> String {
    match scalar {
        Scalar::Int(v) => v.to_string(),
        Scalar::UInt(v) => v.to_string(),
        Scalar::F32(v) => format!("{:?}", v),
        Scalar::Float(v) => format!("{:?}", v),
        Scalar::Bool(v) => v.to_string(),
        Scalar::Char(v) => format!("{:?}", v),
        Scalar::Str(v) => format!("{:?}", v),
        Scalar::Unit => "()".to_string(),
        Scalar::None => "None".to_string(),
        Scalar::SomeNone(depth) => {
            let depth = *depth as usize;
            format!("{}None{}", "Some(".repeat(depth), ")".repeat(depth))
        }
    }
}

fn render_other(type_name: &str, value: &dyn fmt::Debug) -> Option<String> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        let mut out = String::new();
        write!(out, "{}(", short_type_name(type_name)).ok()?;
        write!(out, "{:?}", value).ok()?;
        out.push(')');
        Some(out)
    }))
    .ok()
    .flatten()
}

/// Strip module paths and leading references from a full type name.
///
/// `&mut alloc::vec::Vec<core::option::Option<i32>>` becomes `Vec<Option<i32>>`.
pub fn short_type_name(full: &str) -> String {
    let mut name = full.trim_start();
    loop {
        if let Some(rest) = name.strip_prefix("&mut ") {
            name = rest;
        } else if let Some(rest) = name.strip_prefix('&') {
            name = rest;
        } else {
            break;
        }
    }

    let mut out = String::with_capacity(name.len());
    let mut token = String::new();
    for ch in name.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            token.push(ch);
        } else {
            out.push_str(last_segment(&token));
            token.clear();
            out.push(ch);
        }
    }
    out.push_str(last_segment(&token));
    out
}

fn last_segment(token: &str) -> &str {
    split_path(token).last().copied().unwrap_or(token)
}
