//! Execution frames handed to line hooks
//!
//! A [`Frame`] describes one executed line: where it is, which function it
//! belongs to, and the locals the instrumentation chose to expose. Locals are
//! captured as a closed set of kinds ([`Captured`]): scalars keep their
//! literal value, everything else keeps its type name and a `Debug` view.
//!
//! Kind selection happens at the macro site through autoref specialization:
//! [`ScalarCapture`] is implemented for `ValueRef<T>` and wins when `T` is a
//! scalar, [`DebugCapture`] is implemented for `&ValueRef<T>` and is only reached
//! after the compiler adds a reference.

use std::fmt;

/// Function name recorded when the enclosing function cannot be determined.
pub const MODULE_SENTINEL: &str = "<module>";

/// One executed line as seen by a line hook.
#[derive(Debug)]
pub struct Frame<'a> {
    /// Source path as reported by `file!()`.
    pub file: &'a str,
    /// Enclosing function name, or [`MODULE_SENTINEL`].
    pub function: &'a str,
    /// 1-based line number.
    pub line: u32,
    /// Locals in the order they were listed at the instrumentation site.
    pub locals: &'a [Local<'a>],
}

/// A named local binding.
#[derive(Debug)]
pub struct Local<'a> {
    pub name: &'a str,
    pub value: Captured<'a>,
}

/// Captured view of a local value.
pub enum Captured<'a> {
    Scalar(Scalar<'a>),
    Other {
        type_name: &'static str,
        value: &'a dyn fmt::Debug,
    },
}

impl fmt::Debug for Captured<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Captured::Scalar(scalar) => f.debug_tuple("Scalar").field(scalar).finish(),
            // The wrapped Debug impl may misbehave; only the type is shown here.
            Captured::Other { type_name, .. } => {
                f.debug_struct("Other").field("type_name", type_name).finish_non_exhaustive()
            }
        }
    }
}

/// Primitive values that render as their literal form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Int(i128),
    UInt(u128),
    F32(f32),
    Float(f64),
    Bool(bool),
    Char(char),
    Str(&'a str),
    Unit,
    /// The absence-of-value marker (`Option::None`).
    None,
    /// `None` wrapped in this many `Some` layers.
    SomeNone(u32),
}

/// Types that capture as a [`Scalar`].
pub trait TraceScalar {
    fn to_scalar(&self) -> Scalar<'_>;
}

macro_rules! impl_trace_scalar {
    ($variant:ident as $wide:ty: $($ty:ty),*) => {
        $(
            impl TraceScalar for $ty {
                fn to_scalar(&self) -> Scalar<'_> {
                    Scalar::$variant(*self as $wide)
                }
            }
        )*
    };
}

impl_trace_scalar!(Int as i128: i8, i16, i32, i64, i128, isize);
impl_trace_scalar!(UInt as u128: u8, u16, u32, u64, u128, usize);
impl_trace_scalar!(F32 as f32: f32);
impl_trace_scalar!(Float as f64: f64);

impl TraceScalar for bool {
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::Bool(*self)
    }
}

impl TraceScalar for char {
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::Char(*self)
    }
}

impl TraceScalar for str {
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::Str(self)
    }
}

impl TraceScalar for String {
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::Str(self.as_str())
    }
}

impl TraceScalar for () {
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::Unit
    }
}

impl<T: TraceScalar> TraceScalar for Option<T> {
    fn to_scalar(&self) -> Scalar<'_> {
        match self {
            Some(value) => match value.to_scalar() {
                Scalar::None => Scalar::SomeNone(1),
                Scalar::SomeNone(depth) => Scalar::SomeNone(depth.saturating_add(1)),
                scalar => scalar,
            },
            None => Scalar::None,
        }
    }
}

impl<T: TraceScalar + ?Sized> TraceScalar for &T {
    fn to_scalar(&self) -> Scalar<'_> {
        (**self).to_scalar()
    }
}

impl<T: TraceScalar + ?Sized> TraceScalar for &mut T {
    fn to_scalar(&self) -> Scalar<'_> {
        (**self).to_scalar()
    }
}

/// Wrapper used by `trace_line!` to pick a capture kind.
pub struct ValueRef<'a, T: ?Sized>(pub &'a T);

pub trait ScalarCapture<'a> {
    fn capture(&self) -> Captured<'a>;
}

impl<'a, T: TraceScalar + ?Sized> ScalarCapture<'a> for ValueRef<'a, T> {
    fn capture(&self) -> Captured<'a> {
        Captured::Scalar(self.0.to_scalar())
    }
}

pub trait DebugCapture<'a> {
    fn capture(&self) -> Captured<'a>;
}

impl<'a, T: fmt::Debug> DebugCapture<'a> for &ValueRef<'a, T> {
    fn capture(&self) -> Captured<'a> {
        Captured::Other {
            type_name: std::any::type_name::<T>(),
            value: self.0,
        }
    }
}

/// Resolve the enclosing function name from the type name of a marker item
/// declared inside it (`crate::module::function::{{closure}}::marker`).
pub fn function_name(marker_path: &str) -> &str {
    let mut segments = split_path(marker_path);
    // The marker item itself.
    segments.pop();
    while segments.last().is_some_and(|s| s.starts_with("{{")) {
        segments.pop();
    }
    match segments.pop() {
        Some(name) if !name.is_empty() => name,
        _ => MODULE_SENTINEL,
    }
}

/// Split a Rust path on `::`, ignoring separators nested inside `<...>`.
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&path[start..]);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Point {
        x: i32,
    }

    #[test]
    fn test_integer_captures_as_scalar() {
        let count: i32 = -3;
        match (&ValueRef(&count)).capture() {
            Captured::Scalar(Scalar::Int(-3)) => {}
            other => panic!("Expected Int scalar, got {:?}", other),
        }
    }

    #[test]
    fn test_string_and_str_capture_as_scalar() {
        let owned = String::from("abc");
        let borrowed: &str = "xyz";

        assert!(matches!((&ValueRef(&owned)).capture(), Captured::Scalar(Scalar::Str("abc"))));
        assert!(matches!((&ValueRef(&borrowed)).capture(), Captured::Scalar(Scalar::Str("xyz"))));
    }

    #[test]
    fn test_option_none_is_absence_marker() {
        let missing: Option<u8> = None;
        let present: Option<u8> = Some(7);

        assert!(matches!((&ValueRef(&missing)).capture(), Captured::Scalar(Scalar::None)));
        assert!(matches!((&ValueRef(&present)).capture(), Captured::Scalar(Scalar::UInt(7))));
    }

    #[test]
    fn test_nested_none_differs_from_none() {
        let outer: Option<Option<u8>> = None;
        let inner: Option<Option<u8>> = Some(None);
        let deep: Option<Option<Option<u8>>> = Some(Some(None));
        let value: Option<Option<u8>> = Some(Some(3));

        assert!(matches!((&ValueRef(&outer)).capture(), Captured::Scalar(Scalar::None)));
        assert!(matches!((&ValueRef(&inner)).capture(), Captured::Scalar(Scalar::SomeNone(1))));
        assert!(matches!((&ValueRef(&deep)).capture(), Captured::Scalar(Scalar::SomeNone(2))));
        assert!(matches!((&ValueRef(&value)).capture(), Captured::Scalar(Scalar::UInt(3))));
    }

    #[test]
    fn test_f32_keeps_its_width() {
        let ratio: f32 = 0.1;
        assert!(matches!((&ValueRef(&ratio)).capture(), Captured::Scalar(Scalar::F32(v)) if v == 0.1f32));
    }

    #[test]
    fn test_struct_captures_as_other() {
        let point = Point { x: 1 };
        match (&ValueRef(&point)).capture() {
            Captured::Other { type_name, value } => {
                assert!(type_name.ends_with("Point"));
                assert_eq!(format!("{:?}", value), "Point { x: 1 }");
            }
            other => panic!("Expected Other, got {:?}", other),
        }
        assert_eq!(point.x, 1);
    }

    #[test]
    fn test_vec_captures_as_other() {
        let values = vec![1, 2, 3];
        assert!(matches!((&ValueRef(&values)).capture(), Captured::Other { .. }));
    }

    #[test]
    fn test_function_name_plain() {
        assert_eq!(function_name("demo::sort::partition::__here"), "partition");
    }

    #[test]
    fn test_function_name_skips_closures() {
        assert_eq!(
            function_name("demo::sort::quicksort::{{closure}}::{{closure}}::__here"),
            "quicksort"
        );
    }

    #[test]
    fn test_function_name_method_with_generics() {
        assert_eq!(function_name("demo::Tree<alloc::string::String>::insert::__here"), "insert");
    }

    #[test]
    fn test_function_name_without_enclosing_function() {
        assert_eq!(function_name("__here"), MODULE_SENTINEL);
        assert_eq!(function_name(""), MODULE_SENTINEL);
    }

    #[test]
    fn test_split_path_respects_generics() {
        assert_eq!(
            split_path("std::collections::HashMap<alloc::string::String, i32>"),
            vec!["std", "collections", "HashMap<alloc::string::String, i32>"]
        );
    }
}
