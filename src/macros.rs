/// Report the current line, with the listed locals, to the active line hook.
///
/// ```rust
/// use tracebuster::trace_line;
///
/// fn partition(arr: &mut [i32], low: usize, high: usize) -> usize {
///     let pivot = arr[high];
///     let mut i = low;
///     trace_line!(pivot, i);
///     for j in low..high {
///         if arr[j] <= pivot {
///             arr.swap(i, j);
///             i += 1;
///         }
///         trace_line!(arr, i, j);
///     }
///     arr.swap(i, high);
///     i
/// }
/// # let mut values = [3, 1, 2];
/// # assert_eq!(partition(&mut values, 0, 2), 1);
/// ```
///
/// Expressions can be named explicitly: `trace_line!(len = items.len())`.
///
/// Scalars (integers, floats, `bool`, `char`, strings, `()` and `Option` of
/// those) are captured as literals; any other value must implement `Debug`.
/// When no hook is installed on the thread the macro does nothing beyond
/// checking the slot.
#[macro_export]
macro_rules! trace_line {
    () => {
        $crate::__trace_line_dispatch!()
    };
    ($($name:ident),+ $(,)?) => {
        $crate::__trace_line_dispatch!($($name = $name),+)
    };
    ($($name:ident = $value:expr),+ $(,)?) => {
        $crate::__trace_line_dispatch!($($name = $value),+)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __trace_line_dispatch {
    ($($name:ident = $value:expr),*) => {{
        if $crate::tracer::hook_slot::is_active() {
            #[allow(unused_imports)]
            use $crate::tracer::frame::{DebugCapture as _, ScalarCapture as _};
            fn __tracebuster_marker() {}
            $crate::tracer::hook_slot::dispatch(&$crate::tracer::Frame {
                file: ::core::file!(),
                function: $crate::tracer::frame::function_name(
                    ::core::any::type_name_of_val(&__tracebuster_marker),
                ),
                line: ::core::line!(),
                locals: &[$($crate::tracer::Local {
                    name: ::core::stringify!($name),
                    value: (&$crate::tracer::frame::ValueRef(&$value)).capture(),
                }),*],
            });
        }
    }};
}
