//! Trace table for an in-place QuickSort
//!
//! Shows recursive calls, in-place slice manipulation and partitioning.
//!
//! # Running the example
//!
//! ```bash
//! cargo run --example quicksort
//! ```

#[path = "support/mod.rs"]
mod support;

use tracebuster::prelude::*;

/// Partition using the last element as pivot, returning the pivot's index.
fn partition(arr: &mut [i32], low: usize, high: usize) -> usize {
    let pivot = arr[high];
    let mut i = low;
    trace_line!(low, high, pivot, i);

    for j in low..high {
        if arr[j] <= pivot {
            arr.swap(i, j);
            i += 1;
        }
        trace_line!(arr, j, i);
    }

    arr.swap(i, high);
    trace_line!(arr, i);
    i
}

fn quicksort(arr: &mut [i32], low: usize, high: usize) {
    trace_line!(low, high);
    if low < high {
        let pivot_idx = partition(arr, low, high);
        trace_line!(arr, pivot_idx);

        if pivot_idx > 0 {
            quicksort(arr, low, pivot_idx - 1);
        }
        quicksort(arr, pivot_idx + 1, high);
    }
}

fn main() -> anyhow::Result<()> {
    support::init();

    let mut arr = vec![64, 34, 25, 12, 22, 11, 90];
    println!("Sorting array: {:?}", arr);

    let scope = collect_trace()?;
    let high = arr.len() - 1;
    quicksort(&mut arr, 0, high);
    let trace = scope.close()?;

    assert_eq!(arr, vec![11, 12, 22, 25, 34, 64, 90]);
    support::print_trace_table("QuickSort Algorithm Trace", &trace, &[]);

    Ok(())
}
