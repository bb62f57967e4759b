//! Trace table for a binary search tree
//!
//! Shows recursive insertion and search over an owned tree.
//!
//! # Running the example
//!
//! ```bash
//! cargo run --example binary_search_tree
//! ```

#[path = "support/mod.rs"]
mod support;

use std::fmt;
use tracebuster::prelude::*;

struct Node {
    value: i32,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn new(value: i32) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }
}

// Only the node's own value, like a short label.
impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

fn insert_node(root: Option<Box<Node>>, value: i32) -> Option<Box<Node>> {
    trace_line!(root, value);
    let Some(mut node) = root else {
        return Some(Box::new(Node::new(value)));
    };

    if value < node.value {
        node.left = insert_node(node.left.take(), value);
    } else {
        node.right = insert_node(node.right.take(), value);
    }
    trace_line!(node, value);
    Some(node)
}

fn search_node(root: Option<&Node>, target: i32) -> bool {
    trace_line!(root, target);
    match root {
        None => false,
        Some(node) if node.value == target => true,
        Some(node) if target < node.value => search_node(node.left.as_deref(), target),
        Some(node) => search_node(node.right.as_deref(), target),
    }
}

fn main() -> anyhow::Result<()> {
    support::init();

    let values = [5, 3, 7, 2, 4, 6, 8];

    let (found, trace) = trace_block(|| {
        let mut root = None;
        for value in values {
            root = insert_node(root, value);
        }
        search_node(root.as_deref(), 4)
    })?;

    assert!(found);
    support::print_trace_table("Binary Search Tree Trace", &trace, &[]);

    Ok(())
}
