//! Cursor over raw aggregation results.
//!
//! Consumption shape: either drain it as an iterator, or poll `alive()` and
//! `next()` the way count pipelines are read (zero-or-one document).

use std::collections::VecDeque;

use serde_json::Value;

/// A sequence of raw result documents with a has-more query
#[derive(Debug)]
pub struct Cursor {
    items: VecDeque<Value>,
}

impl Cursor {
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Returns true while documents remain.
    pub fn alive(&self) -> bool {
        !self.items.is_empty()
    }

    /// Number of documents remaining
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

impl Iterator for Cursor {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.items.pop_front()
    }
}
