//! Structural scan for station records.
//!
//! A station is any mapping that carries both a generation quantity and a
//! unit price. Stations are terminal: nothing beneath one is visited.

use std::slice;

use crate::config::FieldNames;
use crate::model::{Entry, Node, NodeKind, StationRecord};

/// Lazy depth-first iterator over the stations beneath a node.
///
/// Uses an explicit stack so arbitrary nesting depth is fine.
pub struct Stations<'a> {
    generation_key: &'a str,
    price_key: &'a str,
    root: Option<(&'a str, &'a Node)>,
    stack: Vec<slice::Iter<'a, (String, Entry)>>,
}

/// Collects stations found under `node`, named `name` for reporting.
pub fn stations<'a>(name: &'a str, node: &'a Node, fields: &'a FieldNames) -> Stations<'a> {
    Stations {
        generation_key: &fields.generation,
        price_key: &fields.unit_price,
        root: Some((name, node)),
        stack: Vec::new(),
    }
}

impl<'a> Stations<'a> {
    fn visit(&mut self, name: &str, node: &'a Node) -> Option<StationRecord> {
        match node.classify(name, self.generation_key, self.price_key) {
            NodeKind::Station(record) => Some(record),
            NodeKind::Internal(inner) => {
                self.stack.push(inner.raw_entries().iter());
                None
            }
        }
    }
}

impl<'a> Iterator for Stations<'a> {
    type Item = StationRecord;

    fn next(&mut self) -> Option<StationRecord> {
        if let Some((name, node)) = self.root.take() {
            if let Some(record) = self.visit(name, node) {
                return Some(record);
            }
        }

        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some((name, Entry::Node(child))) => {
                    if let Some(record) = self.visit(name, child) {
                        return Some(record);
                    }
                }
                Some((_, Entry::Scalar(_))) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
