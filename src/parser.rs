//! JSON parser for company datasets.
//!
//! This is the only place that knows about the `"NA"` sentinel.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::model::{Dataset, Entry, Node, Scalar, YearRecord};

/// String literal used in source documents to mark missing data.
pub const NA_SENTINEL: &str = "NA";

/// Decodes a JSON document into a [`Dataset`].
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON or the top level is not an object.
///
/// Nesting depth is unbounded; the stack grows on demand while deserializing.
pub fn parse_dataset(bytes: &[u8]) -> Result<Dataset> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Dataset::from_value(value)
}

impl Dataset {
    /// Splits the top-level object into year records and metadata.
    ///
    /// A key is a year iff it parses as an integer. Year keys holding
    /// anything other than an object are dropped.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            anyhow::bail!("top-level JSON value must be an object");
        };

        let mut years = BTreeMap::new();
        let mut meta = Vec::new();

        for (key, val) in map {
            match key.trim().parse::<i32>() {
                Ok(year) => match val {
                    Value::Object(_) if years.contains_key(&year) => {
                        warn!(year, key = %key, "Duplicate year key, keeping the first record");
                    }
                    Value::Object(obj) => {
                        years.insert(
                            year,
                            YearRecord {
                                year,
                                fields: to_node(obj),
                            },
                        );
                    }
                    other => warn!(year, value = %other, "Year entry is not an object, skipping"),
                },
                Err(_) => {
                    debug!(key = %key, "Non-year top-level key kept as metadata");
                    meta.push((key, to_entry(val)));
                }
            }
        }

        Ok(Dataset {
            years,
            meta: Node::new(meta),
        })
    }
}

struct Frame {
    key: String,
    pending: serde_json::map::IntoIter,
    entries: Vec<(String, Entry)>,
}

/// Converts an object without recursing, so depth is bounded only by memory.
fn to_node(map: Map<String, Value>) -> Node {
    let mut stack: Vec<Frame> = Vec::new();
    let mut current = Frame {
        key: String::new(),
        pending: map.into_iter(),
        entries: Vec::new(),
    };

    loop {
        match current.pending.next() {
            Some((key, Value::Object(child))) => {
                let child = Frame {
                    key,
                    pending: child.into_iter(),
                    entries: Vec::new(),
                };
                stack.push(std::mem::replace(&mut current, child));
            }
            Some((key, other)) => current.entries.push((key, Entry::Scalar(to_scalar(other)))),
            None => {
                let Frame { key, entries, .. } = current;
                let node = Node::new(entries);
                match stack.pop() {
                    Some(mut parent) => {
                        parent.entries.push((key, Entry::Node(node)));
                        current = parent;
                    }
                    None => return node,
                }
            }
        }
    }
}

fn to_entry(value: Value) -> Entry {
    match value {
        Value::Object(map) => Entry::Node(to_node(map)),
        other => Entry::Scalar(to_scalar(other)),
    }
}

/// Normalizes a non-object JSON value. `null` and `"NA"` become missing.
pub fn to_scalar(value: Value) -> Scalar {
    match value {
        Value::Null => Scalar::Missing,
        Value::String(s) if s == NA_SENTINEL => Scalar::Missing,
        Value::String(s) => Scalar::Text(s),
        Value::Number(n) => match n.as_f64() {
            Some(v) => Scalar::Number(v),
            None => Scalar::Text(n.to_string()),
        },
        other => Scalar::Text(other.to_string()),
    }
}
