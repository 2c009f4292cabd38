//! In-memory view of a loaded company dataset.
//!
//! The JSON document is normalized once by [`crate::parser`] into these
//! types. After that point the `"NA"` sentinel and `null` are both
//! [`Scalar::Missing`] and nothing downstream compares against strings.

use serde::Serialize;
use std::collections::BTreeMap;

/// A leaf value read from the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Scalar {
    Number(f64),
    /// `null`, an absent key, or the `"NA"` sentinel.
    Missing,
    /// Any other value, kept as text. Never read as a number.
    Text(String),
}

impl Scalar {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(v) => Some(*v),
            _ => None,
        }
    }
}

/// A child of a [`Node`]: either a scalar or a nested mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Scalar(Scalar),
    Node(Node),
}

/// A mapping from keys to entries, kept in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    entries: Vec<(String, Entry)>,
}

/// Result of looking at a node once to decide how traversal treats it.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind<'a> {
    Station(StationRecord),
    Internal(&'a Node),
}

/// A leaf exposing both a generation quantity and a unit price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRecord {
    pub name: String,
    pub generation: Scalar,
    pub unit_price: Scalar,
}

impl StationRecord {
    /// Revenue contribution, if both inputs are numeric.
    pub fn revenue(&self) -> Option<f64> {
        Some(self.generation.as_number()? * self.unit_price.as_number()?)
    }
}

impl Node {
    pub fn new(entries: Vec<(String, Entry)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Reads a scalar field. An absent key reads as missing.
    pub fn scalar(&self, key: &str) -> Scalar {
        match self.get(key) {
            None => Scalar::Missing,
            Some(Entry::Scalar(s)) => s.clone(),
            Some(Entry::Node(_)) => Scalar::Text("<object>".to_string()),
        }
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.scalar(key).as_number()
    }

    pub fn child(&self, key: &str) -> Option<&Node> {
        match self.get(key) {
            Some(Entry::Node(n)) => Some(n),
            _ => None,
        }
    }

    pub(crate) fn raw_entries(&self) -> &[(String, Entry)] {
        &self.entries
    }

    /// Mapping-valued children in document order. Scalars are skipped.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().filter_map(|(k, e)| match e {
            Entry::Node(n) => Some((k.as_str(), n)),
            Entry::Scalar(_) => None,
        })
    }

    /// A node is a station iff both keys are present, whatever their values.
    pub fn classify(&self, name: &str, generation_key: &str, price_key: &str) -> NodeKind<'_> {
        if self.contains(generation_key) && self.contains(price_key) {
            NodeKind::Station(StationRecord {
                name: name.to_string(),
                generation: self.scalar(generation_key),
                unit_price: self.scalar(price_key),
            })
        } else {
            NodeKind::Internal(self)
        }
    }
}

/// One year of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct YearRecord {
    pub year: i32,
    pub fields: Node,
}

impl YearRecord {
    pub fn number(&self, field: &str) -> Option<f64> {
        self.fields.number(field)
    }

    pub fn subsidiaries(&self, key: &str) -> Option<&Node> {
        self.fields.child(key)
    }
}

/// The whole document: year records plus any non-year top-level keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub years: BTreeMap<i32, YearRecord>,
    pub meta: Node,
}

impl Dataset {
    pub fn year_keys(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }

    pub fn records(&self) -> impl Iterator<Item = &YearRecord> {
        self.years.values()
    }

    /// The `expected_rate` metadata value as a fraction.
    ///
    /// Values above 1 are taken to be percentages.
    pub fn expected_rate(&self) -> Option<f64> {
        let rate = self.meta.number("expected_rate")?;
        if rate > 1.0 { Some(rate / 100.0) } else { Some(rate) }
    }

    pub fn currency(&self) -> Option<String> {
        match self.meta.get("curr") {
            Some(Entry::Scalar(Scalar::Text(s))) => Some(s.clone()),
            _ => None,
        }
    }
}
