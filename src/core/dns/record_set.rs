// src/core/dns/record_set.rs

use std::collections::HashSet;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Deduplicated, first-seen-ordered record values for one (domain, type) pair.
///
/// Two values are the same record when their canonical serializations (compact
/// JSON with object keys sorted) are equal, so structurally-equal records always
/// collide regardless of the order their fields were built in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecordSet {
    values: Vec<Value>,
    seen: HashSet<String>,
}

impl RawRecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` unless an equal record is already present. Returns whether it was added.
    pub fn insert(&mut self, value: Value) -> bool {
        let key = canonical_key(&value);
        if self.seen.insert(key) {
            self.values.push(value);
            true
        } else {
            false
        }
    }

    pub fn extend<I: IntoIterator<Item = Value>>(&mut self, values: I) {
        for value in values {
            self.insert(value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Every string inside the set, flattening list-valued records such as TXT.
    pub fn strings(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for value in &self.values {
            collect_strings(value, &mut out);
        }
        out
    }
}

impl FromIterator<Value> for RawRecordSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = RawRecordSet::new();
        set.extend(iter);
        set
    }
}

impl Serialize for RawRecordSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.values)
    }
}

fn canonical_key(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        // Scalars: Display is compact JSON.
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s),
        Value::Array(items) => items.iter().for_each(|item| collect_strings(item, out)),
        _ => {}
    }
}
