//! Logical records decoded from raw rows

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::schema::FieldSchema;

/// Value of one field in a logical record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// The schema names the field once
    Single(String),
    /// The schema names the field several times; cells in schema order
    Multi(Vec<String>),
}

impl FieldValue {
    /// Adds another cell for the same field name.
    ///
    /// A single value becomes a two-element sequence, later cells append.
    pub fn push(&mut self, item: String) {
        match self {
            FieldValue::Single(first) => {
                let first = std::mem::take(first);
                *self = FieldValue::Multi(vec![first, item]);
            }
            FieldValue::Multi(items) => items.push(item),
        }
    }

    /// Iterates over every cell of this value
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            FieldValue::Single(v) => std::slice::from_ref(v),
            FieldValue::Multi(items) => items,
        };
        slice.iter().map(String::as_str)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Single(s.to_string())
    }
}

/// A decoded row: field values in schema order plus the synthetic `id`.
///
/// `id` is the physical line index of the row, counting the header as
/// line 0, so the first data row has id 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalRecord {
    id: u64,
    fields: Vec<(String, FieldValue)>,
}

impl LogicalRecord {
    /// Creates a record with no fields
    pub fn new(id: u64) -> Self {
        Self {
            id,
            fields: Vec::new(),
        }
    }

    /// Builds a record from every schema position.
    ///
    /// `cells` must hold at least `schema.width()` entries.
    pub fn decode(id: u64, schema: &FieldSchema, cells: &[String]) -> Self {
        let mut record = Self::new(id);
        for (name, cell) in schema.names().iter().zip(cells) {
            record.insert(name, cell.clone());
        }
        record
    }

    /// Builds a record from the given schema positions only
    pub fn project(id: u64, schema: &FieldSchema, cells: &[String], positions: &[usize]) -> Self {
        let mut record = Self::new(id);
        for &position in positions {
            if let (Some(name), Some(cell)) = (schema.name(position), cells.get(position)) {
                record.insert(name, cell.clone());
            }
        }
        record
    }

    /// Sets a field, coalescing with an existing value of the same name
    pub fn insert(&mut self, name: &str, value: String) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => existing.push(value),
            None => self
                .fields
                .push((name.to_string(), FieldValue::Single(value))),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Looks up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Fields in schema order, without the synthetic id
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Number of distinct field names
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Serializes as `{"id": .., <fields in schema order>}`. A schema field
/// literally named `id` replaces the synthetic one.
impl Serialize for LogicalRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let shadowed = self.get("id").is_some();
        let len = self.fields.len() + usize::from(!shadowed);
        let mut map = serializer.serialize_map(Some(len))?;
        if !shadowed {
            map.serialize_entry("id", &self.id)?;
        }
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
