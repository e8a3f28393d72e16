//! Field schema type

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};

/// Strips every leading and trailing `"` or `'` from a cell or field name.
///
/// This is not CSV unescaping: inner quotes are left untouched.
pub fn trim_quotes(s: &str) -> &str {
    s.trim_matches(|c| c == '"' || c == '\'')
}

/// Ordered field names of a delimited table.
///
/// A name may appear more than once; decoded records then coalesce the
/// matching cells into a multi-value field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FieldSchema {
    fields: Vec<String>,
}

impl FieldSchema {
    /// Builds a schema from field names, trimming surrounding quotes.
    pub fn new<I, S>(names: I) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = Vec::new();
        for (position, name) in names.into_iter().enumerate() {
            let trimmed = trim_quotes(name.as_ref());
            if trimmed.is_empty() {
                return Err(SchemaError::BlankField(position));
            }
            fields.push(trimmed.to_string());
        }

        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }

        Ok(Self { fields })
    }

    /// Number of cells a row needs to be decoded
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    /// Field names in declaration order
    pub fn names(&self) -> &[String] {
        &self.fields
    }

    /// Field name at a schema position
    pub fn name(&self, position: usize) -> Option<&str> {
        self.fields.get(position).map(String::as_str)
    }

    /// Schema positions whose field name is in `requested`.
    ///
    /// Positions come back in schema order, not in the order of `requested`.
    /// Requested names that the schema does not declare are ignored.
    pub fn positions_of(&self, requested: &[String]) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, name)| requested.iter().any(|r| r == *name))
            .map(|(position, _)| position)
            .collect()
    }
}

impl TryFrom<Vec<String>> for FieldSchema {
    type Error = SchemaError;

    fn try_from(names: Vec<String>) -> SchemaResult<Self> {
        Self::new(names)
    }
}

impl From<FieldSchema> for Vec<String> {
    fn from(schema: FieldSchema) -> Self {
        schema.fields
    }
}
