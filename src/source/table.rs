//! Table descriptions handed to a session
//!
//! A caller describes a table by name and schema, either by implementing
//! [`TableModel`] on its own type or by using [`TableDefinition`].

use crate::query::QueryDescription;
use crate::schema::FieldSchema;

/// Anything that can name a table and its schema
pub trait TableModel {
    /// Table name; the backing file is `<path>/<name>.<extension>`
    fn table_name(&self) -> &str;

    /// Ordered field names of the table
    fn schema(&self) -> &FieldSchema;
}

/// A table name paired with its schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: String,
    pub schema: FieldSchema,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>, schema: FieldSchema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

impl TableModel for TableDefinition {
    fn table_name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &FieldSchema {
        &self.schema
    }
}

/// Everything one scan needs
#[derive(Debug, Clone, Copy)]
pub struct ScanRequest<'a> {
    pub table: &'a str,
    pub schema: &'a FieldSchema,
    pub query: &'a QueryDescription,
}

impl<'a> ScanRequest<'a> {
    /// Builds a request from a table model and a query
    pub fn new<M: TableModel + ?Sized>(model: &'a M, query: &'a QueryDescription) -> Self {
        Self {
            table: model.table_name(),
            schema: model.schema(),
            query,
        }
    }
}
