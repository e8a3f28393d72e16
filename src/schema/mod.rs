//! Field schema for delimited tables
//!
//! Field names are supplied externally (configuration or request), never
//! inferred from the header row. The schema width is the minimum number of
//! cells a physical row must carry to be decoded.

mod errors;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use types::{trim_quotes, FieldSchema};
