//! csvquery - read-only queries over delimited text files
//!
//! Each table is one file under a base directory. A scan reads the file
//! from the top, decodes rows against a caller-supplied field schema,
//! filters them with a condition tree, and returns one page of records.

pub mod cli;
pub mod executor;
pub mod observability;
pub mod query;
pub mod schema;
pub mod source;
