//! Query description and condition language
//!
//! A query names the fields to project, a condition tree, and a page
//! window. Condition trees keep entry order: an `or` group that matches
//! ends evaluation for the whole record, so what comes after it matters.
//!
//! # Condition keys
//!
//! - `field`: equality (a list value means "any of")
//! - `field OP`: comparison, OP one of `=`, `!=`, `<>`, `>`, `>=`, `<`, `<=`, `LIKE`
//! - `or`: nested group, alternatives
//! - `and`: nested group, conjunction

mod ast;
mod errors;
mod parser;

pub use ast::{CompareOp, Condition, ConditionTree, ConditionValue, QueryDescription};
pub use errors::{QueryError, QueryResult};
