//! Query executor subsystem
//!
//! Consumes a query description and a positioned stream, produces a page
//! of logical records or the size of that page.
//!
//! # Components
//!
//! - `record`: decoding raw rows into logical records
//! - `filters`: condition evaluation, no I/O
//! - `scanner`: the streaming scan loop, pagination and projection
//!
//! # Guarantees
//!
//! - One pass over the stream, stopping as soon as the page is full
//! - Rows with too few cells are dropped, never reported as errors
//! - Same stream + same query + same window = same result

mod errors;
mod filters;
mod record;
mod result;
mod rows;
mod scanner;

pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult};
pub use filters::ConditionEvaluator;
pub use record::{FieldValue, LogicalRecord};
pub use result::{ScanOutcome, ScanOutput, ScanStats};
pub use scanner::{ScanEngine, DEFAULT_DELIMITER, DEFAULT_LIMIT, DEFAULT_PAGE};
