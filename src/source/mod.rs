//! Delimited-file source
//!
//! Maps table names to files under a base directory and runs scans over
//! them through a [`SourceSession`].
//!
//! # Usage
//!
//! ```ignore
//! use csvquery::query::{ConditionTree, QueryDescription};
//! use csvquery::source::{SourceConfig, SourceSession};
//!
//! let config = SourceConfig::load("csvquery.json".as_ref())?;
//! let mut session = SourceSession::open(config)?;
//! let query = QueryDescription::new().filter(ConditionTree::new().eq("city", "Paris"));
//! let output = session.read_table("users", &query)?;
//! ```

mod config;
mod errors;
mod session;
mod table;

pub use config::SourceConfig;
pub use errors::{SourceError, SourceErrorCode, SourceResult};
pub use session::SourceSession;
pub use table::{ScanRequest, TableDefinition, TableModel};
