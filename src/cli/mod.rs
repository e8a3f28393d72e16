//! CLI module for csvquery
//!
//! Provides command-line interface for:
//! - query: one request from stdin, one response on stdout
//! - serve: line-delimited requests over a single session

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    handle_request, open_session, query, query_with, run, run_command, serve, serve_with,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, read_requests, write_error, write_response};
