//! CLI argument definitions using clap
//!
//! Commands:
//! - csvquery query --config <path>
//! - csvquery serve --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// csvquery - read-only queries over delimited text files
#[derive(Parser, Debug)]
#[command(name = "csvquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Lowest log severity written to stderr (trace, info, warn, error, fatal)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read one request from stdin and write one response
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./csvquery.json")]
        config: PathBuf,
    },

    /// Answer line-delimited requests from stdin over one session
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./csvquery.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_with_config() {
        let cli = Cli::try_parse_from(["csvquery", "serve", "--config", "/etc/q.json"]).unwrap();
        match cli.command {
            Command::Serve { config } => assert_eq!(config, PathBuf::from("/etc/q.json")),
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_query_defaults() {
        let cli = Cli::try_parse_from(["csvquery", "query", "--log-level", "trace"]).unwrap();
        match cli.command {
            Command::Query { config } => assert_eq!(config, PathBuf::from("./csvquery.json")),
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.log_level, "trace");
    }
}
