//! CLI command implementations
//!
//! Both commands load the configuration, open one session, and answer
//! requests with JSON on stdout. Logs go to stderr.

use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::Value;

use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::query::QueryDescription;
use crate::schema::FieldSchema;
use crate::source::{SourceConfig, SourceSession, TableDefinition};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request, read_requests, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let severity = Severity::parse(&cli.log_level).ok_or_else(|| {
        CliError::config_error(format!("Invalid log level: '{}'", cli.log_level))
    })?;
    Logger::set_min_severity(severity);
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Query { config } => query(&config),
        Command::Serve { config } => serve(&config),
    }
}

/// Answer a single request read from stdin
pub fn query(config_path: &Path) -> CliResult<()> {
    let mut session = open_session(config_path)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    query_with(&mut session, &mut stdin.lock(), &mut stdout.lock())
}

/// Answer line-delimited requests from stdin until EOF
pub fn serve(config_path: &Path) -> CliResult<()> {
    let mut session = open_session(config_path)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve_with(&mut session, stdin.lock(), &mut stdout.lock())
}

/// Load the configuration and open a session over it
pub fn open_session(config_path: &Path) -> CliResult<SourceSession> {
    let config = SourceConfig::load(config_path)?;
    Ok(SourceSession::open(config)?)
}

/// One request in, one response out
pub fn query_with<R: BufRead, W: Write>(
    session: &mut SourceSession,
    input: &mut R,
    out: &mut W,
) -> CliResult<()> {
    let result = read_request(input).and_then(|request| handle_request(session, &request));
    respond(out, result)
}

/// Serving loop over one session.
///
/// A bad request gets an error line and the loop continues; a failed read
/// from `input` ends it.
pub fn serve_with<R: BufRead, W: Write>(
    session: &mut SourceSession,
    input: R,
    out: &mut W,
) -> CliResult<()> {
    log_event_with_fields(
        Event::Serving,
        &[("session", &session.id().to_string())],
    );

    for request_result in read_requests(input) {
        match request_result {
            Ok(request) => {
                let result = handle_request(session, &request);
                respond(out, result)?;
            }
            Err(e) if e.is_fatal() => {
                write_error(out, e.code_str(), e.message())?;
                return Err(e);
            }
            Err(e) => respond(out, Err(e))?,
        }
    }

    Ok(())
}

/// Runs one parsed request against the session and returns the response
/// data: an array of records, or `{"count": n}`.
pub fn handle_request(session: &mut SourceSession, request: &Value) -> CliResult<Value> {
    let obj = request
        .as_object()
        .ok_or_else(|| CliError::request_error("Request must be a JSON object"))?;

    let table = match obj.get("table") {
        Some(Value::String(table)) => table.as_str(),
        Some(_) => return Err(CliError::request_error("'table' must be a string")),
        None => return Err(CliError::request_error("Missing 'table'")),
    };

    let query = QueryDescription::from_json(request)?;

    let output = match obj.get("schema") {
        None | Some(Value::Null) => session.read_table(table, &query)?,
        Some(schema) => {
            let definition = TableDefinition::new(table, parse_schema(schema)?);
            session.read_model(&definition, &query)?
        }
    };

    Ok(output.outcome.to_json())
}

fn parse_schema(value: &Value) -> CliResult<FieldSchema> {
    let items = value
        .as_array()
        .ok_or_else(|| CliError::request_error("'schema' must be an array of field names"))?;

    let names = items
        .iter()
        .map(|item| {
            item.as_str()
                .ok_or_else(|| CliError::request_error("'schema' must be an array of field names"))
        })
        .collect::<CliResult<Vec<&str>>>()?;

    Ok(FieldSchema::new(names)?)
}

fn respond<W: Write>(out: &mut W, result: CliResult<Value>) -> CliResult<()> {
    match result {
        Ok(data) => write_response(out, data),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            Logger::warn(
                Event::RequestRejected.as_str(),
                &[("code", e.code_str()), ("message", e.message())],
            );
            write_error(out, e.code_str(), e.message())
        }
    }
}
