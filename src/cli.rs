//! Command-line interface.
//!
//! Every request command prints the last response as pretty JSON on stdout
//! and any error messages on stderr.

use std::io::{self, BufRead, Write};

use clap::{ArgAction, Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::info;

use crate::api::{auth, JiraClient};
use crate::config::{self, Config};
use crate::error::{AppError, Result};

/// A minimal client for the JIRA REST API v2.
#[derive(Debug, Parser)]
#[command(name = "jira-lite", version, about)]
pub struct Cli {
    /// Profile to use instead of the configured default.
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Log more detail to the log file; repeat for more (-vv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// The available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search for issues with a JQL query.
    Search {
        /// The JQL query; omitted means the server default.
        jql: Option<String>,
    },
    /// Create an issue.
    Create {
        /// A field as NAME=VALUE; VALUE is parsed as JSON when it can be.
        #[arg(short, long = "field", value_parser = parse_field, required = true)]
        fields: Vec<(String, Value)>,
    },
    /// Update fields on an existing issue.
    Update {
        /// The issue key, e.g. PROJ-123.
        key: String,
        /// A field as NAME=VALUE; VALUE is parsed as JSON when it can be.
        #[arg(short, long = "field", value_parser = parse_field, required = true)]
        fields: Vec<(String, Value)>,
    },
    /// Store a profile's password in the OS keyring, read from stdin.
    StoreToken {
        /// The profile the password belongs to.
        profile: String,
    },
}

/// Parse a `NAME=VALUE` field argument.
pub fn parse_field(arg: &str) -> std::result::Result<(String, Value), String> {
    let (name, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", arg))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("field name is empty in '{}'", arg));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}

/// Run a parsed command line.
///
/// Returns whether the command succeeded. Failures reported by JIRA are
/// printed and turned into `Ok(false)`; only local problems are `Err`.
pub fn run(cli: Cli) -> Result<bool> {
    let config = Config::load()?;

    match cli.command {
        Command::StoreToken { profile } => store_token(&config, &profile),
        Command::Search { jql } => with_client(&config, cli.profile.as_deref(), false, |c| {
            c.search(jql.as_deref());
        }),
        Command::Create { fields } => {
            let fields = into_map(fields);
            with_client(&config, cli.profile.as_deref(), true, |c| {
                c.create(&fields);
            })
        }
        Command::Update { key, fields } => {
            let fields = into_map(fields);
            with_client(&config, cli.profile.as_deref(), false, |c| {
                c.update(&key, &fields);
            })
        }
    }
}

fn into_map(fields: Vec<(String, Value)>) -> Map<String, Value> {
    fields.into_iter().collect()
}

/// Build a client for the selected profile, run `operation`, print the result.
///
/// `require_issue` marks operations whose success is an issue-shaped response.
fn with_client<F>(
    config: &Config,
    profile: Option<&str>,
    require_issue: bool,
    operation: F,
) -> Result<bool>
where
    F: FnOnce(&mut JiraClient),
{
    let profile = config.profile(profile)?;
    let password = config::resolve_password(profile)?;
    let session = profile.session(&password)?;

    let mut client = JiraClient::with_session(session, config.settings.client_options())?;
    operation(&mut client);

    let body = client
        .last_response()
        .map(|r| r.to_value())
        .unwrap_or(Value::Null);
    let rendered = serde_json::to_string_pretty(&body).map_err(|e| AppError::other(e.to_string()))?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", rendered)?;

    let failed = client.has_error_messages() || (require_issue && client.is_error_response());
    if failed {
        let mut stderr = io::stderr().lock();
        for message in client.error_collection() {
            writeln!(stderr, "error: {}", message)?;
        }
    }

    Ok(!failed)
}

fn store_token(config: &Config, profile: &str) -> Result<bool> {
    let profile = config.profile(Some(profile))?;

    eprint!("Password for {}@{}: ", profile.username, profile.host);
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(AppError::other("No password given."));
    }

    auth::store_token(&profile.name, password)?;
    info!(profile = %profile.name, "Stored password in keyring");
    eprintln!("Stored password for profile '{}'.", profile.name);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_field_json_value() {
        assert_eq!(
            parse_field(r#"labels=["a","b"]"#).unwrap(),
            ("labels".to_string(), json!(["a", "b"]))
        );
        assert_eq!(
            parse_field(r#"project={"key":"PROJ"}"#).unwrap(),
            ("project".to_string(), json!({"key": "PROJ"}))
        );
    }

    #[test]
    fn test_parse_field_plain_string() {
        assert_eq!(
            parse_field("summary=Login page is broken").unwrap(),
            ("summary".to_string(), json!("Login page is broken"))
        );
    }

    #[test]
    fn test_parse_field_keeps_equals_in_value() {
        assert_eq!(
            parse_field("description=a=b").unwrap(),
            ("description".to_string(), json!("a=b"))
        );
    }

    #[test]
    fn test_parse_field_rejects_missing_separator() {
        assert!(parse_field("summary").is_err());
        assert!(parse_field("=value").is_err());
    }

    #[test]
    fn test_cli_parses_update() {
        let cli = Cli::try_parse_from([
            "jira-lite",
            "--profile",
            "work",
            "update",
            "PROJ-1",
            "-f",
            "summary=New",
            "--field",
            "priority={\"name\":\"High\"}",
        ])
        .unwrap();

        assert_eq!(cli.profile.as_deref(), Some("work"));
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Command::Update { key, fields } => {
                assert_eq!(key, "PROJ-1");
                let map = into_map(fields);
                assert_eq!(map["summary"], json!("New"));
                assert_eq!(map["priority"], json!({"name": "High"}));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_search_without_jql() {
        let cli = Cli::try_parse_from(["jira-lite", "search"]).unwrap();
        assert!(matches!(cli.command, Command::Search { jql: None }));
    }

    #[test]
    fn test_cli_counts_verbosity() {
        let cli = Cli::try_parse_from(["jira-lite", "-vv", "search", "project = PROJ"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["jira-lite", "search", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_cli_create_requires_fields() {
        assert!(Cli::try_parse_from(["jira-lite", "create"]).is_err());
    }
}
