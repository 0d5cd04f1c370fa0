//! Command line interface
//!
//! Usage:
//!     platform-context --catalog ./dump search таблица значений
//!     platform-context --catalog ./dump member ТаблицаЗначений Добавить
//!     platform-context --catalog ./dump export ./out --format xml
//!     platform-context --catalog ./dump serve

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use platform_context_core::catalog::JsonCatalog;
use platform_context_core::{EngineConfig, PlatformApi};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::export::{export_catalog, ExportFormat};
use crate::format;
use crate::mcp::McpServer;

#[derive(Parser, Debug)]
#[command(name = "platform-context")]
#[command(about = "Search the platform API catalog and serve it to MCP clients")]
#[command(version)]
pub struct Cli {
    /// Catalog directory (global-methods.json, global-properties.json, types.json)
    #[arg(long, env = "PLATFORM_CONTEXT_PATH")]
    pub catalog: PathBuf,

    /// Log level (debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable the edit-distance fallback when nothing else matches
    #[arg(long)]
    pub fuzzy: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ranked search by name or phrase
    Search {
        /// Query words
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Element kind (method, property, type or a synonym)
        #[arg(long)]
        kind: Option<String>,

        /// Maximum number of results
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Print hits as JSON
        #[arg(long)]
        json: bool,
    },

    /// Element with the exact given name
    Info {
        name: String,

        #[arg(long)]
        kind: Option<String>,
    },

    /// Method or property declared by a type
    Member {
        #[arg(value_name = "TYPE")]
        type_name: String,

        #[arg(value_name = "MEMBER")]
        member_name: String,
    },

    /// All members of a type
    Members {
        #[arg(value_name = "TYPE")]
        type_name: String,
    },

    /// Constructor signatures of a type
    Constructors {
        #[arg(value_name = "TYPE")]
        type_name: String,
    },

    /// Write the catalog to a directory
    Export {
        output: PathBuf,

        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,
    },

    /// Run the MCP tool server on stdio
    Serve {
        /// Per-call timeout in milliseconds
        #[arg(long, env = "PLATFORM_CONTEXT_TOOL_TIMEOUT_MS", default_value = "10000")]
        timeout_ms: u64,
    },

    /// Print index state and counters as JSON
    Status,
}

/// Execute a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let api = Arc::new(build_api(&cli)?);

    match cli.command {
        Command::Search {
            query,
            kind,
            limit,
            json,
        } => {
            let query = query.join(" ");
            let hits = api.search(&query, kind.as_deref(), limit)?;
            if json {
                print_json(&hits)?;
            } else {
                println!("{}", format::search_results(&query, &hits));
            }
        }
        Command::Info { name, kind } => {
            let element = api.info(&name, kind.as_deref())?;
            println!("{}", format::element_card(&element, None));
        }
        Command::Member {
            type_name,
            member_name,
        } => {
            let hit = api.get_member(&type_name, &member_name)?;
            println!("{}", format::member_card(&hit));
        }
        Command::Members { type_name } => {
            let ty = api.get_members(&type_name)?;
            println!("{}", format::type_members(&ty));
        }
        Command::Constructors { type_name } => {
            let constructors = api.get_constructors(&type_name)?;
            println!("{}", format::constructors(type_name.trim(), &constructors));
        }
        Command::Export { output, format } => {
            let snapshot = api.snapshot()?;
            let exporter = format.exporter();
            for path in export_catalog(&snapshot.index, exporter.as_ref(), &output)? {
                println!("{}", path.display());
            }
        }
        Command::Serve { timeout_ms } => {
            McpServer::new(api, Duration::from_millis(timeout_ms))
                .run_stdio()
                .await?;
        }
        Command::Status => {
            if let Err(e) = api.snapshot() {
                debug!(error = %e, "Index unavailable");
            }
            print_json(&api.status())?;
        }
    }
    Ok(())
}

/// Message for a failed command: API errors use the Markdown rendering.
pub fn report(err: &Error) -> String {
    match err {
        Error::Api(e) => format::error(e),
        other => format!("error: {}", other),
    }
}

fn build_api(cli: &Cli) -> Result<PlatformApi> {
    if !cli.catalog.is_dir() {
        return Err(Error::Config(format!(
            "catalog directory not found: {}",
            cli.catalog.display()
        )));
    }

    let mut config = EngineConfig::from_env();
    if cli.fuzzy {
        config.fuzzy_fallback = true;
    }
    info!(
        catalog = %cli.catalog.display(),
        fuzzy = config.fuzzy_fallback,
        "Using catalog"
    );

    Ok(PlatformApi::with_config(
        Arc::new(JsonCatalog::new(&cli.catalog)),
        config,
    ))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_context_core::ApiError;

    #[test]
    fn test_search_joins_words() {
        let cli = Cli::try_parse_from([
            "platform-context",
            "--catalog",
            "/tmp/dump",
            "search",
            "таблица",
            "значений",
            "--kind",
            "тип",
            "--limit",
            "-1",
        ])
        .unwrap();

        assert_eq!(cli.catalog, PathBuf::from("/tmp/dump"));
        match cli.command {
            Command::Search {
                query, kind, limit, ..
            } => {
                assert_eq!(query.join(" "), "таблица значений");
                assert_eq!(kind.as_deref(), Some("тип"));
                assert_eq!(limit, Some(-1));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_export_format_values() {
        let cli = Cli::try_parse_from([
            "platform-context",
            "--catalog",
            "/tmp/dump",
            "export",
            "/tmp/out",
            "--format",
            "markdown",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Command::Export {
                format: ExportFormat::Markdown,
                ..
            }
        ));
        assert!(Cli::try_parse_from([
            "platform-context",
            "--catalog",
            "/tmp/dump",
            "export",
            "/tmp/out",
            "--format",
            "yaml",
        ])
        .is_err());
    }

    #[test]
    fn test_member_takes_two_names() {
        let cli = Cli::try_parse_from([
            "platform-context",
            "--catalog",
            "/tmp/dump",
            "member",
            "Массив",
            "Добавить",
        ])
        .unwrap();

        match cli.command {
            Command::Member {
                type_name,
                member_name,
            } => {
                assert_eq!(type_name, "Массив");
                assert_eq!(member_name, "Добавить");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_report_renders_api_errors() {
        let err = Error::Api(ApiError::TypeNotFound("Структура".to_string()));
        assert_eq!(report(&err), "❌ **Not found:** type not found: Структура");

        let err = Error::Config("catalog directory not found: /x".to_string());
        assert_eq!(
            report(&err),
            "error: configuration error: catalog directory not found: /x"
        );
    }

    #[tokio::test]
    async fn test_missing_catalog_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "platform-context".into(),
            "--catalog".into(),
            dir.path().join("absent").into_os_string(),
            "status".into(),
        ])
        .unwrap();

        assert!(matches!(run(cli).await, Err(Error::Config(_))));
    }
}
