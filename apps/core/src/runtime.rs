use std::io::{BufReader, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::info;

use crate::config::{self, Config, ConfigError};
use crate::host::{HostError, HostSnapshot, SnapshotHost};
use crate::mode::Mode;
use crate::model::TabId;
use crate::session::{FinderSession, SessionError};
use crate::transport::FinderServer;

/// Fuzzy finder core for browser tabs, tab groups and bookmarks
#[derive(Parser, Debug)]
#[command(name = "tabhop-core", version, long_about = None)]
pub struct Cli {
    /// Path to a TOML or JSON5 config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Serve newline-delimited JSON requests on stdin/stdout (default)
    Serve,

    /// Run one query against a browser snapshot and print the rows
    Query {
        /// JSON snapshot with tabs, tabGroups and bookmarkTree
        #[arg(short, long, value_name = "FILE")]
        snapshot: PathBuf,

        /// tabs, groups, bookmark-folders, bookmark-opener or a toggle-* command
        #[arg(short, long, default_value = "tabs", value_parser = parse_mode)]
        mode: Mode,

        /// Tab to treat as active (overrides the snapshot)
        #[arg(long, value_name = "ID")]
        current_tab: Option<i64>,

        /// Previously active tab, pinned first when enabled in config
        #[arg(long, value_name = "ID")]
        previous_tab: Option<i64>,

        /// Query text; omitted means the unfiltered list
        #[arg(default_value = "")]
        query: String,
    },
}

#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    pub config: Config,
    pub command: Command,
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("host error: {0}")]
    Host(#[from] HostError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn parse_mode(value: &str) -> Result<Mode, String> {
    if let Some(mode) = Mode::parse(value) {
        return Ok(mode);
    }
    match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "tabs" => Ok(Mode::Tabs),
        "groups" => Ok(Mode::Groups),
        "bookmark-folders" => Ok(Mode::BookmarkFolders),
        "bookmark-opener" | "bookmarks" => Ok(Mode::BookmarkOpener),
        _ => Err(format!("unknown mode '{value}'")),
    }
}

/// Loads the config and applies command-line overrides.
pub fn resolve_options(cli: Cli) -> Result<RuntimeOptions, ConfigError> {
    let mut config = config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
        config::validate(&config)?;
    }
    Ok(RuntimeOptions {
        config,
        command: cli.command.unwrap_or(Command::Serve),
    })
}

pub fn run_with_options(options: RuntimeOptions) -> Result<(), RuntimeError> {
    if let Err(error) = crate::logging::init(&options.config.log_level) {
        eprintln!("[tabhop-core] logging disabled: {error}");
    }
    info!(
        config_path = %options.config.config_path.display(),
        matcher = ?options.config.matcher,
        "startup"
    );

    match options.command {
        Command::Serve => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let mut server = FinderServer::new(options.config);
            server.serve(BufReader::new(stdin.lock()), stdout.lock())?;
            Ok(())
        }
        Command::Query {
            snapshot,
            mode,
            current_tab,
            previous_tab,
            query,
        } => {
            let mut loaded = HostSnapshot::load(&snapshot)?;
            if let Some(id) = current_tab {
                loaded.current_tab_id = Some(TabId(id));
            }
            let lines = run_query(
                &options.config,
                mode,
                loaded,
                previous_tab.map(TabId),
                &query,
            )?;

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for line in lines {
                writeln!(out, "{line}")?;
            }
            Ok(())
        }
    }
}

/// One-shot query: opens a session, applies `query` and formats the rows,
/// one line each, the selected row prefixed with `>`.
pub fn run_query(
    config: &Config,
    mode: Mode,
    snapshot: HostSnapshot,
    previous_tab: Option<TabId>,
    query: &str,
) -> Result<Vec<String>, RuntimeError> {
    let host = SnapshotHost::new(snapshot);
    let mut session = FinderSession::open(mode, &host, config)?.with_previous_tab(previous_tab);
    session.set_query(query);

    let rows = session.rows();
    if rows.is_empty() {
        return Ok(vec![mode.empty_message().to_string()]);
    }

    let selected = session.selected_index();
    Ok(rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let cursor = if selected == Some(index) { '>' } else { ' ' };
            let mut line = format!("{cursor} {}{}", "  ".repeat(row.level), row.label);
            if let Some(detail) = &row.detail {
                line.push_str("  ");
                line.push_str(detail);
            }
            if let Some(note) = &row.note {
                line.push_str("  [");
                line.push_str(note);
                line.push(']');
            }
            line
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{parse_mode, run_query, Cli, Command};
    use crate::config::Config;
    use crate::host::SnapshotHost;
    use crate::mode::Mode;
    use crate::model::TabId;

    fn fixture() -> crate::host::HostSnapshot {
        SnapshotHost::deterministic_fixture().snapshot().clone()
    }

    #[test]
    fn mode_accepts_names_and_commands() {
        assert_eq!(parse_mode("groups"), Ok(Mode::Groups));
        assert_eq!(parse_mode("bookmark_opener"), Ok(Mode::BookmarkOpener));
        assert_eq!(parse_mode("toggle-bookmark-finder"), Ok(Mode::BookmarkFolders));
        assert!(parse_mode("windows").is_err());
    }

    #[test]
    fn cli_defaults_to_serve() {
        let cli = Cli::try_parse_from(["tabhop-core"]).unwrap();
        assert_eq!(cli.command, None);

        let cli = Cli::try_parse_from([
            "tabhop-core",
            "query",
            "--snapshot",
            "snap.json",
            "--mode",
            "groups",
            "wo",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Query { mode, query, .. }) => {
                assert_eq!(mode, Mode::Groups);
                assert_eq!(query, "wo");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn query_marks_the_selected_row() {
        let lines = run_query(&Config::default(), Mode::Tabs, fixture(), None, "").unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("> Rust Documentation"));
        assert!(lines[0].ends_with("[Group: Research]"));
        assert!(lines[1].starts_with("  Issue tracker"));
    }

    #[test]
    fn query_without_matches_prints_empty_message() {
        let lines = run_query(
            &Config::default(),
            Mode::Tabs,
            fixture(),
            Some(TabId(2)),
            "qqqq",
        )
        .unwrap();
        assert_eq!(lines, vec!["No matching tabs found.".to_string()]);
    }
}
