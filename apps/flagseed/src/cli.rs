//! # CLI
//!
//! Command-line surface of the `flagseed` binary.
//!
//! Run with no arguments it seeds `feature_flags.redb` in the working
//! directory. `--db` (or `FLAGSEED_DB`) points it at another store.

use crate::client::{DEFAULT_DB_PATH, StoreConfig};
use crate::error::Result;
use crate::seeder::{self, SeedConfig, SeedReport};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

/// Seed the default feature flags into the flag store.
#[derive(Debug, Parser)]
#[command(name = "flagseed", version, about)]
pub struct Cli {
    /// Flag store file.
    #[arg(long, env = "FLAGSEED_DB", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Build the run configuration from parsed arguments.
    #[must_use]
    pub fn seed_config(&self) -> SeedConfig {
        SeedConfig {
            store: StoreConfig {
                path: self.db.clone(),
            },
        }
    }
}

/// Render a report for stdout.
pub fn render_report(report: &SeedReport, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }
    let mut out = String::from("Feature flags initialized successfully.\n");
    for key in &report.keys {
        out.push_str("  ");
        out.push_str(key);
        out.push('\n');
    }
    Ok(out)
}

/// Write a rendered report to `out`.
pub fn write_report(out: &mut impl Write, report: &SeedReport, json: bool) -> Result<()> {
    let mut rendered = render_report(report, json)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Seed the configured store and print the report to stdout.
pub async fn cmd_seed(config: &SeedConfig, json: bool) -> Result<SeedReport> {
    let report = seeder::run(config).await?;
    write_report(&mut std::io::stdout().lock(), &report, json)?;
    Ok(report)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::SeedError;

    /// Writer standing in for a stdout whose reader has gone away.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn no_arguments_uses_default_store() {
        let cli = Cli::try_parse_from(["flagseed"]).unwrap();
        // FLAGSEED_DB may be set in the environment running the tests.
        if std::env::var_os("FLAGSEED_DB").is_none() {
            assert_eq!(cli.db, PathBuf::from(DEFAULT_DB_PATH));
        }
        assert!(!cli.json);
    }

    #[test]
    fn db_and_json_flags() {
        let cli = Cli::try_parse_from(["flagseed", "--db", "/tmp/x.redb", "--json"]).unwrap();
        assert_eq!(cli.seed_config().store.path, PathBuf::from("/tmp/x.redb"));
        assert!(cli.json);
    }

    #[test]
    fn unknown_argument_is_rejected() {
        assert!(Cli::try_parse_from(["flagseed", "--force"]).is_err());
    }

    #[test]
    fn text_report_lists_keys() {
        let report = SeedReport {
            keys: vec!["custom_agents".to_string(), "pipedream".to_string()],
        };
        let text = render_report(&report, false).unwrap();
        assert_eq!(
            text,
            "Feature flags initialized successfully.\n  custom_agents\n  pipedream\n"
        );
    }

    #[test]
    fn write_report_appends_newline_to_json() {
        let report = SeedReport {
            keys: vec!["pipedream".to_string()],
        };
        let mut out = Vec::new();
        write_report(&mut out, &report, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn closed_pipe_is_an_error() {
        let report = SeedReport {
            keys: vec!["custom_agents".to_string()],
        };
        let result = write_report(&mut ClosedPipe, &report, false);
        match result {
            Err(SeedError::Write(e)) => assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe),
            other => panic!("expected write error, got {other:?}"),
        }
    }

    #[test]
    fn json_report() {
        let report = SeedReport {
            keys: vec!["mcp_module".to_string()],
        };
        let json = render_report(&report, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["keys"][0], "mcp_module");
    }
}
