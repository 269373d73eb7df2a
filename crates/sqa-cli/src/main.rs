use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sqa_core::{StageError, StoryFetcher};
use sqa_runner::{build_http_client, tracker_fetcher, Config, Runner};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "storyqa", version)]
struct Cli {
    /// TOML settings file (default: ./storyqa.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch stories, generate and validate test cases, write the report and print JSON
    Run {
        /// Also produce Playwright scripts and CI workflows
        #[arg(long)]
        emit: bool,
        /// Report file path (overrides config)
        #[arg(long)]
        report: Option<String>,
        /// Write emitted artifacts under this directory (implies --emit)
        #[arg(long)]
        artifacts_dir: Option<String>,
        /// Run offline against sample stories and template test cases
        #[arg(long)]
        demo: bool,
    },

    /// Fetch user stories only and print them as JSON
    Fetch,

    /// Check that required settings are present
    Doctor,
}

impl Command {
    fn failure_label(&self) -> &'static str {
        match self {
            Command::Run { .. } => "pipeline failed",
            Command::Fetch => "fetch failed",
            Command::Doctor => "configuration check failed",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let label = cli.cmd.failure_label();
    match dispatch(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{label}: {e:#}");
            ExitCode::from(failure_code(&e))
        }
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<u8> {
    let mut cfg = Config::load(cli.config.as_deref())?;

    match cli.cmd {
        Command::Run {
            emit,
            report,
            artifacts_dir,
            demo,
        } => {
            apply_run_overrides(&mut cfg, emit, report, artifacts_dir);
            let runner = if demo { Runner::demo(&cfg) } else { Runner::open(&cfg)? };
            let report = runner.run_once().await?;

            println!("{}", serde_json::to_string_pretty(&report.output)?);
            if !report.output.generation_failures.is_empty() {
                warn!(
                    "{} stories produced no test case",
                    report.output.generation_failures.len()
                );
            }
            info!(run_id = %report.run_id, "run complete");
            Ok(report.exit_code())
        }
        Command::Fetch => {
            cfg.require_tracker_settings()?;
            let fetcher = tracker_fetcher(&cfg, build_http_client(&cfg)?);
            let stories = fetcher.fetch_stories().await?;
            println!("{}", serde_json::to_string_pretty(&stories)?);
            Ok(0)
        }
        Command::Doctor => {
            let missing = cfg.missing_settings();
            for name in &missing {
                println!("missing: {name}");
            }
            println!("report: {}", cfg.report_path().display());
            if let Some(dir) = cfg.artifacts_dir() {
                println!("artifacts: {}", dir.display());
            }
            cfg.require_settings()?;
            println!("OK");
            Ok(0)
        }
    }
}

fn apply_run_overrides(cfg: &mut Config, emit: bool, report: Option<String>, artifacts_dir: Option<String>) {
    if let Some(path) = report {
        cfg.output.report_path = path;
    }
    if let Some(dir) = artifacts_dir {
        cfg.output.artifacts_dir = Some(dir);
        cfg.output.emit_artifacts = true;
    }
    if emit {
        cfg.output.emit_artifacts = true;
    }
}

/// Stage errors keep their category's exit code; anything else exits 1.
fn failure_code(e: &anyhow::Error) -> u8 {
    e.downcast_ref::<StageError>().map(StageError::exit_code).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use sqa_core::Service;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::parse_from(["storyqa", "run", "--demo", "--report", "out.txt", "--config", "qa.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("qa.toml")));
        match cli.cmd {
            Command::Run { demo, report, emit, .. } => {
                assert!(demo);
                assert!(!emit);
                assert_eq!(report.as_deref(), Some("out.txt"));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn failure_message_names_the_command() {
        let label = |args: &[&str]| Cli::parse_from(args).cmd.failure_label();
        assert_eq!(label(&["storyqa", "run"]), "pipeline failed");
        assert_eq!(label(&["storyqa", "fetch"]), "fetch failed");
        assert_eq!(label(&["storyqa", "doctor"]), "configuration check failed");
    }

    #[test]
    fn artifacts_dir_turns_on_emission() {
        let mut cfg = Config::default();
        apply_run_overrides(&mut cfg, false, None, Some("out/artifacts".into()));
        assert!(cfg.output.emit_artifacts);
        assert_eq!(cfg.artifacts_dir(), Some(PathBuf::from("out/artifacts")));
        assert_eq!(cfg.output.report_path, "generated_test_cases.txt");
    }

    #[test]
    fn failure_code_follows_stage_category() {
        let unauthorized = anyhow::Error::from(StageError::Request {
            service: Service::Tracker,
            status: 401,
            body: String::new(),
        });
        assert_eq!(failure_code(&unauthorized), 3);
        assert_eq!(failure_code(&anyhow::anyhow!("stdout closed")), 1);
    }
}
