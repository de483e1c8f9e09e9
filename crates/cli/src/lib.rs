//! Command surface of `lts`: argument parsing, logging setup and the `init` / `gen`
//! commands.

#![forbid(unsafe_code)]
#![deny(warnings, unused_must_use, dead_code, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod common;
mod generate;
mod init;
mod writer;

const LOG_ENV: &str = "LTS_LOG";
const LOG_TARGETS: &[&str] = &["lts_core", "lts_cli"];

#[derive(Parser, Debug)]
#[command(
    name = "lts",
    version,
    about = "Generate TypeScript types and service functions from YApi documentation"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 🎬 Write a starter lts.config.toml
    Init(init::InitArgs),
    /// 🔨 Generate code for every configured project (default)
    Gen(generate::GenArgs),
}

/// Entry point used by the `lts` binary.
pub fn run_cli(args: Vec<String>) -> i32 {
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to create tokio runtime: {err}");
            return 1;
        }
    };

    runtime.block_on(run_cli_async(args))
}

async fn run_cli_async(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Init(init_args)) => init::run(init_args),
            Some(Commands::Gen(gen_args)) => generate::run(gen_args).await,
            None => generate::run(generate::GenArgs::default()).await,
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

fn init_tracing() {
    // LTS_LOG is either a plain level applied to the lts crates or a full filter spec
    let filter = match std::env::var(LOG_ENV) {
        Ok(level) if is_plain_level(&level) => targets_filter(&level),
        Ok(spec) => spec,
        Err(_) => targets_filter("info"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn targets_filter(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={}", level.to_ascii_lowercase()))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_level_filter() {
        assert!(is_plain_level("DEBUG"));
        assert!(!is_plain_level("lts_core=debug"));
        assert_eq!(targets_filter("Warn"), "lts_core=warn,lts_cli=warn");
    }

    #[test]
    fn test_gen_is_default_command() {
        let cli = Cli::try_parse_from(["lts"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["lts", "gen", "--config", "x.toml", "--yes"]).unwrap();
        assert!(matches!(
            &cli.command,
            Some(Commands::Gen(args))
                if args.yes && args.config.as_deref() == Some(std::path::Path::new("x.toml"))
        ));
    }
}
