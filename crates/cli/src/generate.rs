//! `lts gen`: fetch, synthesize, write and format.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use lts_core::{CONFIG_FILE_NAME, ProjectConfig, RunConfig, TransportError, YapiClient, render, run_all};
use tracing::{debug, error};

use crate::common::{format_elapsed_ms, run_command, run_with_spinner_async};
use crate::writer::{format_files, prompt_action, resolve_actions, write_files};

/// Arguments of `lts gen`.
#[derive(Args, Debug, Clone, Default)]
pub struct GenArgs {
    #[arg(
        long,
        short = 'c',
        value_name = "PATH",
        help = "Path to the config file. Defaults to ./lts.config.toml"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        short = 'y',
        help = "Merge into non-empty output directories without asking"
    )]
    pub yes: bool,
    #[arg(long, help = "Do not run prettier on the generated files")]
    pub no_format: bool,
}

/// Run `lts gen` and return its exit code.
pub async fn run(args: GenArgs) -> i32 {
    run_command(|| run_inner(args)).await
}

async fn run_inner(args: GenArgs) -> Result<(), String> {
    let start = Instant::now();
    let path = args
        .config
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    let config = RunConfig::load(&path).map_err(|err| err.to_string())?;
    for warning in &config.warnings {
        eprintln!("{} {warning}", style("warning:").yellow().bold());
    }

    let (jobs, mut failures) = build_jobs(&config.projects, |project| {
        YapiClient::new(&project.server, &project.token)
    });
    debug!(entries = jobs.len(), config = %path.display(), "Starting generation");

    let outcome = run_with_spinner_async("🏗  Generating code...", "✅ Code generated", || async {
        Ok(run_all(&jobs).await)
    })
    .await?;
    failures.extend(
        outcome
            .failures
            .iter()
            .map(|(index, err)| (*index, err.to_string())),
    );
    failures.sort_by_key(|(index, _)| *index);
    for (index, err) in &failures {
        error!(index, error = %err, "Configuration entry failed");
        eprintln!("{} config entry [{index}]: {err}", style("error:").red().bold());
    }

    let files = render(&outcome.tree);
    if files.is_empty() {
        println!("Nothing to generate");
    } else {
        let actions = resolve_actions(&config.context, &files, args.yes, prompt_action)?;
        let report = run_with_spinner_async("✍️  Writing files...", "✅ Files written", || async {
            let report = write_files(&config.context, &files, &actions);
            if let Ok(report) = &report
                && !args.no_format
            {
                format_files(&report.written).await;
            }
            report
        })
        .await?;
        for output in &report.skipped {
            println!("Skipped {}", style(output).cyan());
        }
        println!(
            "😄 Generated {} files ({})",
            report.written.len(),
            format_elapsed_ms(start)
        );
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "{} of {} configuration entries failed",
            failures.len(),
            config.projects.len()
        ))
    }
}

/// Pair every entry with its client. An entry whose client cannot be built is reported as
/// a failure of that entry only.
fn build_jobs<S>(
    projects: &[ProjectConfig],
    make_client: impl Fn(&ProjectConfig) -> Result<S, TransportError>,
) -> (Vec<(S, ProjectConfig)>, Vec<(usize, String)>) {
    let mut jobs = Vec::with_capacity(projects.len());
    let mut failures = Vec::new();
    for project in projects {
        match make_client(project) {
            Ok(client) => jobs.push((client, project.clone())),
            Err(err) => failures.push((project.index, err.to_string())),
        }
    }
    (jobs, failures)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_failure_only_fails_its_entry() {
        let projects = vec![
            ProjectConfig::new(0, "http://a.example.com", "t0", "src/a"),
            ProjectConfig::new(1, "http://b.example.com", "t1", "src/b"),
            ProjectConfig::new(2, "http://c.example.com", "t2", "src/c"),
        ];
        let (jobs, failures) = build_jobs(&projects, |project| {
            if project.index == 1 {
                Err(TransportError::Status {
                    url: project.server.clone(),
                    status: 500,
                })
            } else {
                Ok(project.server.clone())
            }
        });

        let servers: Vec<_> = jobs.iter().map(|(client, _)| client.as_str()).collect();
        assert_eq!(servers, vec!["http://a.example.com", "http://c.example.com"]);
        assert_eq!(jobs[1].1.index, 2);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, 1);
        assert!(failures[0].1.contains("http://b.example.com"));
    }
}
