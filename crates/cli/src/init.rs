//! `lts init`: write a starter configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use dialoguer::Confirm;
use lts_core::{CONFIG_FILE_NAME, STARTER_CONFIG};
use tracing::debug;

use crate::common::exit_code;

/// Arguments of `lts init`.
#[derive(Args, Debug, Clone, Default)]
pub struct InitArgs {
    #[arg(
        value_name = "DIR",
        help = "Directory to create the config file in. Defaults to the current directory"
    )]
    pub dir: Option<PathBuf>,
    #[arg(long, short = 'f', help = "Overwrite an existing config file without asking")]
    pub force: bool,
}

/// Run `lts init` and return its exit code.
pub fn run(args: InitArgs) -> i32 {
    exit_code(run_inner(args))
}

fn run_inner(args: InitArgs) -> Result<(), String> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(CONFIG_FILE_NAME);

    if path.exists() && !args.force {
        let overwrite = Confirm::new()
            .with_prompt(format!(
                "{} already exists. Overwrite it?",
                style(path.display()).cyan()
            ))
            .default(false)
            .interact()
            .map_err(|err| format!("Failed to read overwrite choice: {err}"))?;
        if !overwrite {
            println!("Kept existing {}", path.display());
            return Ok(());
        }
    }

    write_starter_config(&path)?;
    println!(
        "✅ Created {}. Fill in server, token and output, then run {}",
        style(path.display()).cyan(),
        style("lts gen").bold()
    );
    Ok(())
}

fn write_starter_config(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| format!("Failed to create {}: {err}", parent.display()))?;
    }
    fs::write(path, STARTER_CONFIG)
        .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
    debug!(path = %path.display(), "Wrote starter configuration");
    Ok(())
}
