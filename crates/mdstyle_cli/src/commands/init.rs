//! Init command implementation

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use tracing::info;
use mdstyle_core::{CONFIG_FILES, LinterConfig};

use crate::cli::Cli;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum InitError {
    #[error("Config file {0} already exists")]
    #[diagnostic(help("Use --force to overwrite it."))]
    AlreadyExists(PathBuf),
    #[error("Failed to write {0}")]
    Write(PathBuf, #[source] std::io::Error),
}

pub fn run_init(cli: &Cli, force: bool) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILES[0]));
    let contents = LinterConfig::default_file_contents().into_diagnostic()?;

    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options.open(&config_path).map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists => InitError::AlreadyExists(config_path.clone()),
        _ => InitError::Write(config_path.clone(), e),
    })?;
    file.write_all(contents.as_bytes())
        .map_err(|e| InitError::Write(config_path.clone(), e))?;

    info!("Created {}", config_path.display());
    Ok(())
}
