use super::Session;
use crate::output::print_json;
use academy_core::backup::validate_backup;
use anyhow::Context;
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum BackupSubcommand {
    /// Write a backup document of all progress
    Export {
        /// Destination file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Check a backup file without importing it
    Validate { file: PathBuf },
    /// Replace all progress with the contents of a backup file
    Import { file: PathBuf },
}

pub fn run(root: &Path, subcmd: BackupSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        BackupSubcommand::Export { output } => export(root, output.as_deref(), json),
        BackupSubcommand::Validate { file } => validate(&file, json),
        BackupSubcommand::Import { file } => import(root, &file, json),
    }
}

fn export(root: &Path, output: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root)?;
    let backup = session.tracker().export_backup();
    let doc = backup.to_json()?;

    let Some(path) = output else {
        println!("{doc}");
        return Ok(());
    };
    // A directory target gets the dated default file name.
    let path = if path.is_dir() {
        path.join(backup.file_name())
    } else {
        path.to_path_buf()
    };
    academy_core::io::atomic_write(&path, doc.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;

    if json {
        print_json(&serde_json::json!({ "exported": path.display().to_string() }))?;
    } else {
        println!("Progress exported to {}", path.display());
    }
    Ok(())
}

fn read(file: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}

fn validate(file: &Path, json: bool) -> anyhow::Result<()> {
    let validation = validate_backup(&read(file)?);
    let error = validation.error.as_ref().map(|e| e.to_string());
    if json {
        print_json(&serde_json::json!({ "valid": validation.valid, "error": error }))?;
    } else if validation.valid {
        println!("{} is a valid backup", file.display());
    }
    match error {
        Some(e) => anyhow::bail!("{} is not a usable backup: {e}", file.display()),
        None => Ok(()),
    }
}

fn import(root: &Path, file: &Path, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root)?;
    let text = read(file)?;
    let backup = session
        .tracker()
        .import_backup(&text)
        .with_context(|| format!("could not import {}", file.display()))?;

    if json {
        print_json(&serde_json::json!({
            "imported": file.display().to_string(),
            "exported_at": backup.exported_at,
            "modules": backup.modules.len(),
            "roles": backup.roles.len(),
        }))?;
    } else {
        println!(
            "Restored progress from {} (exported {})",
            file.display(),
            backup.exported_at.format("%Y-%m-%d %H:%M UTC")
        );
    }
    Ok(())
}
