use crate::output::print_json;
use academy_core::{config::Config, paths};
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let dir = paths::academy_dir(root);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let created = Config::write_default(root).context("failed to write config")?;

    if json {
        print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "config_created": created,
        }))?;
    } else if created {
        println!("Initialized academy data in {}", dir.display());
    } else {
        println!("Already initialized: {}", dir.display());
    }
    Ok(())
}
