pub mod backup;
pub mod badges;
pub mod catalog;
pub mod config;
pub mod exam;
pub mod init;
pub mod module;
pub mod prefs;
pub mod progress;
pub mod reset;
pub mod task;

use academy_core::{catalog::Catalog, config::Config, FileStore, ProgressTracker};
use anyhow::Context;
use std::path::Path;

/// Store, catalog and config opened for one command.
pub struct Session {
    store: FileStore,
    catalog: Catalog,
    config: Config,
}

impl Session {
    pub fn open(root: &Path) -> anyhow::Result<Self> {
        let store = FileStore::open(root)?;
        let config = Config::load(root).context("failed to load .academy/config.yaml")?;
        let catalog = config.catalog(root).context("failed to load content catalog")?;
        Ok(Self {
            store,
            catalog,
            config,
        })
    }

    pub fn tracker(&self) -> ProgressTracker<'_> {
        ProgressTracker::new(&self.store, self.catalog.clone(), self.config.clone())
    }
}

/// The explicit `--role`, else the role saved in preferences.
pub fn resolve_role(tracker: &ProgressTracker<'_>, explicit: Option<&str>) -> anyhow::Result<String> {
    if let Some(role) = explicit {
        return Ok(role.to_string());
    }
    tracker.preferences().role.ok_or_else(|| {
        anyhow::anyhow!("no role selected: pass --role or run 'academy prefs set --role <role>'")
    })
}
