//! One handle over the store, catalog and config.
//!
//! Every mutation reads its ledger, changes it and writes it back before
//! returning. Derived views (badges, percentages, certificate state) are
//! computed from a fresh snapshot on each call.

use crate::backup::{self, ProgressBackup};
use crate::badge::{self, BADGES};
use crate::catalog::Catalog;
use crate::completion::{role_completion_progress, ProgressSnapshot, RoleCompletionProgress};
use crate::config::Config;
use crate::error::{AcademyError, Result};
use crate::exam::{ExamLedger, ExamRecord};
use crate::modules::{ModuleProgress, QuizOutcome};
use crate::paths::LEDGER_KEYS;
use crate::preferences::{Preferences, PreferencesUpdate, UserPreferences};
use crate::role_progress::{RoleProgressData, RoleProgressLedger};
use crate::store::Store;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};

pub struct ProgressTracker<'s> {
    store: &'s dyn Store,
    catalog: Catalog,
    config: Config,
}

impl<'s> ProgressTracker<'s> {
    pub fn new(store: &'s dyn Store, catalog: Catalog, config: Config) -> Self {
        Self {
            store,
            catalog,
            config,
        }
    }

    /// Tracker over the built-in catalog with default config.
    pub fn with_defaults(store: &'s dyn Store) -> Self {
        Self::new(store, Catalog::builtin(), Config::default())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Preferences
    // -----------------------------------------------------------------------

    pub fn preferences(&self) -> UserPreferences {
        Preferences::load(self.store)
    }

    pub fn save_preferences(&self, update: PreferencesUpdate) -> Result<UserPreferences> {
        Preferences::save(self.store, update)
    }

    /// Forget preferences only; learning progress is kept.
    pub fn reset_preferences(&self) -> Result<UserPreferences> {
        Preferences::reset(self.store)?;
        tracing::info!("preferences reset");
        Ok(self.preferences())
    }

    // -----------------------------------------------------------------------
    // Modules
    // -----------------------------------------------------------------------

    /// Returns true when the module was not already complete.
    pub fn mark_module_complete(&self, module_id: u32) -> Result<bool> {
        if self.catalog.module(module_id).is_none() {
            return Err(AcademyError::ModuleNotFound(module_id));
        }
        let mut modules = ModuleProgress::load(self.store);
        let added = modules.mark_complete(module_id);
        if added {
            modules.save(self.store)?;
            tracing::debug!(module_id, "module completed");
        }
        Ok(added)
    }

    pub fn is_module_complete(&self, module_id: u32) -> bool {
        ModuleProgress::load(self.store).is_complete(module_id)
    }

    pub fn completed_modules(&self) -> BTreeSet<u32> {
        ModuleProgress::load(self.store).completed_modules
    }

    /// Grade a module quiz; a pass marks the module complete.
    pub fn submit_quiz(&self, module_id: u32, correct: u32, total: u32) -> Result<QuizOutcome> {
        if self.catalog.module(module_id).is_none() {
            return Err(AcademyError::ModuleNotFound(module_id));
        }
        let outcome = QuizOutcome::grade(correct, total, self.config.quiz_pass_percent)?;
        if outcome.passed {
            self.mark_module_complete(module_id)?;
        }
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Role checklists
    // -----------------------------------------------------------------------

    /// Flip a task for `role`; returns whether it is now complete.
    pub fn toggle_task(&self, role: &str, task_id: &str) -> Result<bool> {
        let mut ledger = RoleProgressLedger::load(self.store);
        let done = ledger.toggle_task(role, task_id);
        ledger.save(self.store)?;
        tracing::debug!(role, task_id, done, "task toggled");
        Ok(done)
    }

    pub fn toggle_mission(&self, role: &str, mission_id: &str) -> Result<bool> {
        let mut ledger = RoleProgressLedger::load(self.store);
        let done = ledger.toggle_mission(role, mission_id);
        ledger.save(self.store)?;
        tracing::debug!(role, mission_id, done, "mission toggled");
        Ok(done)
    }

    pub fn is_task_complete(&self, role: &str, task_id: &str) -> bool {
        RoleProgressLedger::load(self.store).is_task_complete(role, task_id)
    }

    pub fn is_mission_complete(&self, role: &str, mission_id: &str) -> bool {
        RoleProgressLedger::load(self.store).is_mission_complete(role, mission_id)
    }

    pub fn role_progress(&self, role: &str) -> RoleProgressData {
        RoleProgressLedger::load(self.store).role(role)
    }

    pub fn all_progress(&self) -> BTreeMap<String, RoleProgressData> {
        RoleProgressLedger::load(self.store).roles
    }

    // -----------------------------------------------------------------------
    // Exams
    // -----------------------------------------------------------------------

    pub fn record_exam(&self, role: &str, correct: u32, total: u32) -> Result<ExamRecord> {
        if self.catalog.role(role).is_none() {
            return Err(AcademyError::UnknownRole(role.to_string()));
        }
        let outcome = QuizOutcome::grade(correct, total, self.config.exam_pass_percent)?;
        let mut exams = ExamLedger::load(self.store);
        let record = exams.record(role, &outcome, Utc::now()).clone();
        exams.save(self.store)?;
        Ok(record)
    }

    // -----------------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------------

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::load(self.store)
    }

    pub fn completion(&self, role: &str) -> RoleCompletionProgress {
        let snapshot = self.snapshot();
        role_completion_progress(&self.catalog, role, &snapshot.modules, &snapshot.role(role))
    }

    pub fn is_role_complete(&self, role: &str) -> bool {
        self.completion(role).is_complete()
    }

    pub fn earned_badges(&self, role: &str) -> BTreeSet<&'static str> {
        badge::evaluate_badges_for_role(&self.catalog, role, &self.snapshot())
    }

    pub fn achievements(&self) -> BTreeMap<String, BTreeSet<&'static str>> {
        badge::evaluate_all_roles(&self.catalog, &self.snapshot())
    }

    pub fn badge_count(&self) -> usize {
        BADGES.len()
    }

    // -----------------------------------------------------------------------
    // Backup / reset
    // -----------------------------------------------------------------------

    pub fn export_backup(&self) -> ProgressBackup {
        backup::build_backup(self.store)
    }

    /// Validate `text` and, if it is a backup, replace every ledger with it.
    pub fn import_backup(&self, text: &str) -> Result<ProgressBackup> {
        let backup = backup::validate_backup(text).into_result()?;
        backup::restore_progress(self.store, &backup)?;
        Ok(backup)
    }

    /// Forget all progress and preferences.
    pub fn reset(&self) -> Result<()> {
        for key in LEDGER_KEYS {
            self.store.remove(key)?;
        }
        tracing::info!("all progress reset");
        Ok(())
    }
}
