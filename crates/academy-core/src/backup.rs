//! Export and import of every ledger as a single JSON document.
//!
//! Import is whole-document: a valid backup replaces preferences, module
//! completion, role checklists and exam results. Nothing is merged.

use crate::error::Result;
use crate::exam::{ExamLedger, ExamRecord};
use crate::modules::ModuleProgress;
use crate::paths::{EXAMS_KEY, MODULES_KEY, PREFERENCES_KEY, ROLES_KEY};
use crate::preferences::{Preferences, UserPreferences};
use crate::role_progress::{RoleProgressData, RoleProgressLedger};
use crate::store::Store;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

pub const BACKUP_FORMAT: &str = "cip-academy-backup";
pub const BACKUP_VERSION: u32 = 1;

const SECTIONS: &[&str] = &["preferences", "modules", "roles", "exams"];

// ---------------------------------------------------------------------------
// ProgressBackup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressBackup {
    pub format: String,
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub preferences: UserPreferences,
    pub modules: BTreeSet<u32>,
    pub roles: BTreeMap<String, RoleProgressData>,
    pub exams: BTreeMap<String, ExamRecord>,
}

impl ProgressBackup {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Suggested download name, e.g. `cip-academy-progress-2026-10-18.json`.
    pub fn file_name(&self) -> String {
        format!(
            "cip-academy-progress-{}.json",
            self.exported_at.format("%Y-%m-%d")
        )
    }
}

/// Snapshot every ledger in `store`.
pub fn build_backup(store: &dyn Store) -> ProgressBackup {
    build_backup_at(store, Utc::now())
}

pub fn build_backup_at(store: &dyn Store, now: DateTime<Utc>) -> ProgressBackup {
    ProgressBackup {
        format: BACKUP_FORMAT.to_string(),
        version: BACKUP_VERSION,
        exported_at: now,
        preferences: Preferences::load(store),
        modules: ModuleProgress::load(store).completed_modules,
        roles: RoleProgressLedger::load(store).roles,
        exams: ExamLedger::load(store).exams,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackupError {
    #[error("file is not valid JSON: {0}")]
    NotJson(String),

    #[error("backup must be a JSON object")]
    NotAnObject,

    #[error("missing '{0}' field; this does not look like a CIP Academy backup")]
    MissingField(&'static str),

    #[error("unrecognized backup format '{0}'")]
    UnknownFormat(String),

    #[error("backup version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u64, supported: u32 },

    #[error("malformed backup: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone)]
pub struct BackupValidation {
    pub valid: bool,
    pub error: Option<BackupError>,
    pub backup: Option<ProgressBackup>,
}

impl BackupValidation {
    fn ok(backup: ProgressBackup) -> Self {
        Self {
            valid: true,
            error: None,
            backup: Some(backup),
        }
    }

    fn rejected(error: BackupError) -> Self {
        Self {
            valid: false,
            error: Some(error),
            backup: None,
        }
    }

    pub fn into_result(self) -> std::result::Result<ProgressBackup, BackupError> {
        match (self.backup, self.error) {
            (Some(backup), _) => Ok(backup),
            (None, Some(e)) => Err(e),
            (None, None) => Err(BackupError::Malformed("empty validation result".to_string())),
        }
    }
}

/// Check `text` for the backup shape. Never panics on arbitrary input.
pub fn validate_backup(text: &str) -> BackupValidation {
    match parse_backup(text) {
        Ok(backup) => BackupValidation::ok(backup),
        Err(e) => {
            tracing::debug!(error = %e, "backup rejected");
            BackupValidation::rejected(e)
        }
    }
}

fn parse_backup(text: &str) -> std::result::Result<ProgressBackup, BackupError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| BackupError::NotJson(e.to_string()))?;
    let obj = value.as_object().ok_or(BackupError::NotAnObject)?;

    let format = obj.get("format").ok_or(BackupError::MissingField("format"))?;
    match format.as_str() {
        Some(BACKUP_FORMAT) => {}
        Some(other) => return Err(BackupError::UnknownFormat(other.to_string())),
        None => return Err(BackupError::UnknownFormat(format.to_string())),
    }

    let version = obj
        .get("version")
        .ok_or(BackupError::MissingField("version"))?
        .as_u64()
        .ok_or_else(|| BackupError::Malformed("'version' must be a positive integer".to_string()))?;
    if version == 0 || version > u64::from(BACKUP_VERSION) {
        return Err(BackupError::UnsupportedVersion {
            found: version,
            supported: BACKUP_VERSION,
        });
    }

    for &section in SECTIONS {
        if !obj.contains_key(section) {
            return Err(BackupError::MissingField(section));
        }
    }

    serde_json::from_value(value).map_err(|e| BackupError::Malformed(e.to_string()))
}

// ---------------------------------------------------------------------------
// Restore
// ---------------------------------------------------------------------------

/// Replace every ledger in `store` with the contents of `backup`.
///
/// All documents are serialized before storage is touched, then written with
/// one `set_many`. A storage failure is returned to the caller as-is.
pub fn restore_progress(store: &dyn Store, backup: &ProgressBackup) -> Result<()> {
    let modules = ModuleProgress {
        completed_modules: backup.modules.clone(),
    };
    let roles = RoleProgressLedger {
        roles: backup.roles.clone(),
    };
    let exams = ExamLedger {
        exams: backup.exams.clone(),
    };
    let entries = [
        (PREFERENCES_KEY, serde_yaml::to_string(&backup.preferences)?),
        (MODULES_KEY, serde_yaml::to_string(&modules)?),
        (ROLES_KEY, serde_yaml::to_string(&roles)?),
        (EXAMS_KEY, serde_yaml::to_string(&exams)?),
    ];
    store.set_many(&entries)?;
    tracing::info!(
        modules = backup.modules.len(),
        roles = backup.roles.len(),
        "progress restored from backup"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AcademyError;
    use crate::modules::QuizOutcome;
    use crate::preferences::PreferencesUpdate;
    use crate::store::{FileStore, MemoryStore};
    use tempfile::TempDir;

    fn seed(store: &dyn Store) {
        Preferences::save(
            store,
            PreferencesUpdate::default()
                .role("compliance")
                .experience("intermediate")
                .onboarding_complete(true)
                .first_name("Sam"),
        )
        .unwrap();
        let mut modules = ModuleProgress::load(store);
        modules.mark_complete(1);
        modules.mark_complete(2);
        modules.save(store).unwrap();
        let mut roles = RoleProgressLedger::load(store);
        roles.toggle_task("compliance", "compliance-30d-1");
        roles.toggle_mission("compliance", "compliance-m1");
        roles.toggle_task("operations", "operations-60d-2");
        roles.save(store).unwrap();
        let mut exams = ExamLedger::load(store);
        exams.record("compliance", &QuizOutcome::grade(9, 10, 80).unwrap(), Utc::now());
        exams.save(store).unwrap();
    }

    fn ledger_docs(store: &MemoryStore) -> Vec<Option<String>> {
        [PREFERENCES_KEY, MODULES_KEY, ROLES_KEY, EXAMS_KEY]
            .iter()
            .map(|k| store.get(k).unwrap())
            .collect()
    }

    #[test]
    fn restore_of_fresh_backup_is_lossless() {
        let store = MemoryStore::new();
        seed(&store);
        let before = ledger_docs(&store);

        let backup = build_backup(&store);
        restore_progress(&store, &backup).unwrap();

        assert_eq!(ledger_docs(&store), before);
    }

    #[test]
    fn json_roundtrip_through_validation() {
        let source = MemoryStore::new();
        seed(&source);
        let backup = build_backup(&source);
        let json = backup.to_json().unwrap();

        let validation = validate_backup(&json);
        assert!(validation.valid);
        let parsed = validation.into_result().unwrap();
        assert_eq!(parsed, backup);

        let target = MemoryStore::new();
        restore_progress(&target, &parsed).unwrap();
        assert_eq!(ledger_docs(&target), ledger_docs(&source));
    }

    #[test]
    fn sections_are_flat_in_the_document() {
        let store = MemoryStore::new();
        seed(&store);
        let json = build_backup(&store).to_json().unwrap();
        let doc: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(doc["modules"], serde_json::json!([1, 2]));
        assert!(doc["roles"]["compliance"].is_object());
        assert_eq!(doc["exams"]["compliance"]["passed"], Value::Bool(true));
        assert!(doc["exams"].get("exams").is_none());
    }

    #[test]
    fn restore_replaces_instead_of_merging() {
        let store = MemoryStore::new();
        let empty = build_backup(&store);
        seed(&store);

        restore_progress(&store, &empty).unwrap();
        assert!(ModuleProgress::load(&store).is_empty());
        assert!(RoleProgressLedger::load(&store).all().is_empty());
        assert!(!Preferences::load(&store).onboarding_complete);
    }

    #[test]
    fn rejects_foreign_json_without_panicking() {
        let v = validate_backup(r#"{ "foo": "bar" }"#);
        assert!(!v.valid);
        assert!(v.backup.is_none());
        let err = v.error.unwrap();
        assert_eq!(err, BackupError::MissingField("format"));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn rejects_garbage_inputs() {
        for input in ["", "not json", "[]", "42", "null", "{\"format\": 7}"] {
            let v = validate_backup(input);
            assert!(!v.valid, "expected rejection for {input:?}");
            assert!(!v.error.unwrap().to_string().is_empty());
        }
    }

    #[test]
    fn rejects_wrong_format_and_future_version() {
        let wrong = r#"{"format":"other-app","version":1}"#;
        assert!(matches!(
            validate_backup(wrong).error,
            Some(BackupError::UnknownFormat(_))
        ));

        let future = format!(r#"{{"format":"{BACKUP_FORMAT}","version":99}}"#);
        assert!(matches!(
            validate_backup(&future).error,
            Some(BackupError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn rejects_missing_and_mistyped_sections() {
        let missing = format!(r#"{{"format":"{BACKUP_FORMAT}","version":1,"preferences":{{}}}}"#);
        assert_eq!(
            validate_backup(&missing).error,
            Some(BackupError::MissingField("modules"))
        );

        let mistyped = format!(
            r#"{{"format":"{BACKUP_FORMAT}","version":1,"exported_at":"2026-01-01T00:00:00Z",
                "preferences":{{}},"modules":"all","roles":{{}},"exams":{{}}}}"#
        );
        assert!(matches!(
            validate_backup(&mistyped).error,
            Some(BackupError::Malformed(_))
        ));
    }

    #[test]
    fn unknown_ids_survive_restore() {
        let json = format!(
            r#"{{"format":"{BACKUP_FORMAT}","version":1,"exported_at":"2026-01-01T00:00:00Z",
                "preferences":{{"role":"compliance"}},"modules":[1, 40],
                "roles":{{"compliance":{{"tasks_completed":["retired-task"],"missions_completed":[]}}}},
                "exams":{{}}}}"#
        );
        let backup = validate_backup(&json).into_result().unwrap();
        let store = MemoryStore::new();
        restore_progress(&store, &backup).unwrap();
        assert!(RoleProgressLedger::load(&store).is_task_complete("compliance", "retired-task"));
        assert!(ModuleProgress::load(&store).is_complete(40));
    }

    struct ReadOnlyStore(MemoryStore);

    impl Store for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(AcademyError::Storage("read-only".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(AcademyError::Storage("read-only".to_string()))
        }
    }

    #[test]
    fn storage_failure_is_reported() {
        let inner = MemoryStore::new();
        seed(&inner);
        let backup = build_backup(&inner);
        let store = ReadOnlyStore(MemoryStore::new());
        assert!(matches!(
            restore_progress(&store, &backup),
            Err(AcademyError::Storage(_))
        ));
    }

    #[test]
    fn restore_into_file_store() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let memory = MemoryStore::new();
        seed(&memory);
        let backup = build_backup(&memory);

        restore_progress(&store, &backup).unwrap();
        assert!(dir.path().join(".academy/roles.yaml").exists());
        let again = build_backup_at(&store, backup.exported_at);
        assert_eq!(again, backup);
    }

    #[test]
    fn file_name_uses_export_date() {
        let store = MemoryStore::new();
        let at = DateTime::parse_from_rfc3339("2026-10-18T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let backup = build_backup_at(&store, at);
        assert_eq!(backup.file_name(), "cip-academy-progress-2026-10-18.json");
    }
}
