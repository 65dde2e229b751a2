use crate::error::Result;
use crate::modules::QuizOutcome;
use crate::paths::EXAMS_KEY;
use crate::store::{self, Store};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub passed: bool,
    pub best_percent: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed_at: Option<DateTime<Utc>>,
}

/// Per-role final exam results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamLedger {
    #[serde(default)]
    pub exams: BTreeMap<String, ExamRecord>,
}

impl ExamLedger {
    pub fn load(store: &dyn Store) -> Self {
        store::load_or_default(store, EXAMS_KEY)
    }

    pub fn save(&self, store: &dyn Store) -> Result<()> {
        store::save_yaml(store, EXAMS_KEY, self)
    }

    /// Record an attempt. A pass is sticky and keeps its first timestamp.
    pub fn record(&mut self, role: &str, outcome: &QuizOutcome, now: DateTime<Utc>) -> &ExamRecord {
        let record = self.exams.entry(role.to_string()).or_insert(ExamRecord {
            passed: false,
            best_percent: 0,
            passed_at: None,
        });
        record.best_percent = record.best_percent.max(outcome.percent);
        if outcome.passed && !record.passed {
            record.passed = true;
            record.passed_at = Some(now);
        }
        record
    }

    pub fn has_passed(&self, role: &str) -> bool {
        self.exams.get(role).is_some_and(|r| r.passed)
    }
}
