use crate::error::{AcademyError, Result};
use crate::paths::MODULES_KEY;
use crate::store::{self, Store};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// ModuleProgress
// ---------------------------------------------------------------------------

/// Modules whose quiz the learner has passed. Entries are never removed in
/// normal flow; only a restore or reset replaces the set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleProgress {
    #[serde(default)]
    pub completed_modules: BTreeSet<u32>,
}

impl ModuleProgress {
    pub fn load(store: &dyn Store) -> Self {
        store::load_or_default(store, MODULES_KEY)
    }

    pub fn save(&self, store: &dyn Store) -> Result<()> {
        store::save_yaml(store, MODULES_KEY, self)
    }

    /// Returns true when `module_id` was not already complete.
    pub fn mark_complete(&mut self, module_id: u32) -> bool {
        self.completed_modules.insert(module_id)
    }

    pub fn is_complete(&self, module_id: u32) -> bool {
        self.completed_modules.contains(&module_id)
    }

    pub fn all(&self) -> &BTreeSet<u32> {
        &self.completed_modules
    }

    pub fn len(&self) -> usize {
        self.completed_modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed_modules.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Quiz grading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub correct: u32,
    pub total: u32,
    pub percent: u32,
    pub passed: bool,
}

impl QuizOutcome {
    pub fn grade(correct: u32, total: u32, pass_percent: u32) -> Result<Self> {
        if total == 0 || correct > total {
            return Err(AcademyError::InvalidScore { correct, total });
        }
        let percent = crate::types::percent(correct as usize, total as usize).unwrap_or(0);
        // Compare exact counts so 79.6% never rounds up into a pass.
        let passed = u64::from(correct) * 100 >= u64::from(pass_percent) * u64::from(total);
        Ok(Self {
            correct,
            total,
            percent,
            passed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn mark_complete_is_idempotent() {
        let mut once = ModuleProgress::default();
        once.mark_complete(3);

        let mut twice = ModuleProgress::default();
        assert!(twice.mark_complete(3));
        assert!(!twice.mark_complete(3));

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn persists_through_store() {
        let store = MemoryStore::new();
        let mut progress = ModuleProgress::load(&store);
        assert!(progress.is_empty());
        progress.mark_complete(1);
        progress.mark_complete(12);
        progress.save(&store).unwrap();

        let loaded = ModuleProgress::load(&store);
        assert!(loaded.is_complete(1));
        assert!(loaded.is_complete(12));
        assert!(!loaded.is_complete(5));
        assert_eq!(loaded.all().iter().copied().collect::<Vec<_>>(), vec![1, 12]);
    }

    #[test]
    fn quiz_pass_threshold_uses_exact_ratio() {
        let pass = QuizOutcome::grade(8, 10, 80).unwrap();
        assert!(pass.passed);
        assert_eq!(pass.percent, 80);

        // 39/49 = 79.59% rounds to 80 but is still below the bar.
        let near = QuizOutcome::grade(39, 49, 80).unwrap();
        assert_eq!(near.percent, 80);
        assert!(!near.passed);
    }

    #[test]
    fn quiz_rejects_impossible_scores() {
        assert!(QuizOutcome::grade(1, 0, 80).is_err());
        assert!(QuizOutcome::grade(11, 10, 80).is_err());
    }
}
