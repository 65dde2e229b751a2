use crate::catalog::Catalog;
use crate::exam::ExamLedger;
use crate::modules::ModuleProgress;
use crate::role_progress::{RoleProgressData, RoleProgressLedger};
use crate::store::Store;
use crate::types::percent;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Certificate policy
// ---------------------------------------------------------------------------

pub const REQUIRED_MODULES_PERCENT: u32 = 100;
pub const REQUIRED_TASKS_PERCENT: u32 = 75;
pub const REQUIRED_MISSIONS: usize = 3;

// ---------------------------------------------------------------------------
// ProgressSnapshot
// ---------------------------------------------------------------------------

/// Every ledger read at one point in time. All derived views are computed
/// from a snapshot and nothing derived is ever written back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub modules: ModuleProgress,
    pub roles: RoleProgressLedger,
    pub exams: ExamLedger,
}

impl ProgressSnapshot {
    pub fn load(store: &dyn Store) -> Self {
        Self {
            modules: ModuleProgress::load(store),
            roles: RoleProgressLedger::load(store),
            exams: ExamLedger::load(store),
        }
    }

    pub fn role(&self, role: &str) -> RoleProgressData {
        self.roles.role(role)
    }
}

// ---------------------------------------------------------------------------
// RoleCompletionProgress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCompletionProgress {
    pub role: String,
    pub modules_progress: u32,
    pub tasks_progress: u32,
    pub missions_progress: u32,
    pub overall: u32,
    pub modules_complete: usize,
    pub total_modules: usize,
    pub tasks_complete: usize,
    pub total_tasks: usize,
    pub missions_complete: usize,
    pub total_missions: usize,
    pub missions_required: usize,
}

/// Percentages for `role`, counting only ids the catalog knows about.
///
/// A role with no required modules reports 100% modules progress. A role
/// with no tasks or no missions reports 0% for that part.
pub fn role_completion_progress(
    catalog: &Catalog,
    role: &str,
    modules: &ModuleProgress,
    progress: &RoleProgressData,
) -> RoleCompletionProgress {
    let required = catalog.required_modules(role);
    let modules_complete = required.iter().filter(|id| modules.is_complete(**id)).count();

    let tasks = catalog.task_ids(role);
    let tasks_complete = progress
        .tasks_completed
        .iter()
        .filter(|t| tasks.contains(t.as_str()))
        .count();

    let missions = catalog.mission_ids(role);
    let missions_complete = progress
        .missions_completed
        .iter()
        .filter(|m| missions.contains(m.as_str()))
        .count();

    let modules_progress = percent(modules_complete, required.len()).unwrap_or(100);
    let tasks_progress = percent(tasks_complete, tasks.len()).unwrap_or(0);
    let missions_progress = percent(missions_complete, missions.len()).unwrap_or(0);
    let overall = (modules_progress + tasks_progress + missions_progress + 1) / 3;

    RoleCompletionProgress {
        role: role.to_string(),
        modules_progress,
        tasks_progress,
        missions_progress,
        overall,
        modules_complete,
        total_modules: required.len(),
        tasks_complete,
        total_tasks: tasks.len(),
        missions_complete,
        total_missions: missions.len(),
        missions_required: REQUIRED_MISSIONS.min(missions.len()),
    }
}

impl RoleCompletionProgress {
    fn modules_met(&self) -> bool {
        self.modules_progress >= REQUIRED_MODULES_PERCENT && self.modules_complete >= self.total_modules
    }

    // Exact counts, not the rounded percentage: 149/200 must not pass.
    fn tasks_met(&self) -> bool {
        self.total_tasks > 0
            && self.tasks_complete * 100 >= REQUIRED_TASKS_PERCENT as usize * self.total_tasks
    }

    fn missions_met(&self) -> bool {
        self.missions_complete >= self.missions_required
    }

    pub fn is_complete(&self) -> bool {
        self.modules_met() && self.tasks_met() && self.missions_met()
    }

    pub fn state(&self) -> CompletionState {
        if self.is_complete() {
            CompletionState::Unlocked
        } else {
            CompletionState::Locked
        }
    }

    pub fn shortfall(&self) -> Shortfall {
        let tasks_needed = (REQUIRED_TASKS_PERCENT as usize * self.total_tasks).div_ceil(100);
        Shortfall {
            modules: self.total_modules.saturating_sub(self.modules_complete),
            tasks: tasks_needed.saturating_sub(self.tasks_complete),
            missions: self.missions_required.saturating_sub(self.missions_complete),
        }
    }
}

/// Certificate gate for `role`, recomputed from the ledgers on every call.
pub fn is_role_complete(
    catalog: &Catalog,
    role: &str,
    modules: &ModuleProgress,
    progress: &RoleProgressData,
) -> bool {
    role_completion_progress(catalog, role, modules, progress).is_complete()
}

// ---------------------------------------------------------------------------
// CompletionState / Shortfall
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    Locked,
    Unlocked,
}

impl fmt::Display for CompletionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionState::Locked => f.write_str("locked"),
            CompletionState::Unlocked => f.write_str("unlocked"),
        }
    }
}

/// What a locked role still needs before its certificate unlocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub modules: usize,
    pub tasks: usize,
    pub missions: usize,
}

impl Shortfall {
    pub fn is_empty(&self) -> bool {
        self.modules == 0 && self.tasks == 0 && self.missions == 0
    }
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.modules > 0 {
            parts.push(format!("{} required module(s)", self.modules));
        }
        if self.tasks > 0 {
            parts.push(format!("{} task(s)", self.tasks));
        }
        if self.missions > 0 {
            parts.push(format!("{} mission(s)", self.missions));
        }
        if parts.is_empty() {
            f.write_str("nothing")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MissionDef, ModuleDef, PhaseDef, RoleDef, TaskDef};

    /// One role "grid" with `required` required modules, `tasks` tasks in a
    /// single phase and `missions` missions.
    fn grid_catalog(required: u32, tasks: usize, missions: usize) -> Catalog {
        Catalog {
            modules: (1..=required + 2)
                .map(|id| ModuleDef {
                    id,
                    title: format!("Module {id}"),
                    required_for: if id <= required {
                        vec!["grid".to_string()]
                    } else {
                        vec![]
                    },
                })
                .collect(),
            roles: vec![RoleDef {
                role: "grid".to_string(),
                title: "Grid".to_string(),
                phases: vec![PhaseDef {
                    id: "p1".to_string(),
                    title: "Phase".to_string(),
                    tasks: (1..=tasks)
                        .map(|i| TaskDef {
                            id: format!("t{i}"),
                            title: format!("Task {i}"),
                        })
                        .collect(),
                }],
                missions: (1..=missions)
                    .map(|i| MissionDef {
                        id: format!("m{i}"),
                        title: format!("Mission {i}"),
                    })
                    .collect(),
            }],
        }
    }

    fn progress(tasks: usize, missions: usize) -> RoleProgressData {
        RoleProgressData {
            tasks_completed: (1..=tasks).map(|i| format!("t{i}")).collect(),
            missions_completed: (1..=missions).map(|i| format!("m{i}")).collect(),
        }
    }

    fn modules(ids: impl IntoIterator<Item = u32>) -> ModuleProgress {
        ModuleProgress {
            completed_modules: ids.into_iter().collect(),
        }
    }

    #[test]
    fn gate_boundary_at_seventy_five_percent() {
        let catalog = grid_catalog(4, 20, 5);
        let done = modules(1..=4);

        assert!(is_role_complete(&catalog, "grid", &done, &progress(15, 3)));
        assert!(!is_role_complete(&catalog, "grid", &done, &progress(14, 3)));
    }

    #[test]
    fn gate_requires_every_required_module() {
        let catalog = grid_catalog(4, 20, 5);
        let p = role_completion_progress(&catalog, "grid", &modules(1..=3), &progress(20, 5));
        assert_eq!(p.modules_progress, 75);
        assert_eq!(p.state(), CompletionState::Locked);
        assert_eq!(p.shortfall().modules, 1);
    }

    #[test]
    fn gate_requires_three_missions() {
        let catalog = grid_catalog(4, 20, 5);
        let p = role_completion_progress(&catalog, "grid", &modules(1..=4), &progress(20, 2));
        assert!(!p.is_complete());
        assert_eq!(
            p.shortfall(),
            Shortfall {
                modules: 0,
                tasks: 0,
                missions: 1
            }
        );
    }

    #[test]
    fn mission_requirement_caps_at_catalog_size() {
        let catalog = grid_catalog(1, 4, 2);
        let p = role_completion_progress(&catalog, "grid", &modules([1]), &progress(3, 2));
        assert_eq!(p.missions_required, 2);
        assert!(p.is_complete());
    }

    #[test]
    fn compliance_example_unlocks() {
        let catalog = Catalog::builtin();
        let mut data = RoleProgressData::default();
        for id in catalog.task_ids("compliance").into_iter().take(8) {
            data.tasks_completed.insert(id.to_string());
        }
        for id in ["compliance-m1", "compliance-m2", "compliance-m3"] {
            data.missions_completed.insert(id.to_string());
        }

        let p = role_completion_progress(&catalog, "compliance", &modules([1, 2]), &data);
        assert_eq!(p.modules_progress, 100);
        assert_eq!(p.tasks_progress, 80);
        assert_eq!(p.missions_complete, 3);
        assert_eq!(p.total_missions, 5);
        assert_eq!(p.missions_progress, 60);
        assert_eq!(p.overall, 80);
        assert_eq!(p.state(), CompletionState::Unlocked);
        assert!(p.shortfall().is_empty());
    }

    #[test]
    fn unknown_ids_are_excluded_from_counts() {
        let catalog = grid_catalog(2, 10, 5);
        let mut data = progress(5, 1);
        data.tasks_completed.insert("retired-task".to_string());
        data.missions_completed.insert("retired-mission".to_string());

        let p = role_completion_progress(&catalog, "grid", &modules([1, 2, 99]), &data);
        assert_eq!(p.tasks_complete, 5);
        assert_eq!(p.total_tasks, 10);
        assert_eq!(p.tasks_progress, 50);
        assert_eq!(p.missions_complete, 1);
        assert_eq!(p.modules_complete, 2);
        assert_eq!(p.total_modules, 2);
    }

    #[test]
    fn zero_required_modules_is_vacuously_complete() {
        let catalog = grid_catalog(0, 4, 3);
        let p = role_completion_progress(&catalog, "grid", &modules([]), &progress(3, 3));
        assert_eq!(p.total_modules, 0);
        assert_eq!(p.modules_progress, 100);
        assert!(p.is_complete());
    }

    #[test]
    fn unknown_role_never_unlocks() {
        let catalog = Catalog::builtin();
        let p = role_completion_progress(
            &catalog,
            "auditor",
            &modules(1..=12),
            &progress(10, 10),
        );
        assert_eq!(p.total_tasks, 0);
        assert_eq!(p.tasks_progress, 0);
        assert!(!p.is_complete());
    }

    #[test]
    fn overall_is_rounded_mean() {
        let catalog = grid_catalog(3, 3, 3);
        // 33 + 67 + 0 = 100 -> 33.3 -> 33
        let p = role_completion_progress(&catalog, "grid", &modules([1]), &progress(2, 0));
        assert_eq!(p.overall, 33);
    }

    #[test]
    fn shortfall_display() {
        let s = Shortfall {
            modules: 1,
            tasks: 2,
            missions: 0,
        };
        assert_eq!(s.to_string(), "1 required module(s), 2 task(s)");
        assert_eq!(Shortfall::default().to_string(), "nothing");
    }
}
