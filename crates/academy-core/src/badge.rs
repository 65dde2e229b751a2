use crate::catalog::Catalog;
use crate::completion::{role_completion_progress, ProgressSnapshot};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// BadgeCriterion
// ---------------------------------------------------------------------------

/// Predicate a badge is earned by. Every criterion is false when the
/// catalog items it ranges over are empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BadgeCriterion {
    /// At least `count` catalog modules passed, regardless of role.
    ModulesCompleted { count: usize },
    AllModules,
    RequiredModules,
    /// Every task of the phase at `index` (0-based).
    PhaseComplete { index: usize },
    TaskPercent { percent: u32 },
    MissionsCompleted { count: usize },
    /// The mission at `index` (0-based) in the role's mission list.
    MissionCompleted { index: usize },
    ExamPassed,
    RoleComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub criteria: &'static str,
    pub icon: &'static str,
    pub criterion: BadgeCriterion,
}

pub static BADGES: &[Badge] = &[
    Badge {
        id: "first-steps",
        name: "First Steps",
        description: "Passed your first CIP module quiz",
        criteria: "Complete any module",
        icon: "footprints",
        criterion: BadgeCriterion::ModulesCompleted { count: 1 },
    },
    Badge {
        id: "halfway-there",
        name: "Halfway There",
        description: "Passed six module quizzes",
        criteria: "Complete 6 modules",
        icon: "gauge",
        criterion: BadgeCriterion::ModulesCompleted { count: 6 },
    },
    Badge {
        id: "cip-scholar",
        name: "CIP Scholar",
        description: "Passed every module in the academy",
        criteria: "Complete all modules",
        icon: "graduation-cap",
        criterion: BadgeCriterion::AllModules,
    },
    Badge {
        id: "role-ready",
        name: "Role Ready",
        description: "Finished the modules your role depends on",
        criteria: "Complete every required module for the role",
        icon: "book-check",
        criterion: BadgeCriterion::RequiredModules,
    },
    Badge {
        id: "foundation-builder",
        name: "Foundation Builder",
        description: "Wrapped up the first 30 days",
        criteria: "Complete every task in the first phase",
        icon: "blocks",
        criterion: BadgeCriterion::PhaseComplete { index: 0 },
    },
    Badge {
        id: "momentum",
        name: "Momentum",
        description: "Wrapped up days 31-60",
        criteria: "Complete every task in the second phase",
        icon: "trending-up",
        criterion: BadgeCriterion::PhaseComplete { index: 1 },
    },
    Badge {
        id: "sustained-excellence",
        name: "Sustained Excellence",
        description: "Wrapped up days 61-90",
        criteria: "Complete every task in the third phase",
        icon: "award",
        criterion: BadgeCriterion::PhaseComplete { index: 2 },
    },
    Badge {
        id: "task-master",
        name: "Task Master",
        description: "Most of the role checklist is done",
        criteria: "Complete at least 75% of the role's tasks",
        icon: "list-checks",
        criterion: BadgeCriterion::TaskPercent { percent: 75 },
    },
    Badge {
        id: "first-mission",
        name: "First Mission",
        description: "Completed the role's opening mission",
        criteria: "Complete the first mission",
        icon: "flag",
        criterion: BadgeCriterion::MissionCompleted { index: 0 },
    },
    Badge {
        id: "mission-specialist",
        name: "Mission Specialist",
        description: "Proved it in the field three times",
        criteria: "Complete at least 3 missions",
        icon: "target",
        criterion: BadgeCriterion::MissionsCompleted { count: 3 },
    },
    Badge {
        id: "exam-ace",
        name: "Exam Ace",
        description: "Passed the role's final exam",
        criteria: "Pass the role exam",
        icon: "medal",
        criterion: BadgeCriterion::ExamPassed,
    },
    Badge {
        id: "role-champion",
        name: "Role Champion",
        description: "Unlocked the role certificate",
        criteria: "All required modules, 75% of tasks and 3 missions",
        icon: "trophy",
        criterion: BadgeCriterion::RoleComplete,
    },
];

pub fn find_badge(id: &str) -> Option<&'static Badge> {
    BADGES.iter().find(|b| b.id == id)
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

fn all_done<'a>(items: impl IntoIterator<Item = &'a str>, done: &BTreeSet<String>) -> bool {
    let mut any = false;
    for item in items {
        if !done.contains(item) {
            return false;
        }
        any = true;
    }
    any
}

fn is_earned(
    criterion: BadgeCriterion,
    catalog: &Catalog,
    role: &str,
    snapshot: &ProgressSnapshot,
) -> bool {
    let data = snapshot.roles.all().get(role);
    let empty = BTreeSet::new();
    let tasks_done = data.map(|d| &d.tasks_completed).unwrap_or(&empty);
    let missions_done = data.map(|d| &d.missions_completed).unwrap_or(&empty);

    match criterion {
        BadgeCriterion::ModulesCompleted { count } => {
            let passed = catalog
                .module_ids()
                .iter()
                .filter(|id| snapshot.modules.is_complete(**id))
                .count();
            count > 0 && passed >= count
        }
        BadgeCriterion::AllModules => {
            let ids = catalog.module_ids();
            !ids.is_empty() && ids.iter().all(|id| snapshot.modules.is_complete(*id))
        }
        BadgeCriterion::RequiredModules => {
            let ids = catalog.required_modules(role);
            !ids.is_empty() && ids.iter().all(|id| snapshot.modules.is_complete(*id))
        }
        BadgeCriterion::PhaseComplete { index } => {
            all_done(catalog.phase_task_ids(role, index), tasks_done)
        }
        BadgeCriterion::TaskPercent { percent } => {
            let tasks = catalog.task_ids(role);
            let done = tasks.iter().filter(|t| tasks_done.contains(**t)).count();
            !tasks.is_empty() && done * 100 >= percent as usize * tasks.len()
        }
        BadgeCriterion::MissionsCompleted { count } => {
            let missions = catalog.mission_ids(role);
            let done = missions.iter().filter(|m| missions_done.contains(**m)).count();
            count > 0 && done >= count
        }
        BadgeCriterion::MissionCompleted { index } => catalog
            .role(role)
            .and_then(|r| r.missions.get(index))
            .is_some_and(|m| missions_done.contains(&m.id)),
        BadgeCriterion::ExamPassed => snapshot.exams.has_passed(role),
        BadgeCriterion::RoleComplete => {
            let data = snapshot.role(role);
            role_completion_progress(catalog, role, &snapshot.modules, &data).is_complete()
        }
    }
}

/// Ids of every badge earned for `role` in `snapshot`.
///
/// Pure: the same catalog, role and snapshot always give the same set.
pub fn evaluate_badges_for_role(
    catalog: &Catalog,
    role: &str,
    snapshot: &ProgressSnapshot,
) -> BTreeSet<&'static str> {
    BADGES
        .iter()
        .filter(|b| is_earned(b.criterion, catalog, role, snapshot))
        .map(|b| b.id)
        .collect()
}

/// Earned badges for every catalog role.
pub fn evaluate_all_roles(
    catalog: &Catalog,
    snapshot: &ProgressSnapshot,
) -> BTreeMap<String, BTreeSet<&'static str>> {
    catalog
        .role_tags()
        .into_iter()
        .map(|role| (role.to_string(), evaluate_badges_for_role(catalog, role, snapshot)))
        .collect()
}
