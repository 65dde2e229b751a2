use crate::error::Result;
use crate::paths::ROLES_KEY;
use crate::store::{self, Store};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Self-reported checklist state for one role. Ids are opaque; nothing here
/// checks them against the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProgressData {
    #[serde(default)]
    pub tasks_completed: BTreeSet<String>,
    #[serde(default)]
    pub missions_completed: BTreeSet<String>,
}

impl RoleProgressData {
    pub fn is_empty(&self) -> bool {
        self.tasks_completed.is_empty() && self.missions_completed.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProgressLedger {
    #[serde(default)]
    pub roles: BTreeMap<String, RoleProgressData>,
}

impl RoleProgressLedger {
    pub fn load(store: &dyn Store) -> Self {
        store::load_or_default(store, ROLES_KEY)
    }

    pub fn save(&self, store: &dyn Store) -> Result<()> {
        store::save_yaml(store, ROLES_KEY, self)
    }

    /// Flip `task_id` for `role`. Returns the new membership.
    pub fn toggle_task(&mut self, role: &str, task_id: &str) -> bool {
        toggle(&mut self.entry(role).tasks_completed, task_id)
    }

    /// Flip `mission_id` for `role`. Returns the new membership.
    pub fn toggle_mission(&mut self, role: &str, mission_id: &str) -> bool {
        toggle(&mut self.entry(role).missions_completed, mission_id)
    }

    pub fn is_task_complete(&self, role: &str, task_id: &str) -> bool {
        self.roles
            .get(role)
            .is_some_and(|r| r.tasks_completed.contains(task_id))
    }

    pub fn is_mission_complete(&self, role: &str, mission_id: &str) -> bool {
        self.roles
            .get(role)
            .is_some_and(|r| r.missions_completed.contains(mission_id))
    }

    /// Progress for one role; empty if the role was never touched.
    pub fn role(&self, role: &str) -> RoleProgressData {
        self.roles.get(role).cloned().unwrap_or_default()
    }

    pub fn all(&self) -> &BTreeMap<String, RoleProgressData> {
        &self.roles
    }

    fn entry(&mut self, role: &str) -> &mut RoleProgressData {
        self.roles.entry(role.to_string()).or_default()
    }
}

fn toggle(set: &mut BTreeSet<String>, id: &str) -> bool {
    if set.remove(id) {
        false
    } else {
        set.insert(id.to_string());
        true
    }
}
