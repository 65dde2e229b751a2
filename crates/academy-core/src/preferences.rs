use crate::error::Result;
use crate::paths::PREFERENCES_KEY;
use crate::store::{self, Store};
use crate::types::{Experience, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub onboarding_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

impl UserPreferences {
    /// The selected role, if it is one this build knows about.
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }

    pub fn experience(&self) -> Option<Experience> {
        self.experience.as_deref().and_then(|e| e.parse().ok())
    }

    /// Name shown on dashboards and certificates.
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Learner")
    }
}

/// Fields to merge into the stored preferences. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct PreferencesUpdate {
    pub role: Option<String>,
    pub experience: Option<String>,
    pub onboarding_complete: Option<bool>,
    pub first_name: Option<String>,
}

impl PreferencesUpdate {
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn experience(mut self, experience: impl Into<String>) -> Self {
        self.experience = Some(experience.into());
        self
    }

    pub fn onboarding_complete(mut self, done: bool) -> Self {
        self.onboarding_complete = Some(done);
        self
    }

    pub fn first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.experience.is_none()
            && self.onboarding_complete.is_none()
            && self.first_name.is_none()
    }

    fn apply(self, prefs: &mut UserPreferences) {
        if let Some(role) = self.role {
            prefs.role = Some(role);
        }
        if let Some(experience) = self.experience {
            prefs.experience = Some(experience);
        }
        if let Some(done) = self.onboarding_complete {
            prefs.onboarding_complete = done;
        }
        if let Some(name) = self.first_name {
            prefs.first_name = Some(name);
        }
    }
}

pub struct Preferences;

impl Preferences {
    /// Stored preferences, or defaults when missing or unreadable.
    pub fn load(store: &dyn Store) -> UserPreferences {
        store::load_or_default(store, PREFERENCES_KEY)
    }

    pub fn save(store: &dyn Store, update: PreferencesUpdate) -> Result<UserPreferences> {
        let mut prefs = Self::load(store);
        update.apply(&mut prefs);
        store::save_yaml(store, PREFERENCES_KEY, &prefs)?;
        tracing::debug!(role = ?prefs.role, "preferences saved");
        Ok(prefs)
    }

    pub fn reset(store: &dyn Store) -> Result<()> {
        store.remove(PREFERENCES_KEY)
    }
}
