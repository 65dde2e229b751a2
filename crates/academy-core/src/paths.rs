use crate::error::{AcademyError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const ACADEMY_DIR: &str = ".academy";
pub const CONFIG_FILE: &str = ".academy/config.yaml";
pub const LEDGER_EXT: &str = "yaml";

// ---------------------------------------------------------------------------
// Store keys
// ---------------------------------------------------------------------------

pub const PREFERENCES_KEY: &str = "preferences";
pub const MODULES_KEY: &str = "modules";
pub const ROLES_KEY: &str = "roles";
pub const EXAMS_KEY: &str = "exams";

/// Every key the tracker owns, in write order.
pub const LEDGER_KEYS: &[&str] = &[PREFERENCES_KEY, MODULES_KEY, ROLES_KEY, EXAMS_KEY];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn academy_dir(root: &Path) -> PathBuf {
    root.join(ACADEMY_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn ledger_path(root: &Path, key: &str) -> PathBuf {
    academy_dir(root).join(format!("{key}.{LEDGER_EXT}"))
}

// ---------------------------------------------------------------------------
// Id validation
// ---------------------------------------------------------------------------

static ID_RE: OnceLock<Regex> = OnceLock::new();

fn id_re() -> &'static Regex {
    ID_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

/// Catalog ids (roles, phases, tasks, missions) are kebab-case.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 64 || !id_re().is_match(id) {
        return Err(AcademyError::InvalidId(id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        for id in ["compliance", "ops-30d-1", "m", "cip-007"] {
            validate_id(id).unwrap_or_else(|_| panic!("expected valid: {id}"));
        }
    }

    #[test]
    fn invalid_ids() {
        for id in ["", "-lead", "trail-", "has space", "Upper", "a_b"] {
            assert!(validate_id(id).is_err(), "expected invalid: {id}");
        }
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/learner");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/learner/.academy/config.yaml")
        );
        assert_eq!(
            ledger_path(root, ROLES_KEY),
            PathBuf::from("/tmp/learner/.academy/roles.yaml")
        );
    }
}
