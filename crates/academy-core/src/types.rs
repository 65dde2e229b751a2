use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Compliance,
    Operations,
    Security,
    Engineering,
    Management,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[
            Role::Compliance,
            Role::Operations,
            Role::Security,
            Role::Engineering,
            Role::Management,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Compliance => "compliance",
            Role::Operations => "operations",
            Role::Security => "security",
            Role::Engineering => "engineering",
            Role::Management => "management",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Role::Compliance => "Compliance Manager",
            Role::Operations => "Control Room Operator",
            Role::Security => "Cyber Security Analyst",
            Role::Engineering => "Protection & Controls Engineer",
            Role::Management => "CIP Senior Manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = crate::error::AcademyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compliance" => Ok(Role::Compliance),
            "operations" => Ok(Role::Operations),
            "security" => Ok(Role::Security),
            "engineering" => Ok(Role::Engineering),
            "management" => Ok(Role::Management),
            _ => Err(crate::error::AcademyError::UnknownRole(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Experience
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Experience {
    Beginner,
    Intermediate,
    Advanced,
}

impl Experience {
    pub fn all() -> &'static [Experience] {
        &[
            Experience::Beginner,
            Experience::Intermediate,
            Experience::Advanced,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Experience::Beginner => "beginner",
            Experience::Intermediate => "intermediate",
            Experience::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Experience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Experience::Beginner),
            "intermediate" => Ok(Experience::Intermediate),
            "advanced" => Ok(Experience::Advanced),
            _ => Err(format!("unknown experience level: {s}")),
        }
    }
}

/// Integer percentage of `done` out of `total`, rounded half-up.
///
/// Returns `None` when `total` is zero so callers pick the empty-case policy.
pub fn percent(done: usize, total: usize) -> Option<u32> {
    if total == 0 {
        return None;
    }
    let done = done.min(total) as u64;
    let total = total as u64;
    Some(((done * 200 + total) / (total * 2)) as u32)
}
