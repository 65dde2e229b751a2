//! Static training content the ledgers are measured against.
//!
//! The catalog only carries ids, titles and requirement tags. Lesson text,
//! quizzes and mission briefs live with the presentation layer.

use crate::error::{AcademyError, Result};
use crate::paths::validate_id;
use crate::types::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDef {
    pub id: u32,
    pub title: String,
    /// Role tags for which this module is required.
    #[serde(default)]
    pub required_for: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<TaskDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionDef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDef {
    pub role: String,
    pub title: String,
    #[serde(default)]
    pub phases: Vec<PhaseDef>,
    #[serde(default)]
    pub missions: Vec<MissionDef>,
}

impl RoleDef {
    pub fn tasks(&self) -> impl Iterator<Item = &TaskDef> {
        self.phases.iter().flat_map(|p| p.tasks.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub modules: Vec<ModuleDef>,
    pub roles: Vec<RoleDef>,
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

impl Catalog {
    pub fn role(&self, role: &str) -> Option<&RoleDef> {
        self.roles.iter().find(|r| r.role == role)
    }

    pub fn module(&self, id: u32) -> Option<&ModuleDef> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn module_ids(&self) -> BTreeSet<u32> {
        self.modules.iter().map(|m| m.id).collect()
    }

    pub fn required_modules(&self, role: &str) -> BTreeSet<u32> {
        self.modules
            .iter()
            .filter(|m| m.required_for.iter().any(|r| r == role))
            .map(|m| m.id)
            .collect()
    }

    /// Task ids of every phase of `role`. Empty for unknown roles.
    pub fn task_ids(&self, role: &str) -> BTreeSet<&str> {
        self.role(role)
            .map(|r| r.tasks().map(|t| t.id.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn mission_ids(&self, role: &str) -> BTreeSet<&str> {
        self.role(role)
            .map(|r| r.missions.iter().map(|m| m.id.as_str()).collect())
            .unwrap_or_default()
    }

    /// Task ids of the phase at `index` (0-based) for `role`.
    pub fn phase_task_ids(&self, role: &str, index: usize) -> BTreeSet<&str> {
        self.role(role)
            .and_then(|r| r.phases.get(index))
            .map(|p| p.tasks.iter().map(|t| t.id.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn role_tags(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.role.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Loading and validation
// ---------------------------------------------------------------------------

impl Catalog {
    /// Load a replacement catalog from YAML and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let catalog: Catalog = serde_yaml::from_str(&data)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<()> {
        let mut module_ids = BTreeSet::new();
        for m in &self.modules {
            if !module_ids.insert(m.id) {
                return Err(AcademyError::InvalidCatalog(format!(
                    "duplicate module id {}",
                    m.id
                )));
            }
        }

        let mut role_tags = BTreeSet::new();
        for r in &self.roles {
            validate_id(&r.role)?;
            if !role_tags.insert(r.role.as_str()) {
                return Err(AcademyError::InvalidCatalog(format!(
                    "duplicate role '{}'",
                    r.role
                )));
            }
            let mut ids = BTreeSet::new();
            let items = r
                .phases
                .iter()
                .map(|p| p.id.as_str())
                .chain(r.tasks().map(|t| t.id.as_str()))
                .chain(r.missions.iter().map(|m| m.id.as_str()));
            for id in items {
                validate_id(id)?;
                if !ids.insert(id) {
                    return Err(AcademyError::InvalidCatalog(format!(
                        "duplicate id '{id}' in role '{}'",
                        r.role
                    )));
                }
            }
        }

        for m in &self.modules {
            if let Some(role) = m.required_for.iter().find(|r| !role_tags.contains(r.as_str())) {
                return Err(AcademyError::InvalidCatalog(format!(
                    "module {} is required for unknown role '{role}'",
                    m.id
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Built-in content
// ---------------------------------------------------------------------------

const PHASES: [(&str, &str); 3] = [
    ("30d", "First 30 days"),
    ("60d", "Days 31-60"),
    ("90d", "Days 61-90"),
];

fn module(id: u32, title: &str, required_for: &[Role]) -> ModuleDef {
    ModuleDef {
        id,
        title: title.to_string(),
        required_for: required_for.iter().map(|r| r.as_str().to_string()).collect(),
    }
}

/// Build a role with ids derived from the role tag: `<role>-<phase>-<n>`
/// for tasks and `<role>-m<n>` for missions.
fn role(role: Role, phases: [&[&str]; 3], missions: &[&str]) -> RoleDef {
    let tag = role.as_str();
    RoleDef {
        role: tag.to_string(),
        title: role.title().to_string(),
        phases: PHASES
            .iter()
            .zip(phases)
            .map(|((phase_id, phase_title), tasks)| PhaseDef {
                id: phase_id.to_string(),
                title: phase_title.to_string(),
                tasks: tasks
                    .iter()
                    .enumerate()
                    .map(|(i, title)| TaskDef {
                        id: format!("{tag}-{phase_id}-{}", i + 1),
                        title: title.to_string(),
                    })
                    .collect(),
            })
            .collect(),
        missions: missions
            .iter()
            .enumerate()
            .map(|(i, title)| MissionDef {
                id: format!("{tag}-m{}", i + 1),
                title: title.to_string(),
            })
            .collect(),
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        use Role::*;

        let modules = vec![
            module(1, "CIP-002 BES Cyber System Categorization", &[Compliance, Management]),
            module(2, "CIP-003 Security Management Controls", &[Compliance, Management]),
            module(3, "CIP-004 Personnel & Training", &[Management]),
            module(4, "CIP-005 Electronic Security Perimeters", &[Operations, Security]),
            module(5, "CIP-006 Physical Security of BES Cyber Systems", &[Operations]),
            module(6, "CIP-007 System Security Management", &[Operations, Security, Engineering]),
            module(7, "CIP-008 Incident Reporting and Response Planning", &[Operations, Security]),
            module(8, "CIP-009 Recovery Plans", &[Engineering]),
            module(9, "CIP-010 Configuration Change Management", &[Security, Engineering]),
            module(10, "CIP-011 Information Protection", &[Security]),
            module(11, "CIP-013 Supply Chain Risk Management", &[Management]),
            module(12, "CIP-014 Physical Security of Transmission Stations", &[]),
        ];

        let roles = vec![
            role(
                Compliance,
                [
                    &[
                        "Inventory applicable CIP standards",
                        "Locate the current BES Cyber System list",
                        "Review the last audit report",
                        "Meet the CIP senior manager",
                    ],
                    &[
                        "Map evidence owners per requirement",
                        "Walk through the internal controls calendar",
                        "Review open mitigation plans",
                    ],
                    &[
                        "Run a mock RSAW review",
                        "Publish the evidence retention schedule",
                        "Brief leadership on compliance posture",
                    ],
                ],
                &[
                    "Trace one requirement from policy to evidence",
                    "Draft a self-report narrative",
                    "Audit a sample of access records",
                    "Reconcile the asset list with operations",
                    "Lead a compliance stand-up",
                ],
            ),
            role(
                Operations,
                [
                    &[
                        "Complete control room access briefing",
                        "Review the incident response plan",
                        "Identify ESP entry points on the one-line",
                        "Shadow a shift handover",
                    ],
                    &[
                        "Practice a suspicious activity report",
                        "Verify physical access logging",
                        "Review alarm response procedures",
                        "Participate in a tabletop exercise",
                    ],
                    &[
                        "Lead a shift handover with CIP checks",
                        "Walk the PSP with security staff",
                        "Update operator CIP quick reference",
                    ],
                ],
                &[
                    "Respond to a simulated intrusion alarm",
                    "Escort a visitor through the PSP",
                    "Report an unidentified removable media event",
                    "Restore from a failed EMS workstation drill",
                    "Brief a new operator on CIP duties",
                ],
            ),
            role(
                Security,
                [
                    &[
                        "Obtain network diagrams for each ESP",
                        "Review firewall rule justifications",
                        "Enroll in the patch source tracker",
                        "Review malicious code prevention tooling",
                    ],
                    &[
                        "Perform a 35-day patch evaluation",
                        "Review security event log alerts",
                        "Validate interactive remote access MFA",
                        "Baseline one BES Cyber Asset",
                    ],
                    &[
                        "Run a vulnerability assessment",
                        "Test the incident response plan",
                        "Classify BCSI repositories",
                        "Document a configuration change",
                    ],
                ],
                &[
                    "Investigate an anomalous login",
                    "Close a patch mitigation plan",
                    "Harden a jump host",
                    "Complete a baseline deviation review",
                    "Present a threat briefing",
                ],
            ),
            role(
                Engineering,
                [
                    &[
                        "Review relay and RTU asset inventory",
                        "Read the change management procedure",
                        "Locate recovery plan backups",
                    ],
                    &[
                        "Submit a test change through CIP-010",
                        "Verify ports and services on a relay",
                        "Perform a backup restoration test",
                    ],
                    &[
                        "Update a configuration baseline",
                        "Participate in a recovery exercise",
                        "Review transient cyber asset procedures",
                    ],
                ],
                &[
                    "Commission a device with a compliant baseline",
                    "Recover a substation HMI from backup",
                    "Scan a transient cyber asset before use",
                    "Document a CIP exceptional circumstance",
                    "Peer-review a change ticket",
                ],
            ),
            role(
                Management,
                [
                    &[
                        "Review the CIP senior manager delegation",
                        "Read the cyber security policy set",
                        "Meet the compliance lead",
                    ],
                    &[
                        "Approve the annual policy review",
                        "Review vendor risk assessments",
                        "Review training completion metrics",
                    ],
                    &[
                        "Sponsor a tabletop exercise",
                        "Approve the supply chain risk plan",
                        "Present CIP posture to the board",
                    ],
                ],
                &[
                    "Sign the CIP-003 policy approval",
                    "Resolve a resource gap for a mitigation plan",
                    "Review an incident after-action report",
                    "Approve a vendor remote access request",
                    "Set compliance objectives for next year",
                ],
            ),
        ];

        Self { modules, roles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        catalog.validate().unwrap();
        assert_eq!(catalog.modules.len(), 12);
        assert_eq!(catalog.roles.len(), Role::all().len());
        for &role in Role::all() {
            let def = catalog.role(role.as_str()).unwrap();
            assert_eq!(def.phases.len(), 3);
            assert_eq!(def.missions.len(), 5);
        }
    }

    #[test]
    fn compliance_role_shape() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.required_modules("compliance"),
            BTreeSet::from([1, 2])
        );
        assert_eq!(catalog.task_ids("compliance").len(), 10);
        assert!(catalog.task_ids("compliance").contains("compliance-30d-1"));
        assert!(catalog.mission_ids("compliance").contains("compliance-m5"));
        assert_eq!(catalog.phase_task_ids("compliance", 0).len(), 4);
    }

    #[test]
    fn unknown_role_has_no_content() {
        let catalog = Catalog::builtin();
        assert!(catalog.role("auditor").is_none());
        assert!(catalog.task_ids("auditor").is_empty());
        assert!(catalog.required_modules("auditor").is_empty());
        assert!(catalog.phase_task_ids("compliance", 7).is_empty());
    }

    #[test]
    fn validate_rejects_duplicate_task_ids() {
        let mut catalog = Catalog::builtin();
        let dup = catalog.roles[0].phases[0].tasks[0].clone();
        catalog.roles[0].phases[1].tasks.push(dup);
        assert!(matches!(
            catalog.validate(),
            Err(AcademyError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn validate_rejects_required_for_unknown_role() {
        let mut catalog = Catalog::builtin();
        catalog.modules[0].required_for.push("auditor".to_string());
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn load_reads_yaml_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.yaml");
        let yaml = "\
modules:
  - id: 1
    title: Intro
    required_for: [pilot]
roles:
  - role: pilot
    title: Pilot
    phases:
      - id: p1
        title: Phase one
        tasks:
          - id: pilot-t1
            title: First task
    missions:
      - id: pilot-m1
        title: First mission
";
        std::fs::write(&path, yaml).unwrap();
        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.required_modules("pilot"), BTreeSet::from([1]));
        assert_eq!(catalog.task_ids("pilot").len(), 1);
    }

    #[test]
    fn load_rejects_bad_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(
            &path,
            "modules: []\nroles:\n  - role: Bad Role\n    title: x\n",
        )
        .unwrap();
        assert!(matches!(
            Catalog::load(&path),
            Err(AcademyError::InvalidId(_))
        ));
    }
}
