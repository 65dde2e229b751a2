use super::{resolve_role, Session};
use crate::output::{check, print_json, print_table};
use academy_core::ProgressTracker;
use clap::Subcommand;
use std::path::Path;

/// Which checklist a subcommand operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Task,
    Mission,
}

impl Kind {
    fn noun(self) -> &'static str {
        match self {
            Kind::Task => "task",
            Kind::Mission => "mission",
        }
    }
}

#[derive(Subcommand)]
pub enum ChecklistSubcommand {
    /// List items for a role with their completion state
    List {
        #[arg(long)]
        role: Option<String>,
    },
    /// Check or uncheck an item
    Toggle {
        id: String,
        #[arg(long)]
        role: Option<String>,
    },
}

pub fn run(root: &Path, kind: Kind, subcmd: ChecklistSubcommand, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root)?;
    let tracker = session.tracker();
    match subcmd {
        ChecklistSubcommand::List { role } => {
            let role = resolve_role(&tracker, role.as_deref())?;
            list(&tracker, kind, &role, json)
        }
        ChecklistSubcommand::Toggle { id, role } => {
            let role = resolve_role(&tracker, role.as_deref())?;
            toggle(&tracker, kind, &role, &id, json)
        }
    }
}

fn list(tracker: &ProgressTracker<'_>, kind: Kind, role: &str, json: bool) -> anyhow::Result<()> {
    let def = tracker
        .catalog()
        .role(role)
        .ok_or_else(|| anyhow::anyhow!("role '{role}' has no {}s in the catalog", kind.noun()))?;
    let progress = tracker.role_progress(role);

    // (group, id, title, done)
    let items: Vec<(&str, &str, &str, bool)> = match kind {
        Kind::Task => def
            .phases
            .iter()
            .flat_map(|p| {
                p.tasks.iter().map(|t| {
                    (
                        p.title.as_str(),
                        t.id.as_str(),
                        t.title.as_str(),
                        progress.tasks_completed.contains(&t.id),
                    )
                })
            })
            .collect(),
        Kind::Mission => def
            .missions
            .iter()
            .map(|m| {
                (
                    "",
                    m.id.as_str(),
                    m.title.as_str(),
                    progress.missions_completed.contains(&m.id),
                )
            })
            .collect(),
    };

    if json {
        let out: Vec<_> = items
            .iter()
            .map(|(group, id, title, done)| {
                serde_json::json!({ "phase": group, "id": id, "title": title, "complete": done })
            })
            .collect();
        return print_json(&out);
    }

    let rows = items
        .iter()
        .map(|(group, id, title, done)| {
            vec![check(*done), id.to_string(), title.to_string(), group.to_string()]
        })
        .collect();
    let headers = match kind {
        Kind::Task => ["", "ID", "TASK", "PHASE"],
        Kind::Mission => ["", "ID", "MISSION", ""],
    };
    print_table(&headers, rows);
    Ok(())
}

fn toggle(
    tracker: &ProgressTracker<'_>,
    kind: Kind,
    role: &str,
    id: &str,
    json: bool,
) -> anyhow::Result<()> {
    let known = match kind {
        Kind::Task => tracker.catalog().task_ids(role).contains(id),
        Kind::Mission => tracker.catalog().mission_ids(role).contains(id),
    };
    if !known {
        tracing::warn!(
            "'{id}' is not a {} for role '{role}'; it will not count toward progress",
            kind.noun()
        );
    }

    let done = match kind {
        Kind::Task => tracker.toggle_task(role, id)?,
        Kind::Mission => tracker.toggle_mission(role, id)?,
    };

    if json {
        return print_json(&serde_json::json!({
            "role": role,
            "id": id,
            "kind": kind.noun(),
            "complete": done,
        }));
    }
    let state = if done { "complete" } else { "not complete" };
    println!("{} [{id}] marked {state}", capitalize(kind.noun()));
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
