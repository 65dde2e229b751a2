use super::{resolve_role, Session};
use crate::output::{bar, print_json};
use academy_core::completion::{CompletionState, REQUIRED_TASKS_PERCENT};
use std::path::Path;

pub fn run(root: &Path, role: Option<&str>, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root)?;
    let tracker = session.tracker();
    let role = resolve_role(&tracker, role)?;
    let p = tracker.completion(&role);

    if json {
        return print_json(&p);
    }
    println!("Progress for {role}");
    println!(
        "  Modules   {}  {}/{} required",
        bar(p.modules_progress),
        p.modules_complete,
        p.total_modules
    );
    println!(
        "  Tasks     {}  {}/{}",
        bar(p.tasks_progress),
        p.tasks_complete,
        p.total_tasks
    );
    println!(
        "  Missions  {}  {}/{} (need {})",
        bar(p.missions_progress),
        p.missions_complete,
        p.total_missions,
        p.missions_required
    );
    println!("  Overall   {}", bar(p.overall));
    Ok(())
}

pub fn certificate(root: &Path, role: Option<&str>, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root)?;
    let tracker = session.tracker();
    let role = resolve_role(&tracker, role)?;
    let p = tracker.completion(&role);
    let state = p.state();
    let shortfall = p.shortfall();
    let prefs = tracker.preferences();
    let title = tracker
        .catalog()
        .role(&role)
        .map(|r| r.title.clone())
        .unwrap_or_else(|| role.clone());

    if json {
        return print_json(&serde_json::json!({
            "role": role,
            "title": title,
            "learner": prefs.display_name(),
            "state": state,
            "shortfall": shortfall,
        }));
    }
    match state {
        CompletionState::Unlocked => {
            println!(
                "Certificate unlocked: {} completed the {title} track",
                prefs.display_name()
            );
        }
        CompletionState::Locked => {
            println!("Certificate locked for {title}");
            println!(
                "Requires every required module, {REQUIRED_TASKS_PERCENT}% of tasks and {} mission(s)",
                p.missions_required
            );
            println!("Still needed: {shortfall}");
        }
    }
    Ok(())
}
