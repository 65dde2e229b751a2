use super::{resolve_role, Session};
use crate::output::print_json;
use std::path::Path;

pub fn run(
    root: &Path,
    role: Option<&str>,
    correct: u32,
    total: u32,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::open(root)?;
    let tracker = session.tracker();
    let role = resolve_role(&tracker, role)?;
    let record = tracker.record_exam(&role, correct, total)?;

    if json {
        return print_json(&serde_json::json!({ "role": role, "record": record }));
    }
    if record.passed {
        println!(
            "{role} exam passed (best score {}%)",
            record.best_percent
        );
    } else {
        println!(
            "{role} exam not passed yet (best score {}%, {}% needed)",
            record.best_percent,
            tracker.config().exam_pass_percent
        );
    }
    Ok(())
}
