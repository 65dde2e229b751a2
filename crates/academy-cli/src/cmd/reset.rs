use super::Session;
use crate::output::print_json;
use std::path::Path;

pub fn run(root: &Path, yes: bool, json: bool) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!("reset erases all progress and preferences; re-run with --yes to confirm");
    }
    let session = Session::open(root)?;
    session.tracker().reset()?;

    if json {
        print_json(&serde_json::json!({ "reset": true }))?;
    } else {
        println!("All progress and preferences erased");
    }
    Ok(())
}
