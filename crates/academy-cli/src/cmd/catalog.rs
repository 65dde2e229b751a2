use super::Session;
use crate::output::{print_json, print_table};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root)?;
    let tracker = session.tracker();
    let catalog = tracker.catalog();

    if json {
        return print_json(catalog);
    }

    let rows = catalog
        .roles
        .iter()
        .map(|r| {
            let required: Vec<String> = catalog
                .required_modules(&r.role)
                .iter()
                .map(u32::to_string)
                .collect();
            vec![
                r.role.clone(),
                r.title.clone(),
                required.join(","),
                r.tasks().count().to_string(),
                r.missions.len().to_string(),
            ]
        })
        .collect();
    print_table(&["ROLE", "TITLE", "REQUIRED", "TASKS", "MISSIONS"], rows);
    println!();

    let rows = catalog
        .modules
        .iter()
        .map(|m| vec![m.id.to_string(), m.title.clone()])
        .collect();
    print_table(&["ID", "MODULE"], rows);
    Ok(())
}
