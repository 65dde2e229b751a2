use super::Session;
use crate::output::{check, print_json, print_table};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum ModuleSubcommand {
    /// List modules and whether each is complete
    List,
    /// Submit a quiz score; a passing score completes the module
    Quiz {
        id: u32,
        #[arg(long)]
        correct: u32,
        #[arg(long)]
        total: u32,
    },
    /// Mark a module complete without a quiz
    Complete { id: u32 },
}

pub fn run(root: &Path, subcmd: ModuleSubcommand, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root)?;
    let tracker = session.tracker();
    match subcmd {
        ModuleSubcommand::List => {
            let done = tracker.completed_modules();
            let role = tracker.preferences().role;
            let required = role
                .as_deref()
                .map(|r| tracker.catalog().required_modules(r))
                .unwrap_or_default();
            if json {
                let items: Vec<_> = tracker
                    .catalog()
                    .modules
                    .iter()
                    .map(|m| {
                        serde_json::json!({
                            "id": m.id,
                            "title": m.title,
                            "complete": done.contains(&m.id),
                            "required": required.contains(&m.id),
                        })
                    })
                    .collect();
                return print_json(&items);
            }
            let rows = tracker
                .catalog()
                .modules
                .iter()
                .map(|m| {
                    vec![
                        check(done.contains(&m.id)),
                        m.id.to_string(),
                        m.title.clone(),
                        if required.contains(&m.id) { "required" } else { "" }.to_string(),
                    ]
                })
                .collect();
            print_table(&["", "ID", "MODULE", ""], rows);
            Ok(())
        }
        ModuleSubcommand::Quiz { id, correct, total } => {
            let outcome = tracker.submit_quiz(id, correct, total)?;
            if json {
                return print_json(&serde_json::json!({
                    "module": id,
                    "percent": outcome.percent,
                    "passed": outcome.passed,
                    "complete": tracker.is_module_complete(id),
                }));
            }
            if outcome.passed {
                println!("Module {id} quiz passed with {}%", outcome.percent);
            } else {
                println!(
                    "Module {id} quiz scored {}%; {}% needed to pass",
                    outcome.percent,
                    tracker.config().quiz_pass_percent
                );
            }
            Ok(())
        }
        ModuleSubcommand::Complete { id } => {
            let added = tracker.mark_module_complete(id)?;
            if json {
                return print_json(&serde_json::json!({ "module": id, "newly_completed": added }));
            }
            if added {
                println!("Module {id} marked complete");
            } else {
                println!("Module {id} was already complete");
            }
            Ok(())
        }
    }
}
