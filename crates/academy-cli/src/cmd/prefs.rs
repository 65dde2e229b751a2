use super::Session;
use crate::output::print_json;
use academy_core::preferences::{PreferencesUpdate, UserPreferences};
use academy_core::types::{Experience, Role};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum PrefsSubcommand {
    /// Show current preferences
    Show,
    /// Update one or more preference fields
    Set {
        /// Role tag (compliance, operations, security, engineering, management)
        #[arg(long)]
        role: Option<String>,
        /// Experience level (beginner, intermediate, advanced)
        #[arg(long)]
        experience: Option<String>,
        /// First name shown on certificates
        #[arg(long)]
        name: Option<String>,
        /// Mark onboarding as done (or not)
        #[arg(long)]
        onboarded: Option<bool>,
    },
    /// Clear preferences back to defaults (progress is kept)
    Reset,
}

pub fn run(root: &Path, subcmd: PrefsSubcommand, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root)?;
    let tracker = session.tracker();
    match subcmd {
        PrefsSubcommand::Show => show(&tracker.preferences(), json),
        PrefsSubcommand::Set {
            role,
            experience,
            name,
            onboarded,
        } => {
            let update = PreferencesUpdate {
                role,
                experience,
                onboarding_complete: onboarded,
                first_name: name,
            };
            if update.is_empty() {
                anyhow::bail!("nothing to set: pass --role, --experience, --name or --onboarded");
            }
            if let Some(role) = update.role.as_deref() {
                if role.parse::<Role>().is_err() {
                    tracing::warn!("'{role}' is not a known role; progress views will be empty");
                }
            }
            if let Some(level) = update.experience.as_deref() {
                if level.parse::<Experience>().is_err() {
                    let known: Vec<&str> = Experience::all().iter().map(|e| e.as_str()).collect();
                    tracing::warn!(
                        "'{level}' is not a known experience level (expected one of: {})",
                        known.join(", ")
                    );
                }
            }
            let prefs = tracker.save_preferences(update)?;
            show(&prefs, json)
        }
        PrefsSubcommand::Reset => {
            let prefs = tracker.reset_preferences()?;
            if !json {
                println!("Preferences reset.");
            }
            show(&prefs, json)
        }
    }
}

fn show(prefs: &UserPreferences, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(prefs);
    }
    println!("Name:        {}", prefs.display_name());
    println!("Role:        {}", prefs.role.as_deref().unwrap_or("(unset)"));
    println!(
        "Experience:  {}",
        prefs.experience.as_deref().unwrap_or("(unset)")
    );
    println!(
        "Onboarding:  {}",
        if prefs.onboarding_complete {
            "complete"
        } else {
            "pending"
        }
    );
    Ok(())
}
