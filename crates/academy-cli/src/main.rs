mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    backup::BackupSubcommand, config::ConfigSubcommand, module::ModuleSubcommand,
    prefs::PrefsSubcommand, task::ChecklistSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "academy",
    about = "CIP training academy progress tracker: modules, role checklists, badges and certificates",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root (default: nearest directory with .academy/, else home)
    #[arg(long, global = true, env = "ACADEMY_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the .academy/ data directory
    Init,

    /// Show or change learner preferences
    Prefs {
        #[command(subcommand)]
        subcommand: PrefsSubcommand,
    },

    /// Module quizzes and completion
    Module {
        #[command(subcommand)]
        subcommand: ModuleSubcommand,
    },

    /// Role phase tasks
    Task {
        #[command(subcommand)]
        subcommand: ChecklistSubcommand,
    },

    /// Role missions
    Mission {
        #[command(subcommand)]
        subcommand: ChecklistSubcommand,
    },

    /// Record a final exam attempt for a role
    Exam {
        /// Questions answered correctly
        #[arg(long)]
        correct: u32,
        /// Questions in the exam
        #[arg(long)]
        total: u32,
        /// Role (default: the role in preferences)
        #[arg(long)]
        role: Option<String>,
    },

    /// Completion percentages for a role
    Progress {
        #[arg(long)]
        role: Option<String>,
    },

    /// Earned badges for a role, or for every role with --all
    Badges {
        #[arg(long)]
        role: Option<String>,
        #[arg(long, conflicts_with = "role")]
        all: bool,
        /// Show one badge in detail
        #[arg(long, conflicts_with = "all")]
        id: Option<String>,
    },

    /// Certificate status for a role
    Certificate {
        #[arg(long)]
        role: Option<String>,
    },

    /// Export, validate and import progress backups
    Backup {
        #[command(subcommand)]
        subcommand: BackupSubcommand,
    },

    /// Inspect and validate .academy/config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// List roles and modules in the content catalog
    Catalog,

    /// Erase all progress and preferences
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved data root");

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Prefs { subcommand } => cmd::prefs::run(&root, subcommand, cli.json),
        Commands::Module { subcommand } => cmd::module::run(&root, subcommand, cli.json),
        Commands::Task { subcommand } => {
            cmd::task::run(&root, cmd::task::Kind::Task, subcommand, cli.json)
        }
        Commands::Mission { subcommand } => {
            cmd::task::run(&root, cmd::task::Kind::Mission, subcommand, cli.json)
        }
        Commands::Exam {
            correct,
            total,
            role,
        } => cmd::exam::run(&root, role.as_deref(), correct, total, cli.json),
        Commands::Progress { role } => cmd::progress::run(&root, role.as_deref(), cli.json),
        Commands::Badges { role, all, id } => {
            cmd::badges::run(&root, role.as_deref(), all, id.as_deref(), cli.json)
        }
        Commands::Certificate { role } => {
            cmd::progress::certificate(&root, role.as_deref(), cli.json)
        }
        Commands::Backup { subcommand } => cmd::backup::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Catalog => cmd::catalog::run(&root, cli.json),
        Commands::Reset { yes } => cmd::reset::run(&root, yes, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
