use crate::backup::BackupError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcademyError {
    #[error("not initialized: run 'academy init'")]
    NotInitialized,

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("module not found: {0}")]
    ModuleNotFound(u32),

    #[error("invalid id '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidId(String),

    #[error("invalid score {correct}/{total}")]
    InvalidScore { correct: u32, total: u32 },

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("backup rejected: {0}")]
    Backup(#[from] BackupError),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AcademyError>;
