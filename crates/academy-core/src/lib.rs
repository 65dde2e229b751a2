pub mod backup;
pub mod badge;
pub mod catalog;
pub mod completion;
pub mod config;
pub mod error;
pub mod exam;
pub mod io;
pub mod modules;
pub mod paths;
pub mod preferences;
pub mod role_progress;
pub mod store;
pub mod tracker;
pub mod types;

pub use error::{AcademyError, Result};
pub use store::{FileStore, MemoryStore, Store};
pub use tracker::ProgressTracker;
