pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::AppConfig;

pub use adapters::{InMemoryHandledSet, InMemorySimStore, LocalStorage, PgSimStore};
pub use crate::core::{ingest_loop::IngestLoop, processor::FileProcessor};
pub use domain::ports::{HandledTracker, SimStore, Storage};
pub use utils::error::{IngestError, Result};
