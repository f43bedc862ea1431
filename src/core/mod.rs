pub mod ingest_loop;
pub mod parser;
pub mod processor;
pub mod validator;

pub use crate::domain::model::{FileData, Header, ProcessingReport, SimRecord, ValidationResult};
pub use crate::domain::ports::{HandledTracker, SimStore, Storage};
pub use crate::utils::error::Result;
