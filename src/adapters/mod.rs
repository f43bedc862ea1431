// Adapters layer: concrete implementations of the domain ports.

pub mod memory;
pub mod postgres;
pub mod storage;

pub use memory::{InMemoryHandledSet, InMemorySimStore};
pub use postgres::PgSimStore;
pub use storage::LocalStorage;
