//! Object storage abstraction for generated assets.

mod backend;
mod local;
mod memory;

pub use backend::{ObjectStore, StorageError, StorageResult};
pub use local::LocalStore;
pub use memory::MemoryStore;
