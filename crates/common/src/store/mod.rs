mod memory;
mod provider;

pub use memory::{MemoryStore, MemoryStoreError, StoreOp};
pub use provider::{DocumentStore, StoreError};
