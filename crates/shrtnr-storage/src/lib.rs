//! Key-value backends and the bidirectional mapping store.

pub mod mapping;
pub mod memory;
pub mod redis;

pub use crate::mapping::MappingStore;
pub use crate::memory::InMemoryStore;
pub use crate::redis::RedisStore;
