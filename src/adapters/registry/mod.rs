//! Health registry adapters.
//!
//! - `InMemoryHealthRegistry` - Process-local registry for demos and tests

mod in_memory_registry;

pub use in_memory_registry::InMemoryHealthRegistry;
