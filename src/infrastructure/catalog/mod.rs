//! Catalog store implementations

mod in_memory;
mod seed;

pub use in_memory::InMemoryCatalogStore;
pub use seed::sample_documents;
