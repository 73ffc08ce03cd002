//! Catalog repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{Document, DocumentId, DocumentPatch, NewDocument};
use crate::domain::DomainError;

/// Authoritative store of catalog documents
///
/// Every mutation is atomic with respect to every other mutation, and every
/// read returns an owned snapshot.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Admits a document, assigning a fresh identifier
    async fn create(&self, document: NewDocument) -> Result<Document, DomainError>;

    /// Finds a document by ID
    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, DomainError>;

    /// Applies a partial update; unknown IDs are reported as not found
    async fn update(&self, id: &DocumentId, patch: DocumentPatch) -> Result<Document, DomainError>;

    /// Removes a document; unknown IDs are reported as not found
    async fn delete(&self, id: &DocumentId) -> Result<(), DomainError>;

    /// Snapshot of all documents in insertion order
    async fn list(&self) -> Result<Vec<Document>, DomainError>;

    /// Applies one patch to every known ID under a single lock, returning the
    /// documents that actually changed. Unknown IDs are ignored.
    async fn update_many(
        &self,
        ids: &[DocumentId],
        patch: DocumentPatch,
    ) -> Result<Vec<Document>, DomainError>;

    /// Removes every known ID under a single lock, returning the removed
    /// documents. Unknown IDs are ignored.
    async fn delete_many(&self, ids: &[DocumentId]) -> Result<Vec<Document>, DomainError>;
}
