//! In-memory catalog store

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{
    CatalogRepository, Document, DocumentId, DocumentPatch, DomainError, NewDocument,
};

#[derive(Debug)]
struct CatalogState {
    documents: Vec<Document>,
    next_id: u64,
}

impl CatalogState {
    fn admit(&mut self, document: NewDocument) -> Document {
        let id = DocumentId::new(self.next_id);
        self.next_id += 1;

        let document = document.into_document(id);
        self.documents.push(document.clone());
        document
    }

    fn position(&self, id: &DocumentId) -> Option<usize> {
        self.documents.iter().position(|d| d.id == *id)
    }
}

/// Lock-guarded in-memory implementation of CatalogRepository
///
/// Identifiers come from a counter that only moves forward, so deleted IDs are
/// never handed out again. Insertion order is preserved.
#[derive(Debug)]
pub struct InMemoryCatalogStore {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalogStore {
    /// Creates a new empty catalog
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CatalogState {
                documents: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Creates a catalog pre-populated with documents, in order
    pub fn with_documents(documents: Vec<NewDocument>) -> Self {
        let mut state = CatalogState {
            documents: Vec::with_capacity(documents.len()),
            next_id: 1,
        };

        for document in documents {
            state.admit(document);
        }

        Self {
            state: RwLock::new(state),
        }
    }
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogStore {
    async fn create(&self, document: NewDocument) -> Result<Document, DomainError> {
        document.validate()?;

        let mut state = self.state.write().await;
        let document = state.admit(document);

        debug!(document_id = %document.id, name = %document.name, "Document admitted");
        Ok(document)
    }

    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        let state = self.state.read().await;
        Ok(state.documents.iter().find(|d| d.id == *id).cloned())
    }

    async fn update(&self, id: &DocumentId, patch: DocumentPatch) -> Result<Document, DomainError> {
        patch.validate()?;

        let mut state = self.state.write().await;
        let index = state
            .position(id)
            .ok_or_else(|| DomainError::not_found(format!("Document '{}' not found", id)))?;

        let document = &mut state.documents[index];
        patch.apply(document);
        Ok(document.clone())
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let index = state
            .position(id)
            .ok_or_else(|| DomainError::not_found(format!("Document '{}' not found", id)))?;

        state.documents.remove(index);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Document>, DomainError> {
        let state = self.state.read().await;
        Ok(state.documents.clone())
    }

    async fn update_many(
        &self,
        ids: &[DocumentId],
        patch: DocumentPatch,
    ) -> Result<Vec<Document>, DomainError> {
        patch.validate()?;

        let wanted: HashSet<&DocumentId> = ids.iter().collect();
        let mut state = self.state.write().await;

        let changed = state
            .documents
            .iter_mut()
            .filter(|d| wanted.contains(&d.id))
            .filter_map(|d| patch.apply(d).then(|| d.clone()))
            .collect();

        Ok(changed)
    }

    async fn delete_many(&self, ids: &[DocumentId]) -> Result<Vec<Document>, DomainError> {
        let wanted: HashSet<&DocumentId> = ids.iter().collect();
        let mut state = self.state.write().await;

        let (removed, kept): (Vec<Document>, Vec<Document>) = state
            .documents
            .drain(..)
            .partition(|d| wanted.contains(&d.id));
        state.documents = kept;

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn new_doc(name: &str) -> NewDocument {
        NewDocument::new(
            name,
            "Legal",
            "PDF",
            "1.0 MB",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )
        .with_tags(["uploaded", "new"])
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = InMemoryCatalogStore::new();

        let a = store.create(new_doc("a.pdf")).await.unwrap();
        let b = store.create(new_doc("b.pdf")).await.unwrap();

        assert_eq!(a.id, DocumentId::new(1));
        assert_eq!(b.id, DocumentId::new(2));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let store = InMemoryCatalogStore::new();
        assert!(store.create(new_doc(" ")).await.is_err());
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let store = InMemoryCatalogStore::new();

        let a = store.create(new_doc("a.pdf")).await.unwrap();
        store.delete(&a.id).await.unwrap();
        let b = store.create(new_doc("b.pdf")).await.unwrap();

        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = InMemoryCatalogStore::with_documents(vec![
            new_doc("z.pdf"),
            new_doc("a.pdf"),
            new_doc("m.pdf"),
        ]);

        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["z.pdf", "a.pdf", "m.pdf"]);
    }

    #[tokio::test]
    async fn test_list_is_a_snapshot() {
        let store = InMemoryCatalogStore::new();
        store.create(new_doc("a.pdf")).await.unwrap();

        let snapshot = store.list().await.unwrap();
        store.create(new_doc("b.pdf")).await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_rename() {
        let store = InMemoryCatalogStore::new();
        let doc = store.create(new_doc("a.pdf")).await.unwrap();

        let updated = store
            .update(&doc.id, DocumentPatch::rename("renamed.pdf"))
            .await
            .unwrap();

        assert_eq!(updated.name, "renamed.pdf");
        assert_eq!(updated.tags, doc.tags);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = InMemoryCatalogStore::new();
        let result = store
            .update(&DocumentId::new(99), DocumentPatch::archive())
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let store = InMemoryCatalogStore::new();
        let result = store.delete(&DocumentId::new(99)).await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_many_reports_only_changed() {
        let store =
            InMemoryCatalogStore::with_documents(vec![new_doc("a.pdf"), new_doc("b.pdf")]);
        let ids = [DocumentId::new(1), DocumentId::new(2), DocumentId::new(42)];

        store
            .update(&DocumentId::new(1), DocumentPatch::archive())
            .await
            .unwrap();
        let changed = store.update_many(&ids, DocumentPatch::archive()).await.unwrap();

        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].id, DocumentId::new(2));
    }

    #[tokio::test]
    async fn test_delete_many_ignores_unknown() {
        let store = InMemoryCatalogStore::with_documents(vec![
            new_doc("a.pdf"),
            new_doc("b.pdf"),
            new_doc("c.pdf"),
        ]);

        let removed = store
            .delete_many(&[DocumentId::new(1), DocumentId::new(3), DocumentId::new(9)])
            .await
            .unwrap();

        assert_eq!(removed.len(), 2);
        let remaining = store.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "b.pdf");
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let store = Arc::new(InMemoryCatalogStore::new());

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.create(new_doc(&format!("{}.pdf", i))).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().unwrap().id);
        }

        assert_eq!(ids.len(), 50);
        assert_eq!(store.list().await.unwrap().len(), 50);
    }
}
