//! Applies one bulk action to a selection of documents

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::{
    BatchAction, BatchOutcome, CatalogRepository, Document, DocumentId, DocumentPatch,
    DomainError, Notification, Notifier, ShareTarget, share_summary,
};

/// Runs delete, archive, tag, download and share over a set of document IDs.
///
/// Unknown IDs are dropped before acting and reported as skipped. Mutations go
/// through the catalog's bulk operations, so each action is applied under a
/// single catalog write.
pub struct BatchOperationCoordinator<C: CatalogRepository> {
    catalog: Arc<C>,
    notifier: Arc<dyn Notifier>,
    share_target: Option<Arc<dyn ShareTarget>>,
}

impl<C: CatalogRepository> BatchOperationCoordinator<C> {
    pub fn new(catalog: Arc<C>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            catalog,
            notifier,
            share_target: None,
        }
    }

    /// Use a native share capability instead of the clipboard summary
    pub fn with_share_target(mut self, share_target: Arc<dyn ShareTarget>) -> Self {
        self.share_target = Some(share_target);
        self
    }

    #[instrument(skip(self, ids), fields(action = %action.kind(), requested = ids.len()))]
    pub async fn apply(
        &self,
        action: &BatchAction,
        ids: &[DocumentId],
    ) -> Result<BatchOutcome, DomainError> {
        action.validate()?;

        let kind = action.kind();
        if ids.is_empty() {
            debug!("Empty selection, nothing to do");
            return Ok(BatchOutcome::empty(kind));
        }

        let (selected, skipped) = self.resolve(ids).await?;
        if !skipped.is_empty() {
            warn!(skipped = skipped.len(), "Ignoring unknown document IDs");
        }

        let selected_ids: Vec<DocumentId> = selected.iter().map(|d| d.id).collect();
        let mut outcome = BatchOutcome {
            action: kind,
            affected: Vec::new(),
            skipped,
            clipboard: None,
        };

        if selected.is_empty() {
            return Ok(outcome);
        }

        match action {
            BatchAction::Delete => {
                let deleted = self.catalog.delete_many(&selected_ids).await?;
                outcome.affected = deleted.iter().map(|d| d.id).collect();
                self.notifier.notify(Notification::success(format!(
                    "Deleted {} document(s)",
                    deleted.len()
                )));
            }
            BatchAction::Archive => {
                let changed = self
                    .catalog
                    .update_many(&selected_ids, DocumentPatch::archive())
                    .await?;
                debug!(changed = changed.len(), "Archive applied");
                outcome.affected = selected_ids;
                self.notifier.notify(Notification::success(format!(
                    "Archived {} document(s)",
                    outcome.affected.len()
                )));
            }
            BatchAction::Tag { tags } => {
                let changed = self
                    .catalog
                    .update_many(&selected_ids, DocumentPatch::tag(tags.iter().cloned()))
                    .await?;
                debug!(changed = changed.len(), "Tags applied");
                outcome.affected = selected_ids;
                self.notifier.notify(Notification::success(format!(
                    "Tagged {} document(s)",
                    outcome.affected.len()
                )));
            }
            BatchAction::Download => {
                for document in &selected {
                    self.notifier
                        .notify(Notification::info(format!("Downloading {}", document.name)));
                }
                outcome.affected = selected_ids;
            }
            BatchAction::Share => {
                outcome.clipboard = self.share(selected).await?;
                outcome.affected = selected_ids;
            }
        }

        info!(
            affected = outcome.affected.len(),
            skipped = outcome.skipped.len(),
            "Batch action applied"
        );

        Ok(outcome)
    }

    /// Split the requested IDs into known documents and unknown IDs.
    ///
    /// Repeated IDs count once; request order is kept.
    async fn resolve(
        &self,
        ids: &[DocumentId],
    ) -> Result<(Vec<Document>, Vec<DocumentId>), DomainError> {
        let snapshot = self.catalog.list().await?;
        let mut seen = HashSet::new();
        let mut selected = Vec::new();
        let mut skipped = Vec::new();

        for id in ids {
            if !seen.insert(*id) {
                continue;
            }

            match snapshot.iter().find(|d| d.id == *id) {
                Some(document) => selected.push(document.clone()),
                None => skipped.push(*id),
            }
        }

        Ok((selected, skipped))
    }

    async fn share(&self, documents: Vec<Document>) -> Result<Option<String>, DomainError> {
        let count = documents.len();

        if let Some(target) = &self.share_target {
            target.share(documents).await?;
            self.notifier
                .notify(Notification::info(format!("Shared {} document(s)", count)));
            return Ok(None);
        }

        let summary = share_summary(&documents);
        self.notifier.notify(Notification::info(format!(
            "Details of {} document(s) copied to clipboard",
            count
        )));

        Ok(Some(summary))
    }
}

impl<C: CatalogRepository> std::fmt::Debug for BatchOperationCoordinator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchOperationCoordinator")
            .field("native_share", &self.share_target.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::batch::MockShareTarget;
    use crate::domain::document::MockCatalogRepository;
    use crate::domain::{NewDocument, NotificationLevel};
    use crate::infrastructure::catalog::InMemoryCatalogStore;
    use crate::infrastructure::notification::InMemoryNotifier;
    use chrono::NaiveDate;

    fn doc(name: &str) -> NewDocument {
        NewDocument::new(
            name,
            "Legal",
            "PDF",
            "1.0 MB",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
        .with_tags(["signed"])
    }

    fn setup() -> (
        Arc<InMemoryCatalogStore>,
        Arc<InMemoryNotifier>,
        BatchOperationCoordinator<InMemoryCatalogStore>,
    ) {
        let catalog = Arc::new(InMemoryCatalogStore::with_documents(vec![
            doc("a.pdf"),
            doc("b.pdf"),
            doc("c.pdf"),
        ]));
        let notifier = Arc::new(InMemoryNotifier::new());
        let coordinator = BatchOperationCoordinator::new(Arc::clone(&catalog), notifier.clone());

        (catalog, notifier, coordinator)
    }

    fn ids(values: &[u64]) -> Vec<DocumentId> {
        values.iter().copied().map(DocumentId::new).collect()
    }

    #[tokio::test]
    async fn test_delete_ignores_unknown_ids() {
        let (catalog, _, coordinator) = setup();

        let outcome = coordinator
            .apply(&BatchAction::Delete, &ids(&[1, 3, 99]))
            .await
            .unwrap();

        assert_eq!(outcome.affected, ids(&[1, 3]));
        assert_eq!(outcome.skipped, ids(&[99]));

        let remaining: Vec<_> = catalog.list().await.unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(remaining, vec!["b.pdf"]);
    }

    #[tokio::test]
    async fn test_archive_is_idempotent() {
        let (catalog, _, coordinator) = setup();
        let selection = ids(&[1, 2]);

        coordinator.apply(&BatchAction::Archive, &selection).await.unwrap();
        let once = catalog.list().await.unwrap();

        coordinator.apply(&BatchAction::Archive, &selection).await.unwrap();
        let twice = catalog.list().await.unwrap();

        assert_eq!(once, twice);
        assert!(twice[0].status.is_archived());
        assert!(twice[1].status.is_archived());
        assert!(!twice[2].status.is_archived());
    }

    #[tokio::test]
    async fn test_tag_is_a_union() {
        let (catalog, _, coordinator) = setup();

        coordinator
            .apply(&BatchAction::tag(["signed", "urgent"]), &ids(&[2]))
            .await
            .unwrap();
        coordinator
            .apply(&BatchAction::tag(["urgent"]), &ids(&[2]))
            .await
            .unwrap();

        let doc = catalog.get(&DocumentId::new(2)).await.unwrap().unwrap();
        assert_eq!(doc.tags, vec!["signed", "urgent"]);
    }

    #[tokio::test]
    async fn test_tag_without_tags_is_rejected() {
        let (_, _, coordinator) = setup();

        let result = coordinator
            .apply(&BatchAction::Tag { tags: vec![] }, &ids(&[1]))
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_empty_selection_is_a_noop() {
        let mut catalog = MockCatalogRepository::new();
        catalog.expect_list().never();
        catalog.expect_delete_many().never();

        let notifier = Arc::new(InMemoryNotifier::new());
        let coordinator = BatchOperationCoordinator::new(Arc::new(catalog), notifier.clone());

        let outcome = coordinator.apply(&BatchAction::Delete, &[]).await.unwrap();

        assert!(outcome.is_noop());
        assert!(outcome.skipped.is_empty());
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_download_notifies_per_document() {
        let (catalog, notifier, coordinator) = setup();
        let before = catalog.list().await.unwrap();

        let outcome = coordinator
            .apply(&BatchAction::Download, &ids(&[1, 2, 2]))
            .await
            .unwrap();

        assert_eq!(outcome.affected, ids(&[1, 2]));
        assert_eq!(notifier.with_level(NotificationLevel::Info).len(), 2);
        assert_eq!(catalog.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_share_falls_back_to_clipboard() {
        let (_, notifier, coordinator) = setup();

        let outcome = coordinator
            .apply(&BatchAction::Share, &ids(&[1]))
            .await
            .unwrap();

        let clipboard = outcome.clipboard.unwrap();
        assert!(clipboard.starts_with("a.pdf (Legal)"));
        assert!(notifier.notifications()[0].message.contains("clipboard"));
    }

    #[tokio::test]
    async fn test_share_uses_native_target() {
        let (catalog, _, _) = setup();
        let mut target = MockShareTarget::new();
        target
            .expect_share()
            .withf(|docs| docs.len() == 2)
            .times(1)
            .returning(|_| Ok(()));

        let coordinator =
            BatchOperationCoordinator::new(catalog, Arc::new(InMemoryNotifier::new()))
                .with_share_target(Arc::new(target));

        let outcome = coordinator
            .apply(&BatchAction::Share, &ids(&[1, 3]))
            .await
            .unwrap();

        assert!(outcome.clipboard.is_none());
        assert_eq!(outcome.affected.len(), 2);
    }
}
