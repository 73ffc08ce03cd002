//! Document service: the surface a presentation layer holds

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{info, instrument};

use crate::domain::query::{self, CatalogSummary, FilterOptions};
use crate::domain::{
    BatchAction, BatchOutcome, CatalogRepository, Document, DocumentId, DocumentPatch,
    DomainError, FileRef, FilterCriteria, TaskEvent, TaskId, UploadTask, ValidationConfig,
};
use crate::infrastructure::batch::BatchOperationCoordinator;
use crate::infrastructure::ingestion::{BatchSubmission, IngestionPipeline};

/// Trait for the document service (for dynamic dispatch by callers)
#[async_trait]
pub trait DocumentServiceTrait: Send + Sync + Debug {
    /// Validate a batch and start one upload task per file
    async fn submit_batch(&self, files: Vec<FileRef>) -> BatchSubmission;

    /// Visible upload tasks in submission order
    async fn tasks(&self) -> Vec<UploadTask>;

    async fn task(&self, id: &str) -> Result<UploadTask, DomainError>;

    /// Retry a failed upload task
    async fn retry_task(&self, id: &str) -> Result<UploadTask, DomainError>;

    /// Drop an upload task in any state
    async fn remove_task(&self, id: &str) -> Result<UploadTask, DomainError>;

    /// Subscribe to task events
    fn subscribe(&self) -> broadcast::Receiver<TaskEvent>;

    /// Filtered and ordered view of the catalog
    async fn query(&self, criteria: &FilterCriteria) -> Result<Vec<Document>, DomainError>;

    async fn get(&self, id: DocumentId) -> Result<Document, DomainError>;

    /// Distinct values available to each filter
    async fn filter_options(&self) -> Result<FilterOptions, DomainError>;

    async fn summary(&self) -> Result<CatalogSummary, DomainError>;

    async fn rename(&self, id: DocumentId, name: String) -> Result<Document, DomainError>;

    /// Apply one bulk action to a selection
    async fn apply(
        &self,
        action: &BatchAction,
        ids: &[DocumentId],
    ) -> Result<BatchOutcome, DomainError>;
}

/// Document service implementation
pub struct DocumentService<C: CatalogRepository + 'static> {
    catalog: Arc<C>,
    pipeline: IngestionPipeline<C>,
    coordinator: BatchOperationCoordinator<C>,
    validation: ValidationConfig,
}

impl<C: CatalogRepository + 'static> DocumentService<C> {
    pub fn new(
        catalog: Arc<C>,
        pipeline: IngestionPipeline<C>,
        coordinator: BatchOperationCoordinator<C>,
        validation: ValidationConfig,
    ) -> Self {
        Self {
            catalog,
            pipeline,
            coordinator,
            validation,
        }
    }

    pub fn validation_config(&self) -> &ValidationConfig {
        &self.validation
    }

    pub fn pipeline(&self) -> &IngestionPipeline<C> {
        &self.pipeline
    }

    fn parse_task_id(&self, id: &str) -> Result<TaskId, DomainError> {
        TaskId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
    }
}

impl<C: CatalogRepository + 'static> Debug for DocumentService<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("validation", &self.validation)
            .field("coordinator", &self.coordinator)
            .finish()
    }
}

#[async_trait]
impl<C: CatalogRepository + 'static> DocumentServiceTrait for DocumentService<C> {
    async fn submit_batch(&self, files: Vec<FileRef>) -> BatchSubmission {
        self.pipeline.submit_batch(files, &self.validation).await
    }

    async fn tasks(&self) -> Vec<UploadTask> {
        self.pipeline.tasks().await
    }

    async fn task(&self, id: &str) -> Result<UploadTask, DomainError> {
        let task_id = self.parse_task_id(id)?;

        self.pipeline
            .task(&task_id)
            .await
            .ok_or_else(|| DomainError::not_found(format!("Task '{}' not found", id)))
    }

    async fn retry_task(&self, id: &str) -> Result<UploadTask, DomainError> {
        let task_id = self.parse_task_id(id)?;
        self.pipeline.retry(&task_id).await
    }

    async fn remove_task(&self, id: &str) -> Result<UploadTask, DomainError> {
        let task_id = self.parse_task_id(id)?;
        self.pipeline.remove(&task_id).await
    }

    fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.pipeline.subscribe()
    }

    #[instrument(skip(self, criteria))]
    async fn query(&self, criteria: &FilterCriteria) -> Result<Vec<Document>, DomainError> {
        let snapshot = self.catalog.list().await?;
        Ok(query::query(&snapshot, criteria))
    }

    async fn get(&self, id: DocumentId) -> Result<Document, DomainError> {
        self.catalog
            .get(&id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Document '{}' not found", id)))
    }

    async fn filter_options(&self) -> Result<FilterOptions, DomainError> {
        let snapshot = self.catalog.list().await?;
        Ok(query::filter_options(&snapshot))
    }

    async fn summary(&self) -> Result<CatalogSummary, DomainError> {
        let snapshot = self.catalog.list().await?;
        Ok(query::summarize(&snapshot))
    }

    #[instrument(skip(self, name), fields(document_id = %id))]
    async fn rename(&self, id: DocumentId, name: String) -> Result<Document, DomainError> {
        let renamed = self.catalog.update(&id, DocumentPatch::rename(name)).await?;
        info!(name = %renamed.name, "Document renamed");
        Ok(renamed)
    }

    async fn apply(
        &self,
        action: &BatchAction,
        ids: &[DocumentId],
    ) -> Result<BatchOutcome, DomainError> {
        self.coordinator.apply(action, ids).await
    }
}
