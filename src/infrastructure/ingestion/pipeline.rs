//! Ingestion pipeline: one asynchronous task per validated file

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, instrument, warn};

use crate::domain::document::{file_type_label, format_size, infer_category};
use crate::domain::ingestion::validate;
use crate::domain::{
    CatalogRepository, Clock, Document, DocumentDetails, DomainError, FileRef, NewDocument,
    Notification, Notifier, TaskEvent, TaskEventKind, TaskId, TransferSimulator, UploadTask,
    ValidationConfig, ValidationResult,
};

/// Tags carried by every document admitted through the pipeline
pub const UPLOAD_TAGS: [&str; 2] = ["uploaded", "new"];

const EVENT_CAPACITY: usize = 256;
const MIN_TICK: Duration = Duration::from_millis(1);

/// Pipeline tuning
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Interval between progress updates
    pub tick_interval: Duration,
    /// How long a completed task stays visible; `None` keeps it until removed
    pub completed_retention: Option<Duration>,
    /// Error shown on a failed transfer
    pub failure_message: String,
    /// Identity recorded as `uploadedBy` on admitted documents
    pub uploaded_by: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            completed_retention: Some(Duration::from_secs(2)),
            failure_message: "Upload failed. Please try again.".to_string(),
            uploaded_by: "Current User".to_string(),
        }
    }
}

impl PipelineSettings {
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_completed_retention(mut self, retention: Option<Duration>) -> Self {
        self.completed_retention = retention;
        self
    }

    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    pub fn with_uploaded_by(mut self, uploaded_by: impl Into<String>) -> Self {
        self.uploaded_by = uploaded_by.into();
        self
    }
}

/// Result of submitting one batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchSubmission {
    pub validation: ValidationResult,
    /// Tasks created for the batch; empty when validation rejected it
    pub tasks: Vec<UploadTask>,
}

impl BatchSubmission {
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|t| t.id().clone()).collect()
    }
}

struct PipelineInner<C: CatalogRepository> {
    catalog: Arc<C>,
    clock: Arc<dyn Clock>,
    simulator: Arc<dyn TransferSimulator>,
    notifier: Arc<dyn Notifier>,
    settings: PipelineSettings,
    /// Visible tasks in submission order
    tasks: RwLock<Vec<UploadTask>>,
    events: broadcast::Sender<TaskEvent>,
}

/// Runs simulated transfers and admits finished files into the catalog
pub struct IngestionPipeline<C: CatalogRepository + 'static> {
    inner: Arc<PipelineInner<C>>,
}

impl<C: CatalogRepository + 'static> IngestionPipeline<C> {
    pub fn new(
        catalog: Arc<C>,
        clock: Arc<dyn Clock>,
        simulator: Arc<dyn TransferSimulator>,
        notifier: Arc<dyn Notifier>,
        settings: PipelineSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            inner: Arc::new(PipelineInner {
                catalog,
                clock,
                simulator,
                notifier,
                settings,
                tasks: RwLock::new(Vec::new()),
                events,
            }),
        }
    }

    /// Validate a batch and, if every file passes, start one task per file.
    ///
    /// A batch with any validation error starts no task at all. Each error and
    /// warning is reported as its own notification.
    #[instrument(skip(self, files, config), fields(files = files.len()))]
    pub async fn submit_batch(
        &self,
        files: Vec<FileRef>,
        config: &ValidationConfig,
    ) -> BatchSubmission {
        let validation = validate(&files, config);

        for error in &validation.errors {
            self.inner.notifier.notify(Notification::error(error.clone()));
        }

        for warning in &validation.warnings {
            self.inner
                .notifier
                .notify(Notification::warning(warning.clone()));
        }

        if !validation.accepted {
            warn!(
                errors = validation.errors.len(),
                "Batch rejected by validation"
            );
            return BatchSubmission {
                validation,
                tasks: Vec::new(),
            };
        }

        let tasks: Vec<UploadTask> = files.into_iter().map(UploadTask::new).collect();

        {
            let mut visible = self.inner.tasks.write().await;
            visible.extend(tasks.iter().cloned());
        }

        if !tasks.is_empty() {
            self.inner.notifier.notify(Notification::info(format!(
                "Uploading {} file(s)",
                tasks.len()
            )));
        }

        for task in &tasks {
            self.inner.publish(
                task.id(),
                TaskEventKind::Queued {
                    file_name: task.file().name.clone(),
                },
            );
            self.spawn_attempt(task.id().clone(), task.attempt());
        }

        info!(tasks = tasks.len(), "Batch accepted");

        BatchSubmission { validation, tasks }
    }

    /// Snapshot of visible tasks in submission order
    pub async fn tasks(&self) -> Vec<UploadTask> {
        self.inner.tasks.read().await.clone()
    }

    pub async fn task(&self, id: &TaskId) -> Option<UploadTask> {
        self.inner
            .tasks
            .read()
            .await
            .iter()
            .find(|t| t.id() == id)
            .cloned()
    }

    /// Re-arm a failed task with a fresh timing and failure roll
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn retry(&self, id: &TaskId) -> Result<UploadTask, DomainError> {
        let task = {
            let mut tasks = self.inner.tasks.write().await;
            let task = tasks
                .iter_mut()
                .find(|t| t.id() == id)
                .ok_or_else(|| DomainError::not_found(format!("Task '{}' not found", id)))?;

            task.retry()
                .map_err(|e| DomainError::validation(e.to_string()))?;
            task.clone()
        };

        info!(attempt = task.attempt(), "Retrying upload");
        self.inner.publish(
            task.id(),
            TaskEventKind::Retried {
                attempt: task.attempt(),
            },
        );
        self.spawn_attempt(task.id().clone(), task.attempt());

        Ok(task)
    }

    /// Drop a task from the visible list in any state.
    ///
    /// An uploading task stops at its next tick; a document already admitted
    /// by the task stays in the catalog.
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn remove(&self, id: &TaskId) -> Result<UploadTask, DomainError> {
        let removed = {
            let mut tasks = self.inner.tasks.write().await;
            let index = tasks
                .iter()
                .position(|t| t.id() == id)
                .ok_or_else(|| DomainError::not_found(format!("Task '{}' not found", id)))?;
            tasks.remove(index)
        };

        debug!(status = %removed.status(), "Task removed");
        self.inner.publish(id, TaskEventKind::Removed);

        Ok(removed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.inner.events.subscribe()
    }

    /// Task events as a stream; lagging consumers see an error item
    pub fn events(&self) -> BroadcastStream<TaskEvent> {
        BroadcastStream::new(self.subscribe())
    }

    fn spawn_attempt(&self, id: TaskId, attempt: u32) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.run_attempt(id, attempt).await });
    }
}

impl<C: CatalogRepository + 'static> PipelineInner<C> {
    fn publish(&self, id: &TaskId, kind: TaskEventKind) {
        // No receivers is fine.
        let _ = self.events.send(TaskEvent::new(id.clone(), kind));
    }

    async fn run_attempt(&self, id: TaskId, attempt: u32) {
        let plan = self.simulator.plan();
        let tick = self.settings.tick_interval.max(MIN_TICK);
        let mut elapsed = Duration::ZERO;

        debug!(
            task_id = %id,
            attempt,
            duration_ms = plan.duration.as_millis() as u64,
            "Transfer started"
        );

        while elapsed < plan.duration {
            let wait = tick.min(plan.duration - elapsed);
            self.clock.sleep(wait).await;
            elapsed += wait;

            if elapsed >= plan.duration {
                break;
            }

            let step = self.simulator.progress_step();
            match self.advance(&id, attempt, step).await {
                Some((before, after)) if after > before => {
                    self.publish(&id, TaskEventKind::Progress { progress: after })
                }
                Some(_) => {}
                None => {
                    debug!(task_id = %id, attempt, "Transfer abandoned");
                    return;
                }
            }
        }

        let Some(file) = self.current_file(&id, attempt).await else {
            debug!(task_id = %id, attempt, "Transfer abandoned");
            return;
        };

        if plan.will_fail {
            self.fail(&id, attempt, &file, self.settings.failure_message.clone())
                .await;
            return;
        }

        match self.catalog.create(self.document_for(&file)).await {
            Ok(document) => self.complete(&id, attempt, &file, &document).await,
            Err(e) => {
                warn!(task_id = %id, error = %e, "Catalog rejected uploaded document");
                self.fail(&id, attempt, &file, e.to_string()).await;
            }
        }
    }

    /// Apply one progress step, returning progress before and after; `None`
    /// if the attempt is no longer current
    async fn advance(&self, id: &TaskId, attempt: u32, step: u8) -> Option<(u8, u8)> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id() == id && t.attempt() == attempt)?;

        let before = task.progress();
        task.advance(step).ok().map(|after| (before, after))
    }

    async fn current_file(&self, id: &TaskId, attempt: u32) -> Option<FileRef> {
        self.tasks
            .read()
            .await
            .iter()
            .find(|t| t.id() == id && t.attempt() == attempt && !t.is_terminal())
            .map(|t| t.file().clone())
    }

    fn document_for(&self, file: &FileRef) -> NewDocument {
        NewDocument::new(
            file.name.clone(),
            infer_category(&file.name, &file.mime_type),
            file_type_label(&file.name, &file.mime_type),
            format_size(file.size),
            self.clock.today(),
        )
        .with_tags(UPLOAD_TAGS)
        .with_details(DocumentDetails::Upload {
            uploaded_by: self.settings.uploaded_by.clone(),
        })
    }

    async fn complete(&self, id: &TaskId, attempt: u32, file: &FileRef, document: &Document) {
        let still_visible = {
            let mut tasks = self.tasks.write().await;
            match tasks
                .iter_mut()
                .find(|t| t.id() == id && t.attempt() == attempt)
            {
                Some(task) => {
                    task.attach_document(document.id);
                    task.mark_completed().is_ok()
                }
                None => false,
            }
        };

        info!(task_id = %id, document_id = %document.id, "Upload completed");
        self.publish(
            id,
            TaskEventKind::Completed {
                document_id: document.id,
            },
        );
        self.notifier.notify(Notification::success(format!(
            "{} uploaded successfully",
            file.name
        )));

        if still_visible {
            if let Some(retention) = self.settings.completed_retention {
                self.clock.sleep(retention).await;
                self.expire(id, attempt).await;
            }
        }
    }

    async fn fail(&self, id: &TaskId, attempt: u32, file: &FileRef, error: String) {
        {
            let mut tasks = self.tasks.write().await;
            let Some(task) = tasks
                .iter_mut()
                .find(|t| t.id() == id && t.attempt() == attempt)
            else {
                return;
            };

            if task.mark_failed(error.clone()).is_err() {
                return;
            }
        }

        warn!(task_id = %id, attempt, error = %error, "Upload failed");
        self.publish(id, TaskEventKind::Failed { error });
        self.notifier
            .notify(Notification::error(format!("Failed to upload {}", file.name)));
    }

    /// Drop a completed task once its display window has passed
    async fn expire(&self, id: &TaskId, attempt: u32) {
        let removed = {
            let mut tasks = self.tasks.write().await;
            let before = tasks.len();
            tasks.retain(|t| !(t.id() == id && t.attempt() == attempt && t.is_terminal()));
            tasks.len() < before
        };

        if removed {
            debug!(task_id = %id, "Completed task expired");
            self.publish(id, TaskEventKind::Removed);
        }
    }
}
