//! Ingest command - validates and uploads local files

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use super::{bootstrap, print_json};
use crate::domain::{
    Clock, Document, FileRef, FilterCriteria, TaskEvent, TaskEventKind, TaskId, TaskStatus,
    UploadTask, ValidationResult,
};
use crate::infrastructure::catalog::{InMemoryCatalogStore, sample_documents};
use crate::infrastructure::ingestion::{InstantClock, TokioClock};
use crate::infrastructure::notification::TracingNotifier;
use crate::infrastructure::services::DocumentServiceTrait;

/// Arguments for the ingest command
#[derive(Args, Clone)]
pub struct IngestArgs {
    /// Files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Retry rounds for failed uploads
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Skip simulated transfer delays
    #[arg(long)]
    pub instant: bool,

    /// Start from the sample catalog instead of an empty one
    #[arg(long)]
    pub with_samples: bool,
}

#[derive(Serialize)]
struct IngestReport {
    validation: ValidationResult,
    tasks: Vec<UploadTask>,
    catalog: Vec<Document>,
}

/// Run the ingest command
pub async fn run(args: IngestArgs) -> anyhow::Result<()> {
    let config = bootstrap();

    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        files.push(file_ref(path).await?);
    }

    let catalog = if args.with_samples {
        InMemoryCatalogStore::with_documents(sample_documents())
    } else {
        InMemoryCatalogStore::new()
    };
    let clock: Arc<dyn Clock> = if args.instant {
        Arc::new(InstantClock::today_local())
    } else {
        Arc::new(TokioClock::new())
    };

    let service = crate::create_document_service_with(
        &config,
        Arc::new(catalog),
        clock,
        Arc::new(TracingNotifier::new()),
    )?;

    let mut events = service.subscribe();
    let submission = service.submit_batch(files).await;

    if !submission.validation.accepted {
        print_json(&submission.validation)?;
        anyhow::bail!(
            "Batch rejected with {} error(s)",
            submission.validation.errors.len()
        );
    }

    let mut pending: HashSet<TaskId> = submission.task_ids().into_iter().collect();
    let mut round = 0;

    loop {
        let failed = wait_for(&service, &mut events, &mut pending).await;
        if failed.is_empty() || round == args.retries {
            if !failed.is_empty() {
                warn!(failed = failed.len(), "Uploads failed after all retries");
            }
            break;
        }

        round += 1;
        info!(round, failed = failed.len(), "Retrying failed uploads");

        for id in failed {
            service.retry_task(id.as_str()).await?;
            pending.insert(id);
        }
    }

    print_json(&IngestReport {
        validation: submission.validation,
        tasks: service.tasks().await,
        catalog: service.query(&FilterCriteria::default()).await?,
    })
}

/// Describe a local file by name, size and guessed MIME type
async fn file_ref(path: &Path) -> anyhow::Result<FileRef> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("'{}' has no file name", path.display()))?;

    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Ok(FileRef::new(name, metadata.len(), mime.essence_str()))
}

/// Wait until every pending task reaches a terminal state; returns the failed ones
async fn wait_for<S: DocumentServiceTrait + ?Sized>(
    service: &S,
    events: &mut broadcast::Receiver<TaskEvent>,
    pending: &mut HashSet<TaskId>,
) -> Vec<TaskId> {
    let mut failed = Vec::new();

    while !pending.is_empty() {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Task event stream lagged, reconciling with task list");
                settle(service, pending, &mut failed).await;
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        if !event.is_terminal() || !pending.remove(&event.task_id) {
            continue;
        }

        if let TaskEventKind::Failed { error } = &event.kind {
            warn!(task_id = %event.task_id, error = %error, "Upload failed");
            failed.push(event.task_id);
        }
    }

    failed
}

/// Resolve pending tasks from the task list after missed events.
///
/// A task no longer listed was removed or expired after completing.
async fn settle<S: DocumentServiceTrait + ?Sized>(
    service: &S,
    pending: &mut HashSet<TaskId>,
    failed: &mut Vec<TaskId>,
) {
    let tasks = service.tasks().await;

    pending.retain(|id| match tasks.iter().find(|t| t.id() == id) {
        Some(task) if task.status() == TaskStatus::Error => {
            failed.push(id.clone());
            false
        }
        Some(task) => !task.is_terminal(),
        None => false,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use chrono::NaiveDate;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_for_recovers_from_lag() {
        let mut config = AppConfig::default();
        config.ingestion.failure_rate = 0.0;
        config.ingestion.min_duration_ms = 10;
        config.ingestion.max_duration_ms = 10;
        config.ingestion.completed_retention_ms = 0;

        let service = crate::create_document_service_with(
            &config,
            Arc::new(InMemoryCatalogStore::new()),
            Arc::new(InstantClock::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())),
            Arc::new(TracingNotifier::new()),
        )
        .unwrap();

        let files = vec![
            FileRef::new("a.pdf", 10, "application/pdf"),
            FileRef::new("b.pdf", 10, "application/pdf"),
        ];
        let submission = service.submit_batch(files).await;

        while service.tasks().await.iter().any(|t| !t.is_terminal()) {
            tokio::task::yield_now().await;
        }

        // A receiver that missed the terminal events entirely.
        let (tx, mut rx) = broadcast::channel(2);
        for _ in 0..5 {
            tx.send(TaskEvent::new(
                TaskId::generate(),
                TaskEventKind::Progress { progress: 1 },
            ))
            .unwrap();
        }

        let mut pending: HashSet<TaskId> = submission.task_ids().into_iter().collect();
        let failed = tokio::time::timeout(
            Duration::from_secs(5),
            wait_for(&service, &mut rx, &mut pending),
        )
        .await
        .expect("wait_for did not settle after lag");

        assert!(failed.is_empty());
        assert!(pending.is_empty());
    }
}
