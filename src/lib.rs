//! Document catalog
//!
//! Ingests batches of files into an in-memory document catalog and answers
//! queries over it:
//! - Batch validation against size, type and count limits
//! - Concurrent simulated uploads with progress, failure and retry
//! - Filtered, sorted catalog views
//! - Bulk delete, archive, tag, download and share actions

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::{CatalogRepository, Clock, Notifier};
use infrastructure::{
    batch::BatchOperationCoordinator,
    catalog::{InMemoryCatalogStore, sample_documents},
    ingestion::{IngestionPipeline, PipelineSettings, RandomTransferSimulator, TokioClock},
    notification::TracingNotifier,
    services::DocumentService,
};
use tracing::info;

/// Create a document service over the sample catalog with wall-clock timing
pub fn create_document_service(
    config: &AppConfig,
) -> anyhow::Result<DocumentService<InMemoryCatalogStore>> {
    let catalog = Arc::new(InMemoryCatalogStore::with_documents(sample_documents()));

    create_document_service_with(
        config,
        catalog,
        Arc::new(TokioClock::new()),
        Arc::new(TracingNotifier::new()),
    )
}

/// Create a document service with custom configuration and collaborators
pub fn create_document_service_with<C: CatalogRepository + 'static>(
    config: &AppConfig,
    catalog: Arc<C>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
) -> anyhow::Result<DocumentService<C>> {
    config.validate()?;

    let ingestion = &config.ingestion;
    let simulator = RandomTransferSimulator::new(
        std::time::Duration::from_millis(ingestion.min_duration_ms),
        std::time::Duration::from_millis(ingestion.max_duration_ms),
        ingestion.failure_rate,
        ingestion.max_progress_step,
    );

    let settings = PipelineSettings::default()
        .with_tick_interval(ingestion.tick_interval())
        .with_completed_retention(ingestion.completed_retention())
        .with_failure_message(ingestion.failure_message.clone())
        .with_uploaded_by(config.uploader.name.clone());

    let pipeline = IngestionPipeline::new(
        Arc::clone(&catalog),
        clock,
        Arc::new(simulator),
        Arc::clone(&notifier),
        settings,
    );
    let coordinator = BatchOperationCoordinator::new(Arc::clone(&catalog), notifier);

    info!(
        max_files = config.validation.max_files,
        max_size_bytes = config.validation.max_size_bytes,
        "Document service initialized"
    );

    Ok(DocumentService::new(
        catalog,
        pipeline,
        coordinator,
        config.validation.clone(),
    ))
}
