//! Domain layer - pure types, traits and functions

pub mod batch;
pub mod document;
pub mod error;
pub mod ingestion;
pub mod notification;
pub mod query;

pub use batch::{BatchAction, BatchActionKind, BatchOutcome, ShareTarget, share_summary};
pub use document::{
    CatalogRepository, Document, DocumentDetails, DocumentId, DocumentPatch, DocumentStatus,
    NewDocument,
};
pub use error::DomainError;
pub use ingestion::{
    Clock, FileRef, TaskError, TaskEvent, TaskEventKind, TaskId, TaskStatus, TransferPlan,
    TransferSimulator, UploadTask, ValidationConfig, ValidationResult,
};
pub use notification::{Notification, NotificationLevel, Notifier};
pub use query::{CatalogSummary, FilterCriteria, FilterOptions, Selector, SortField, SortOrder};
