//! Document ingestion domain types and traits
//!
//! This module provides:
//! - Batch validation of candidate files
//! - The `UploadTask` state machine and its events
//! - `Clock` and `TransferSimulator` seams used by the pipeline

pub mod event;
pub mod task;
pub mod timing;
pub mod validation;

pub use event::{TaskEvent, TaskEventKind};
pub use task::{MAX_IN_FLIGHT_PROGRESS, TaskError, TaskId, TaskStatus, UploadTask};
pub use timing::{Clock, TransferPlan, TransferSimulator};
pub use validation::{
    DEFAULT_ALLOWED_MIME_TYPES, DEFAULT_MAX_FILES, DEFAULT_MAX_SIZE_BYTES, FileRef,
    ValidationConfig, ValidationResult, validate,
};

#[cfg(test)]
pub use timing::MockTransferSimulator;
