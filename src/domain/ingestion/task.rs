//! Upload task entity and its state machine

use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::validation::FileRef;
use crate::domain::document::DocumentId;

/// Progress ceiling while a transfer is still in flight
pub const MAX_IN_FLIGHT_PROGRESS: u8 = 95;

/// Regex pattern for valid task IDs: task-{uuid}
static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^task-[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}$")
        .expect("task id pattern is valid")
});

/// Errors raised by task state transitions
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Invalid task ID: {message}")]
    InvalidId { message: String },

    #[error("Invalid transition from '{from}' to '{to}': {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },
}

impl TaskError {
    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId {
            message: message.into(),
        }
    }

    pub fn invalid_transition(
        from: impl Into<String>,
        to: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidTransition {
            from: from.into(),
            to: to.into(),
            reason: reason.into(),
        }
    }
}

/// Validated upload task identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Result<Self, TaskError> {
        let id = id.into();

        if !ID_PATTERN.is_match(&id) {
            return Err(TaskError::invalid_id(format!(
                "'{}' must be in format task-{{uuid}}",
                id
            )));
        }

        Ok(Self(id))
    }

    pub fn generate() -> Self {
        Self(format!("task-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskId {
    type Error = TaskError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of an upload task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Uploading,
    Completed,
    Error,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    pub fn can_transition_to(&self, target: TaskStatus) -> bool {
        matches!(
            (self, target),
            (Self::Uploading, Self::Completed)
                | (Self::Uploading, Self::Error)
                | (Self::Error, Self::Uploading)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uploading => write!(f, "uploading"),
            Self::Completed => write!(f, "completed"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One file's simulated transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadTask {
    id: TaskId,
    file: FileRef,
    progress: u8,
    status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// Incremented on every retry; a runner only drives its own attempt
    attempt: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_id: Option<DocumentId>,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    finished_at: Option<DateTime<Utc>>,
}

impl UploadTask {
    /// Create a task in the uploading state with zero progress
    pub fn new(file: FileRef) -> Self {
        Self {
            id: TaskId::generate(),
            file,
            progress: 0,
            status: TaskStatus::Uploading,
            error: None,
            attempt: 1,
            document_id: None,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn file(&self) -> &FileRef {
        &self.file
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Document admitted by the successful attempt, if any
    pub fn document_id(&self) -> Option<DocumentId> {
        self.document_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Advance progress by `step`, never past the in-flight ceiling
    pub fn advance(&mut self, step: u8) -> Result<u8, TaskError> {
        if self.status != TaskStatus::Uploading {
            return Err(TaskError::invalid_transition(
                self.status.to_string(),
                "uploading",
                "Progress can only change while uploading",
            ));
        }

        self.progress = self
            .progress
            .saturating_add(step)
            .min(MAX_IN_FLIGHT_PROGRESS);

        Ok(self.progress)
    }

    pub fn mark_completed(&mut self) -> Result<(), TaskError> {
        self.transition(TaskStatus::Completed, "Task is not uploading")?;
        self.progress = 100;
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) -> Result<(), TaskError> {
        self.transition(TaskStatus::Error, "Task is not uploading")?;
        self.error = Some(error.into());
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Re-arm a failed task: progress restarts at zero under a new attempt
    pub fn retry(&mut self) -> Result<u32, TaskError> {
        self.transition(TaskStatus::Uploading, "Only failed tasks can be retried")?;
        self.progress = 0;
        self.error = None;
        self.finished_at = None;
        self.attempt += 1;
        Ok(self.attempt)
    }

    pub fn attach_document(&mut self, document_id: DocumentId) {
        self.document_id = Some(document_id);
    }

    fn transition(&mut self, target: TaskStatus, reason: &str) -> Result<(), TaskError> {
        if !self.status.can_transition_to(target) {
            return Err(TaskError::invalid_transition(
                self.status.to_string(),
                target.to_string(),
                reason,
            ));
        }

        self.status = target;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> UploadTask {
        UploadTask::new(FileRef::new("lease.pdf", 1024, "application/pdf"))
    }

    #[test]
    fn test_task_id_generate_and_parse() {
        let id = TaskId::generate();
        assert!(id.as_str().starts_with("task-"));
        assert_eq!(TaskId::new(id.as_str()).unwrap(), id);
        assert!(TaskId::new("task-nope").is_err());
        assert!(TaskId::new("").is_err());
    }

    #[test]
    fn test_new_task_starts_uploading() {
        let task = task();
        assert_eq!(task.status(), TaskStatus::Uploading);
        assert_eq!(task.progress(), 0);
        assert_eq!(task.attempt(), 1);
        assert!(task.error().is_none());
    }

    #[test]
    fn test_progress_is_clamped_below_completion() {
        let mut task = task();

        assert_eq!(task.advance(40).unwrap(), 40);
        assert_eq!(task.advance(40).unwrap(), 80);
        assert_eq!(task.advance(40).unwrap(), MAX_IN_FLIGHT_PROGRESS);
        assert_eq!(task.advance(255).unwrap(), MAX_IN_FLIGHT_PROGRESS);
    }

    #[test]
    fn test_completion_sets_full_progress() {
        let mut task = task();
        task.advance(10).unwrap();
        task.mark_completed().unwrap();

        assert_eq!(task.status(), TaskStatus::Completed);
        assert_eq!(task.progress(), 100);
        assert!(task.finished_at().is_some());
        assert!(task.advance(1).is_err());
    }

    #[test]
    fn test_failure_records_error() {
        let mut task = task();
        task.mark_failed("Upload failed").unwrap();

        assert_eq!(task.status(), TaskStatus::Error);
        assert_eq!(task.error(), Some("Upload failed"));
    }

    #[test]
    fn test_retry_resets_progress() {
        let mut task = task();
        task.advance(60).unwrap();
        task.mark_failed("Upload failed").unwrap();

        assert_eq!(task.retry().unwrap(), 2);
        assert_eq!(task.status(), TaskStatus::Uploading);
        assert_eq!(task.progress(), 0);
        assert!(task.error().is_none());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut task = task();
        assert!(task.retry().is_err());

        task.mark_completed().unwrap();
        assert!(task.mark_failed("late").is_err());
        assert!(task.mark_completed().is_err());
        assert!(task.retry().is_err());
    }

    #[test]
    fn test_status_transitions() {
        assert!(TaskStatus::Uploading.can_transition_to(TaskStatus::Completed));
        assert!(TaskStatus::Uploading.can_transition_to(TaskStatus::Error));
        assert!(TaskStatus::Error.can_transition_to(TaskStatus::Uploading));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::Uploading));
        assert!(!TaskStatus::Uploading.can_transition_to(TaskStatus::Uploading));
    }
}
