//! Task progress events published to observers

use serde::{Deserialize, Serialize};

use super::task::TaskId;
use crate::domain::document::DocumentId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEventKind {
    /// Task created for a validated file
    Queued { file_name: String },
    /// Progress changed while uploading
    Progress { progress: u8 },
    /// Transfer finished and the document was admitted
    Completed { document_id: DocumentId },
    /// Transfer failed; the task can be retried
    Failed { error: String },
    /// Failed task re-armed with a fresh attempt
    Retried { attempt: u32 },
    /// Task dropped from the visible list
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEvent {
    pub task_id: TaskId,
    #[serde(flatten)]
    pub kind: TaskEventKind,
}

impl TaskEvent {
    pub fn new(task_id: TaskId, kind: TaskEventKind) -> Self {
        Self { task_id, kind }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            TaskEventKind::Completed { .. } | TaskEventKind::Failed { .. }
        )
    }
}
