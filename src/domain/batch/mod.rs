//! Bulk actions over a selection of documents

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;
use crate::domain::document::{Document, DocumentId};

/// One bulk action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BatchAction {
    Delete,
    Archive,
    Download,
    Share,
    /// Tags must be supplied by the caller
    Tag { tags: Vec<String> },
}

impl BatchAction {
    pub fn tag<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Tag {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn kind(&self) -> BatchActionKind {
        match self {
            Self::Delete => BatchActionKind::Delete,
            Self::Archive => BatchActionKind::Archive,
            Self::Download => BatchActionKind::Download,
            Self::Share => BatchActionKind::Share,
            Self::Tag { .. } => BatchActionKind::Tag,
        }
    }

    /// Check the action's own parameters
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Self::Tag { tags } = self {
            if tags.is_empty() {
                return Err(DomainError::validation(
                    "Tag action requires at least one tag",
                ));
            }

            if tags.iter().any(|t| t.trim().is_empty()) {
                return Err(DomainError::validation("Tags cannot be empty"));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchActionKind {
    Delete,
    Archive,
    Download,
    Share,
    Tag,
}

impl fmt::Display for BatchActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete => write!(f, "delete"),
            Self::Archive => write!(f, "archive"),
            Self::Download => write!(f, "download"),
            Self::Share => write!(f, "share"),
            Self::Tag => write!(f, "tag"),
        }
    }
}

/// Result of applying one bulk action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub action: BatchActionKind,
    /// Documents the action applied to
    pub affected: Vec<DocumentId>,
    /// Requested IDs that were not in the catalog
    pub skipped: Vec<DocumentId>,
    /// Text summary produced when no native share capability exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipboard: Option<String>,
}

impl BatchOutcome {
    pub fn empty(action: BatchActionKind) -> Self {
        Self {
            action,
            affected: Vec::new(),
            skipped: Vec::new(),
            clipboard: None,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.affected.is_empty()
    }
}

/// Native share capability of the host environment
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ShareTarget: Send + Sync {
    async fn share(&self, documents: Vec<Document>) -> Result<(), DomainError>;
}

/// Plain-text summary used as the clipboard fallback for sharing
pub fn share_summary(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| {
            format!(
                "{} ({}) - {} - {} - {}",
                doc.name, doc.category, doc.property, doc.size, doc.upload_date
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::NewDocument;
    use chrono::NaiveDate;

    #[test]
    fn test_tag_action_requires_tags() {
        assert!(BatchAction::Tag { tags: vec![] }.validate().is_err());
        assert!(BatchAction::tag([" "]).validate().is_err());
        assert!(BatchAction::tag(["urgent"]).validate().is_ok());
        assert!(BatchAction::Delete.validate().is_ok());
    }

    #[test]
    fn test_action_deserialization() {
        let action: BatchAction =
            serde_json::from_str(r#"{"action":"tag","tags":["urgent","q1"]}"#).unwrap();
        assert_eq!(action, BatchAction::tag(["urgent", "q1"]));
        assert_eq!(action.kind(), BatchActionKind::Tag);
    }

    #[test]
    fn test_share_summary() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let docs = vec![
            NewDocument::new("lease.pdf", "Legal", "PDF", "1.0 MB", date)
                .with_property("Oak Plaza")
                .into_document(DocumentId::new(1)),
            NewDocument::new("flyer.png", "Marketing", "PNG", "300 KB", date)
                .into_document(DocumentId::new(2)),
        ];

        let summary = share_summary(&docs);
        let lines: Vec<_> = summary.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "lease.pdf (Legal) - Oak Plaza - 1.0 MB - 2024-02-10");
        assert!(lines[1].starts_with("flyer.png (Marketing)"));
    }
}
