//! Document domain entities

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Property assigned to documents that are not tied to a specific property
pub const DEFAULT_PROPERTY: &str = "All Properties";

/// Tenant sentinel for documents without a tenant
pub const NO_TENANT: &str = "N/A";

/// Catalog-assigned document identifier, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(u64);

impl DocumentId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DocumentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("Invalid document ID '{}'", s)))
    }
}

/// Document status
///
/// The set of statuses is open: callers may introduce their own values, the
/// only rule is that a status is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentStatus(String);

impl DocumentStatus {
    pub const UPLOADED: &'static str = "uploaded";
    pub const PROCESSED: &'static str = "processed";
    pub const ACTIVE: &'static str = "active";
    pub const SIGNED: &'static str = "signed";
    pub const APPROVED: &'static str = "approved";
    pub const PENDING: &'static str = "pending";
    pub const ARCHIVED: &'static str = "archived";
    pub const CURRENT: &'static str = "current";

    /// Create a status, rejecting empty values
    pub fn new(status: impl Into<String>) -> Result<Self, DomainError> {
        let status = status.into();

        if status.trim().is_empty() {
            return Err(DomainError::validation("Document status cannot be empty"));
        }

        Ok(Self(status))
    }

    pub fn uploaded() -> Self {
        Self(Self::UPLOADED.to_string())
    }

    pub fn archived() -> Self {
        Self(Self::ARCHIVED.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_archived(&self) -> bool {
        self.0 == Self::ARCHIVED
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for DocumentStatus {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocumentStatus> for String {
    fn from(status: DocumentStatus) -> Self {
        status.0
    }
}

/// Kind-specific fields; a document carries at most one variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentDetails {
    /// Leases, insurance policies and other expiring documents
    Lease {
        #[serde(rename = "expiryDate")]
        expiry_date: NaiveDate,
    },
    /// Invoices and receipts
    Invoice { amount: f64 },
    /// Inspection reports
    Inspection {
        score: u8,
        #[serde(rename = "photoCount")]
        photo_count: u32,
    },
    /// Move-in/move-out inventories
    Inventory {
        #[serde(rename = "itemCount")]
        item_count: u32,
    },
    /// Files admitted through the ingestion pipeline
    Upload {
        #[serde(rename = "uploadedBy")]
        uploaded_by: String,
    },
}

/// A document in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub category: String,
    pub property: String,
    pub tenant: String,
    pub file_type: String,
    /// Display size computed once at creation
    pub size: String,
    pub upload_date: NaiveDate,
    pub status: DocumentStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub details: Option<DocumentDetails>,
}

impl Document {
    /// Check whether the document carries a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Uploader identity for pipeline-admitted documents
    pub fn uploaded_by(&self) -> Option<&str> {
        match &self.details {
            Some(DocumentDetails::Upload { uploaded_by }) => Some(uploaded_by.as_str()),
            _ => None,
        }
    }
}

/// A document that has not been admitted to the catalog yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub name: String,
    pub category: String,
    pub property: String,
    pub tenant: String,
    pub file_type: String,
    pub size: String,
    pub upload_date: NaiveDate,
    pub status: DocumentStatus,
    pub tags: Vec<String>,
    pub details: Option<DocumentDetails>,
}

impl NewDocument {
    /// Create a new document with default property, tenant and status
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        file_type: impl Into<String>,
        size: impl Into<String>,
        upload_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            property: DEFAULT_PROPERTY.to_string(),
            tenant: NO_TENANT.to_string(),
            file_type: file_type.into(),
            size: size.into(),
            upload_date,
            status: DocumentStatus::uploaded(),
            tags: Vec::new(),
            details: None,
        }
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = property.into();
        self
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = tenant.into();
        self
    }

    pub fn with_status(mut self, status: DocumentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_details(mut self, details: DocumentDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Validate fields that the catalog relies on
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Document name cannot be empty"));
        }

        Ok(())
    }

    /// Attach the catalog-assigned identifier
    pub fn into_document(self, id: DocumentId) -> Document {
        Document {
            id,
            name: self.name,
            category: self.category,
            property: self.property,
            tenant: self.tenant,
            file_type: self.file_type,
            size: self.size,
            upload_date: self.upload_date,
            status: self.status,
            tags: self.tags,
            details: self.details,
        }
    }
}

/// Partial update applied to a single document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    /// Replacement name
    pub name: Option<String>,
    /// Replacement status
    pub status: Option<DocumentStatus>,
    /// Tags to add; tags already present are skipped
    pub add_tags: Vec<String>,
}

impl DocumentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn archive() -> Self {
        Self {
            status: Some(DocumentStatus::archived()),
            ..Self::default()
        }
    }

    pub fn tag<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            add_tags: tags.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: DocumentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.status.is_none() && self.add_tags.is_empty()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("Document name cannot be empty"));
            }
        }

        if self.add_tags.iter().any(|t| t.trim().is_empty()) {
            return Err(DomainError::validation("Tags cannot be empty"));
        }

        Ok(())
    }

    /// Apply the patch in place, returning whether the document changed
    pub fn apply(&self, document: &mut Document) -> bool {
        let mut changed = false;

        if let Some(name) = &self.name {
            if document.name != *name {
                document.name = name.clone();
                changed = true;
            }
        }

        if let Some(status) = &self.status {
            if document.status != *status {
                document.status = status.clone();
                changed = true;
            }
        }

        for tag in &self.add_tags {
            if !document.has_tag(tag) {
                document.tags.push(tag.clone());
                changed = true;
            }
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        NewDocument::new(
            "lease.pdf",
            "Legal",
            "PDF",
            "1.0 MB",
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        )
        .with_tags(["lease"])
        .into_document(DocumentId::new(1))
    }

    #[test]
    fn test_new_document_defaults() {
        let doc = sample();
        assert_eq!(doc.property, DEFAULT_PROPERTY);
        assert_eq!(doc.tenant, NO_TENANT);
        assert_eq!(doc.status.as_str(), "uploaded");
        assert!(doc.details.is_none());
    }

    #[test]
    fn test_status_rejects_empty() {
        assert!(DocumentStatus::new("").is_err());
        assert!(DocumentStatus::new("   ").is_err());
        assert_eq!(DocumentStatus::new("signed").unwrap().as_str(), "signed");
    }

    #[test]
    fn test_status_deserialize_rejects_empty() {
        let result: Result<DocumentStatus, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_document_id_parse() {
        assert_eq!("42".parse::<DocumentId>().unwrap(), DocumentId::new(42));
        assert!("abc".parse::<DocumentId>().is_err());
    }

    #[test]
    fn test_patch_rename_changes_name_only() {
        let mut doc = sample();
        let before = doc.clone();

        assert!(DocumentPatch::rename("renamed.pdf").apply(&mut doc));
        assert_eq!(doc.name, "renamed.pdf");
        assert_eq!(doc.tags, before.tags);
        assert_eq!(doc.status, before.status);
    }

    #[test]
    fn test_patch_tag_skips_existing() {
        let mut doc = sample();

        assert!(DocumentPatch::tag(["lease", "signed"]).apply(&mut doc));
        assert_eq!(doc.tags, vec!["lease", "signed"]);
        assert!(!DocumentPatch::tag(["signed"]).apply(&mut doc));
    }

    #[test]
    fn test_patch_archive_is_idempotent() {
        let mut doc = sample();

        assert!(DocumentPatch::archive().apply(&mut doc));
        assert!(doc.status.is_archived());
        assert!(!DocumentPatch::archive().apply(&mut doc));
    }

    #[test]
    fn test_patch_validation() {
        assert!(DocumentPatch::rename("  ").validate().is_err());
        assert!(DocumentPatch::tag([""]).validate().is_err());
        assert!(DocumentPatch::rename("ok.pdf").validate().is_ok());
        assert!(DocumentPatch::new().is_empty());
    }

    #[test]
    fn test_document_serialization_uses_camel_case() {
        let doc = sample();
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["fileType"], "PDF");
        assert_eq!(json["uploadDate"], "2024-01-15");
        assert!(json.get("details").is_none());
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_details_sit_beside_common_fields() {
        let mut doc = sample();
        doc.details = Some(DocumentDetails::Lease {
            expiry_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        });

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["kind"], "lease");
        assert_eq!(json["expiryDate"], "2025-01-31");
        assert_eq!(json["fileType"], "PDF");
        assert!(json.get("details").is_none());

        let parsed: Document = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_uploaded_by() {
        let mut doc = sample();
        assert!(doc.uploaded_by().is_none());

        doc.details = Some(DocumentDetails::Upload {
            uploaded_by: "Jane".to_string(),
        });
        assert_eq!(doc.uploaded_by(), Some("Jane"));
    }
}
