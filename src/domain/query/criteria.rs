//! Filter criteria for catalog queries

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Wildcard literal accepted wherever a selector is parsed
pub const WILDCARD: &str = "all";

/// Either the wildcard or one concrete value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selector {
    #[default]
    All,
    Value(String),
}

impl Selector {
    pub fn value(value: impl Into<String>) -> Self {
        Self::from(value.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Exact match, vacuously true for the wildcard
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::All => true,
            Self::Value(v) => v == candidate,
        }
    }

    /// Case-insensitive match, vacuously true for the wildcard
    pub fn matches_ignore_case(&self, candidate: &str) -> bool {
        match self {
            Self::All => true,
            Self::Value(v) => v.to_lowercase() == candidate.to_lowercase(),
        }
    }
}

impl From<String> for Selector {
    fn from(value: String) -> Self {
        if value.is_empty() || value == WILDCARD {
            Self::All
        } else {
            Self::Value(value)
        }
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        match selector {
            Selector::All => WILDCARD.to_string(),
            Selector::Value(v) => v,
        }
    }
}

/// Field used to order query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    UploadDate,
    Name,
    Size,
    Status,
    Category,
}

impl std::str::FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploadDate" | "upload_date" | "date" => Ok(Self::UploadDate),
            "name" => Ok(Self::Name),
            "size" => Ok(Self::Size),
            "status" => Ok(Self::Status),
            "category" => Ok(Self::Category),
            other => Err(DomainError::validation(format!(
                "Unknown sort field '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UploadDate => write!(f, "uploadDate"),
            Self::Name => write!(f, "name"),
            Self::Size => write!(f, "size"),
            Self::Status => write!(f, "status"),
            Self::Category => write!(f, "category"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(DomainError::validation(format!(
                "Unknown sort order '{}'",
                other
            ))),
        }
    }
}

/// One catalog query: a conjunction of filters plus an ordering
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Case-insensitive substring over name, property, tenant and tags
    pub search_term: String,
    pub category: Selector,
    pub status: Selector,
    pub property: Selector,
    pub tenant: Selector,
    /// Inclusive lower bound on the upload date
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the upload date
    pub date_to: Option<NaiveDate>,
    /// Every listed tag must be present on a document
    pub tags: Vec<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<Selector>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<Selector>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_property(mut self, property: impl Into<Selector>) -> Self {
        self.property = property.into();
        self
    }

    pub fn with_tenant(mut self, tenant: impl Into<Selector>) -> Self {
        self.tenant = tenant.into();
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn sorted_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = field;
        self.sort_order = order;
        self
    }
}
