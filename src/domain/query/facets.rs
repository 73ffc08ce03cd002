//! Distinct filter values and aggregate counts for a snapshot

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::document::Document;

/// Values available for each filter control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub statuses: Vec<String>,
    pub properties: Vec<String>,
    pub tenants: Vec<String>,
    pub tags: Vec<String>,
}

/// Document counts across the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
}

pub fn filter_options(snapshot: &[Document]) -> FilterOptions {
    let mut categories = BTreeSet::new();
    let mut statuses = BTreeSet::new();
    let mut properties = BTreeSet::new();
    let mut tenants = BTreeSet::new();
    let mut tags = BTreeSet::new();

    for doc in snapshot {
        categories.insert(doc.category.clone());
        statuses.insert(doc.status.to_string());
        properties.insert(doc.property.clone());
        tenants.insert(doc.tenant.clone());
        tags.extend(doc.tags.iter().cloned());
    }

    FilterOptions {
        categories: categories.into_iter().collect(),
        statuses: statuses.into_iter().collect(),
        properties: properties.into_iter().collect(),
        tenants: tenants.into_iter().collect(),
        tags: tags.into_iter().collect(),
    }
}

pub fn summarize(snapshot: &[Document]) -> CatalogSummary {
    let mut summary = CatalogSummary {
        total: snapshot.len(),
        ..CatalogSummary::default()
    };

    for doc in snapshot {
        *summary.by_status.entry(doc.status.to_string()).or_default() += 1;
        *summary.by_category.entry(doc.category.clone()).or_default() += 1;
    }

    summary
}
