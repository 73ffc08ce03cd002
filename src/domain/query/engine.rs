//! Stateless query evaluation over a catalog snapshot

use std::cmp::Ordering;

use super::criteria::{FilterCriteria, SortField, SortOrder};
use crate::domain::document::Document;

/// Filter and order a snapshot.
///
/// Filters are ANDed together; the sort is stable, so documents that compare
/// equal keep their snapshot order in both directions.
pub fn query(snapshot: &[Document], criteria: &FilterCriteria) -> Vec<Document> {
    let mut results: Vec<Document> = snapshot
        .iter()
        .filter(|doc| matches(doc, criteria))
        .cloned()
        .collect();

    results.sort_by(|a, b| {
        let ordering = compare(a, b, criteria.sort_by);
        match criteria.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    results
}

/// Check one document against every filter in the criteria
pub fn matches(doc: &Document, criteria: &FilterCriteria) -> bool {
    matches_search(doc, &criteria.search_term)
        && criteria.category.matches_ignore_case(&doc.category)
        && criteria.status.matches(doc.status.as_str())
        && criteria.property.matches(&doc.property)
        && criteria.tenant.matches(&doc.tenant)
        && criteria.date_from.is_none_or(|from| doc.upload_date >= from)
        && criteria.date_to.is_none_or(|to| doc.upload_date <= to)
        && criteria.tags.iter().all(|tag| doc.has_tag(tag))
}

fn matches_search(doc: &Document, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }

    let needle = term.to_lowercase();
    let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

    contains(&doc.name)
        || contains(&doc.property)
        || contains(&doc.tenant)
        || doc.tags.iter().any(|tag| contains(tag))
}

fn compare(a: &Document, b: &Document, field: SortField) -> Ordering {
    match field {
        SortField::UploadDate => a.upload_date.cmp(&b.upload_date),
        SortField::Name => locale_cmp(&a.name, &b.name),
        SortField::Status => locale_cmp(a.status.as_str(), b.status.as_str()),
        SortField::Category => locale_cmp(&a.category, &b.category),
        // Display strings, not byte counts: "456 KB" sorts after "2.4 MB".
        SortField::Size => a.size.cmp(&b.size),
    }
}

/// Case-insensitive collation; among case variants lower case sorts first
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
