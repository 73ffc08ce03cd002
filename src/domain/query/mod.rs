//! Catalog query domain: criteria, evaluation and facets

mod criteria;
mod engine;
mod facets;

pub use criteria::{FilterCriteria, Selector, SortField, SortOrder, WILDCARD};
pub use engine::{matches, query};
pub use facets::{CatalogSummary, FilterOptions, filter_options, summarize};
