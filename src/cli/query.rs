//! Query command - filters and sorts the sample catalog

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use super::{bootstrap, print_json};
use crate::domain::{CatalogSummary, Document, FilterCriteria, FilterOptions, SortField, SortOrder};
use crate::infrastructure::services::DocumentServiceTrait;

/// Arguments for the query command
#[derive(Args, Clone, Default)]
pub struct QueryArgs {
    /// Case-insensitive text matched against name, property, tenant and tags
    #[arg(long, short)]
    pub search: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub property: Option<String>,

    #[arg(long)]
    pub tenant: Option<String>,

    /// Earliest upload date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest upload date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Required tag; repeat for several
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// uploadDate, name, size, status or category
    #[arg(long, default_value_t = SortField::UploadDate)]
    pub sort_by: SortField,

    /// asc or desc
    #[arg(long, default_value = "desc")]
    pub order: SortOrder,

    /// Also print available filter values and catalog counts
    #[arg(long)]
    pub facets: bool,
}

#[derive(Serialize)]
struct QueryReport {
    criteria: FilterCriteria,
    documents: Vec<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<FilterOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<CatalogSummary>,
}

impl QueryArgs {
    pub fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new()
            .with_date_range(self.from, self.to)
            .sorted_by(self.sort_by, self.order);

        if let Some(search) = &self.search {
            criteria = criteria.with_search(search.as_str());
        }
        if let Some(category) = &self.category {
            criteria = criteria.with_category(category.as_str());
        }
        if let Some(status) = &self.status {
            criteria = criteria.with_status(status.as_str());
        }
        if let Some(property) = &self.property {
            criteria = criteria.with_property(property.as_str());
        }
        if let Some(tenant) = &self.tenant {
            criteria = criteria.with_tenant(tenant.as_str());
        }

        self.tags
            .iter()
            .fold(criteria, |criteria, tag| criteria.with_tag(tag.as_str()))
    }
}

/// Run the query command
pub async fn run(args: QueryArgs) -> anyhow::Result<()> {
    let config = bootstrap();

    let service = crate::create_document_service(&config)?;
    let criteria = args.criteria();
    let documents = service.query(&criteria).await?;

    let (options, summary) = if args.facets {
        (
            Some(service.filter_options().await?),
            Some(service.summary().await?),
        )
    } else {
        (None, None)
    };

    print_json(&QueryReport {
        criteria,
        documents,
        options,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Selector;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: QueryArgs,
    }

    #[test]
    fn test_flags_build_criteria() {
        let cli = TestCli::parse_from([
            "test",
            "--search",
            "johnson",
            "--category",
            "Legal",
            "--tag",
            "lease",
            "--tag",
            "signed",
            "--from",
            "2024-01-01",
            "--sort-by",
            "name",
            "--order",
            "ASC",
        ]);

        let criteria = cli.args.criteria();

        assert_eq!(criteria.search_term, "johnson");
        assert_eq!(criteria.category, Selector::value("Legal"));
        assert_eq!(criteria.status, Selector::All);
        assert_eq!(criteria.tags, vec!["lease", "signed"]);
        assert_eq!(criteria.date_from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(criteria.sort_by, SortField::Name);
        assert_eq!(criteria.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_defaults_match_everything() {
        let cli = TestCli::parse_from(["test"]);

        assert_eq!(cli.args.criteria(), FilterCriteria::default());
    }

    #[test]
    fn test_unknown_sort_field_is_rejected() {
        assert!(TestCli::try_parse_from(["test", "--sort-by", "colour"]).is_err());
    }
}
