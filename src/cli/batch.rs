//! Batch command - applies a bulk action to the sample catalog

use clap::{Args, ValueEnum};
use serde::Serialize;

use super::{bootstrap, print_json};
use crate::domain::{BatchAction, BatchOutcome, Document, DocumentId, FilterCriteria};
use crate::infrastructure::services::DocumentServiceTrait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    Delete,
    Archive,
    Download,
    Share,
    Tag,
}

/// Arguments for the batch command
#[derive(Args, Clone)]
pub struct BatchArgs {
    /// Action to apply
    #[arg(value_enum)]
    pub action: ActionArg,

    /// Document IDs, comma separated or repeated
    #[arg(long, value_delimiter = ',')]
    pub ids: Vec<u64>,

    /// Tags for the `tag` action, comma separated or repeated
    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,
}

#[derive(Serialize)]
struct BatchReport {
    outcome: BatchOutcome,
    catalog: Vec<Document>,
}

impl BatchArgs {
    pub fn action(&self) -> BatchAction {
        match self.action {
            ActionArg::Delete => BatchAction::Delete,
            ActionArg::Archive => BatchAction::Archive,
            ActionArg::Download => BatchAction::Download,
            ActionArg::Share => BatchAction::Share,
            ActionArg::Tag => BatchAction::tag(self.tags.iter().cloned()),
        }
    }

    pub fn ids(&self) -> Vec<DocumentId> {
        self.ids.iter().copied().map(DocumentId::new).collect()
    }
}

/// Run the batch command
pub async fn run(args: BatchArgs) -> anyhow::Result<()> {
    let config = bootstrap();

    let service = crate::create_document_service(&config)?;
    let outcome = service.apply(&args.action(), &args.ids()).await?;

    if let Some(clipboard) = &outcome.clipboard {
        eprintln!("{}", clipboard);
    }

    print_json(&BatchReport {
        outcome,
        catalog: service.query(&FilterCriteria::default()).await?,
    })
}
