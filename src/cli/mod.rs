//! CLI module for the document catalog
//!
//! Provides subcommands that drive the catalog from the command line:
//! - `ingest`: validate and upload local files, then print the catalog
//! - `query`: filter and sort the sample catalog
//! - `batch`: apply a bulk action to the sample catalog

pub mod batch;
pub mod ingest;
pub mod query;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Document catalog - ingest, query and bulk-manage documents
#[derive(Parser)]
#[command(name = "doc-catalog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate and upload files into the catalog
    Ingest(ingest::IngestArgs),

    /// Query the sample catalog
    Query(query::QueryArgs),

    /// Apply a bulk action to documents in the sample catalog
    Batch(batch::BatchArgs),
}

/// Load `.env` and configuration, then install logging
fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);
    config
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
