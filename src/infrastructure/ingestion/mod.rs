//! Document ingestion infrastructure
//!
//! Clocks, transfer simulators and the pipeline that drives upload tasks.

mod clock;
mod pipeline;
mod simulator;

pub use clock::{InstantClock, TokioClock};
pub use pipeline::{BatchSubmission, IngestionPipeline, PipelineSettings, UPLOAD_TAGS};
pub use simulator::{RandomTransferSimulator, ScriptedTransferSimulator};
