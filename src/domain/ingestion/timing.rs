//! Time and transfer-outcome seams for the ingestion pipeline
//!
//! The pipeline never reads the wall clock or a random source directly, so
//! tests can drive task outcomes deterministically.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

#[cfg(test)]
use mockall::automock;

/// Source of suspension points and calendar dates
#[async_trait]
pub trait Clock: Send + Sync {
    /// Suspend the calling task for `duration`
    async fn sleep(&self, duration: Duration);

    /// Current calendar date, used as the upload date of admitted documents
    fn today(&self) -> NaiveDate;
}

/// Outcome of one transfer attempt, decided when the attempt starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPlan {
    pub duration: Duration,
    pub will_fail: bool,
}

impl TransferPlan {
    pub fn success(duration: Duration) -> Self {
        Self {
            duration,
            will_fail: false,
        }
    }

    pub fn failure(duration: Duration) -> Self {
        Self {
            duration,
            will_fail: true,
        }
    }
}

/// Decides how long a transfer takes, whether it fails and how fast progress moves
#[cfg_attr(test, automock)]
pub trait TransferSimulator: Send + Sync {
    /// Roll a fresh plan for one attempt
    fn plan(&self) -> TransferPlan;

    /// Progress increment for one tick
    fn progress_step(&self) -> u8;
}
