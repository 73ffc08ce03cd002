//! Clock implementations

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};

use crate::domain::Clock;

/// Wall-clock time backed by the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl TokioClock {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock whose sleeps only yield to the scheduler, with a fixed date
#[derive(Debug, Clone, Copy)]
pub struct InstantClock {
    today: NaiveDate,
}

impl InstantClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Instant sleeps, but today's real date
    pub fn today_local() -> Self {
        Self::new(Local::now().date_naive())
    }
}

#[async_trait]
impl Clock for InstantClock {
    async fn sleep(&self, _duration: Duration) {
        tokio::task::yield_now().await;
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_instant_clock_does_not_wait() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let clock = InstantClock::new(date);

        let started = std::time::Instant::now();
        clock.sleep(Duration::from_secs(3600)).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(clock.today(), date);
    }

    #[tokio::test]
    async fn test_tokio_clock_sleeps() {
        let clock = TokioClock::new();
        let started = std::time::Instant::now();
        clock.sleep(Duration::from_millis(20)).await;

        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
