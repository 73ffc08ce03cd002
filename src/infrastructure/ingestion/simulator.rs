//! Transfer simulators

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use rand::Rng;

use crate::domain::{TransferPlan, TransferSimulator};

/// Rolls duration, failure and progress steps from a random source
#[derive(Debug, Clone)]
pub struct RandomTransferSimulator {
    min_duration: Duration,
    max_duration: Duration,
    failure_rate: f64,
    max_step: u8,
}

impl RandomTransferSimulator {
    pub fn new(
        min_duration: Duration,
        max_duration: Duration,
        failure_rate: f64,
        max_step: u8,
    ) -> Self {
        let (min_duration, max_duration) = if min_duration <= max_duration {
            (min_duration, max_duration)
        } else {
            (max_duration, min_duration)
        };

        Self {
            min_duration,
            max_duration,
            failure_rate: failure_rate.clamp(0.0, 1.0),
            max_step: max_step.max(1),
        }
    }
}

impl Default for RandomTransferSimulator {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(4), 0.05, 15)
    }
}

impl TransferSimulator for RandomTransferSimulator {
    fn plan(&self) -> TransferPlan {
        let mut rng = rand::thread_rng();

        let min = self.min_duration.as_millis() as u64;
        let max = self.max_duration.as_millis() as u64;
        let duration = Duration::from_millis(rng.gen_range(min..=max));

        TransferPlan {
            duration,
            will_fail: rng.gen_bool(self.failure_rate),
        }
    }

    fn progress_step(&self) -> u8 {
        rand::thread_rng().gen_range(1..=self.max_step)
    }
}

/// Replays a fixed sequence of plans, then falls back to a default plan
#[derive(Debug)]
pub struct ScriptedTransferSimulator {
    plans: Mutex<VecDeque<TransferPlan>>,
    fallback: TransferPlan,
    step: u8,
}

impl ScriptedTransferSimulator {
    pub fn new(plans: impl IntoIterator<Item = TransferPlan>) -> Self {
        Self {
            plans: Mutex::new(plans.into_iter().collect()),
            fallback: TransferPlan::success(Duration::from_millis(50)),
            step: 10,
        }
    }

    /// Every attempt succeeds
    pub fn always_succeed() -> Self {
        Self::new([])
    }

    pub fn with_fallback(mut self, fallback: TransferPlan) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_step(mut self, step: u8) -> Self {
        self.step = step;
        self
    }
}

impl TransferSimulator for ScriptedTransferSimulator {
    fn plan(&self) -> TransferPlan {
        self.plans
            .lock()
            .ok()
            .and_then(|mut plans| plans.pop_front())
            .unwrap_or(self.fallback)
    }

    fn progress_step(&self) -> u8 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_plan_within_bounds() {
        let simulator = RandomTransferSimulator::new(
            Duration::from_millis(1000),
            Duration::from_millis(4000),
            0.05,
            15,
        );

        for _ in 0..200 {
            let plan = simulator.plan();
            assert!(plan.duration >= Duration::from_millis(1000));
            assert!(plan.duration <= Duration::from_millis(4000));

            let step = simulator.progress_step();
            assert!((1..=15).contains(&step));
        }
    }

    #[test]
    fn test_failure_rate_extremes() {
        let never = RandomTransferSimulator::new(Duration::ZERO, Duration::ZERO, 0.0, 5);
        let always = RandomTransferSimulator::new(Duration::ZERO, Duration::ZERO, 1.0, 5);

        for _ in 0..50 {
            assert!(!never.plan().will_fail);
            assert!(always.plan().will_fail);
        }
    }

    #[test]
    fn test_out_of_range_settings_are_normalised() {
        let simulator = RandomTransferSimulator::new(
            Duration::from_millis(500),
            Duration::from_millis(100),
            7.0,
            0,
        );

        let plan = simulator.plan();
        assert!(plan.duration >= Duration::from_millis(100));
        assert!(plan.duration <= Duration::from_millis(500));
        assert!(plan.will_fail);
        assert_eq!(simulator.progress_step(), 1);
    }

    #[test]
    fn test_scripted_plans_then_fallback() {
        let simulator = ScriptedTransferSimulator::new([
            TransferPlan::failure(Duration::from_millis(10)),
            TransferPlan::success(Duration::from_millis(20)),
        ]);

        assert!(simulator.plan().will_fail);
        assert!(!simulator.plan().will_fail);
        assert_eq!(simulator.plan(), TransferPlan::success(Duration::from_millis(50)));
    }
}
