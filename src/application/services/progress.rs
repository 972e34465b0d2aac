//! Progress estimator - advisory feedback while a provider call is pending
//!
//! The value climbs by a fixed increment on a fixed interval and stops at a
//! ceiling below 100. It reaches 100 only when the tracked operation
//! resolves, successfully or not. It is cosmetic: nothing waits on it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::domain::value_objects::AppSettings;

pub const COMPLETE: u8 = 100;

#[derive(Clone)]
pub struct ProgressEstimator {
    value: Arc<watch::Sender<u8>>,
    tick: Duration,
    increment: u8,
    ceiling: u8,
}

impl ProgressEstimator {
    pub fn new(tick: Duration, increment: u8, ceiling: u8) -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            value: Arc::new(sender),
            tick,
            increment,
            ceiling: ceiling.min(COMPLETE - 1),
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(
            settings.progress_tick(),
            settings.progress_increment,
            settings.progress_ceiling,
        )
    }

    pub fn value(&self) -> u8 {
        *self.value.borrow()
    }

    /// A new estimator at zero with the same pacing
    pub fn fresh(&self) -> Self {
        Self::new(self.tick, self.increment, self.ceiling)
    }

    /// Run `operation` to completion while ticking the progress value
    pub async fn track<F: Future>(&self, operation: F) -> F::Output {
        self.value.send_replace(0);

        let mut ticker = interval_at(Instant::now() + self.tick, self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(operation);

        let output = loop {
            tokio::select! {
                output = &mut operation => break output,
                _ = ticker.tick() => self.advance(),
            }
        };

        self.value.send_replace(COMPLETE);
        output
    }

    fn advance(&self) {
        let (increment, ceiling) = (self.increment, self.ceiling);
        self.value.send_modify(|value| {
            if *value < ceiling {
                *value = value.saturating_add(increment).min(ceiling);
            }
        });
    }
}

impl std::fmt::Debug for ProgressEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressEstimator")
            .field("value", &self.value())
            .field("tick", &self.tick)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> ProgressEstimator {
        ProgressEstimator::new(Duration::from_millis(200), 5, 95)
    }

    #[tokio::test(start_paused = true)]
    async fn test_advances_while_pending() {
        let estimator = estimator();
        let observer = estimator.clone();

        let task = tokio::spawn(async move {
            estimator
                .track(tokio::time::sleep(Duration::from_secs(5)))
                .await
        });

        tokio::time::sleep(Duration::from_millis(1_050)).await;
        let midway = observer.value();
        assert!((20..=30).contains(&midway), "progress was {}", midway);

        task.await.unwrap();
        assert_eq!(observer.value(), COMPLETE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_reaches_complete_while_pending() {
        let estimator = estimator();
        let observer = estimator.clone();

        let task = tokio::spawn(async move {
            estimator
                .track(tokio::time::sleep(Duration::from_secs(120)))
                .await
        });

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(observer.value(), 95);

        task.await.unwrap();
        assert_eq!(observer.value(), COMPLETE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_operation_still_completes_progress() {
        let estimator = estimator();
        let result: Result<(), &str> = estimator
            .track(async {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Err("provider down")
            })
            .await;

        assert!(result.is_err());
        assert_eq!(estimator.value(), COMPLETE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_estimators_are_independent() {
        let first = estimator();
        let second = first.fresh();

        first.track(tokio::time::sleep(Duration::from_millis(500))).await;

        assert_eq!(first.value(), COMPLETE);
        assert_eq!(second.value(), 0);
    }

    #[test]
    fn test_ceiling_is_kept_below_complete() {
        let estimator = ProgressEstimator::new(Duration::from_millis(1), 50, 200);
        estimator.advance();
        estimator.advance();
        estimator.advance();
        assert_eq!(estimator.value(), 99);
    }
}
