//! Timer driver for the loading indicator.

use tokio::sync::broadcast;
use tokio::time::{self, Instant};

use crate::indicator::LoadingIndicator;

/// Background task that ends fades on time.
pub struct IndicatorDriver {
    indicator: LoadingIndicator,
}

impl IndicatorDriver {
    pub fn new(indicator: LoadingIndicator) -> Self {
        Self { indicator }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::debug!("Indicator driver starting");

        loop {
            let deadline = self.indicator.deadline();
            tokio::select! {
                _ = sleep_until(deadline) => {
                    self.indicator.tick();
                }
                _ = self.indicator.changed() => {}
                _ = shutdown.recv() => {
                    tracing::debug!("Indicator driver received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::{IndicatorState, Timings};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_driver_returns_to_idle() {
        let indicator = LoadingIndicator::new(Timings {
            min_visible: Duration::from_millis(100),
            fade: Duration::from_millis(200),
        });
        let (stop_tx, stop_rx) = broadcast::channel(1);
        let task = tokio::spawn(IndicatorDriver::new(indicator.clone()).run(stop_rx));

        indicator.start();
        indicator.settle();
        assert_eq!(indicator.state(), IndicatorState::Settling);

        time::sleep(Duration::from_millis(299)).await;
        assert_eq!(indicator.state(), IndicatorState::Settling);

        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(indicator.state(), IndicatorState::Idle);

        stop_tx.send(()).unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_cancels_pending_fade() {
        let indicator = LoadingIndicator::new(Timings {
            min_visible: Duration::from_millis(0),
            fade: Duration::from_millis(50),
        });
        let (stop_tx, stop_rx) = broadcast::channel(1);
        let task = tokio::spawn(IndicatorDriver::new(indicator.clone()).run(stop_rx));

        indicator.start();
        indicator.settle();
        time::sleep(Duration::from_millis(20)).await;
        indicator.start();

        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(indicator.state(), IndicatorState::Pending);

        indicator.settle();
        time::sleep(Duration::from_millis(51)).await;
        assert_eq!(indicator.state(), IndicatorState::Idle);

        stop_tx.send(()).unwrap();
        task.await.unwrap();
    }
}
