use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use crate::features::views::services::ViewStore;

/// Shortest pause between sweeps
const MIN_SWEEP_INTERVAL_SECS: u64 = 30;

/// Background worker dropping idle view sessions
pub struct SessionSweeper {
    store: Arc<ViewStore>,
}

impl SessionSweeper {
    pub fn new(store: Arc<ViewStore>) -> Self {
        Self { store }
    }

    fn sweep_interval(&self) -> Duration {
        (self.store.idle_ttl() / 4).max(Duration::from_secs(MIN_SWEEP_INTERVAL_SECS))
    }

    /// Run the sweeper in a background loop
    pub async fn run(&self) {
        let period = self.sweep_interval();
        tracing::info!("Starting view session sweeper (every {:?})", period);

        let mut interval = interval(period);

        loop {
            interval.tick().await;

            let removed = self.store.sweep_expired().await;
            if removed > 0 {
                tracing::debug!("Swept {} idle view sessions", removed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_interval_has_floor() {
        let short = SessionSweeper::new(Arc::new(ViewStore::new(Duration::from_secs(10), 10)));
        assert_eq!(short.sweep_interval(), Duration::from_secs(30));

        let long = SessionSweeper::new(Arc::new(ViewStore::new(Duration::from_secs(1800), 10)));
        assert_eq!(long.sweep_interval(), Duration::from_secs(450));
    }
}
