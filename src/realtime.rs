use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

/// Simulated "active visitors" gauge: a random walk clamped at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealtimeCounter {
    active_visitors: u64,
    max_delta: u64,
}

impl RealtimeCounter {
    pub fn new(initial: u64, max_delta: u64) -> Self {
        Self {
            active_visitors: initial,
            max_delta,
        }
    }

    pub fn value(&self) -> u64 {
        self.active_visitors
    }

    /// Moves the counter by a uniform delta in `[-max_delta, max_delta]`.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> u64 {
        let bound = i64::try_from(self.max_delta).unwrap_or(i64::MAX);
        let delta = rng.gen_range(-bound..=bound);
        let current = i64::try_from(self.active_visitors).unwrap_or(i64::MAX);
        self.active_visitors = current.saturating_add(delta).max(0) as u64;
        self.active_visitors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeSnapshot {
    pub active_visitors: u64,
    pub last_refreshed: DateTime<Utc>,
}

struct FeedState {
    counter: RealtimeCounter,
    last_refreshed: DateTime<Utc>,
}

impl FeedState {
    fn snapshot(&self) -> RealtimeSnapshot {
        RealtimeSnapshot {
            active_visitors: self.counter.value(),
            last_refreshed: self.last_refreshed,
        }
    }
}

/// Owns the counter and fans each new value out to WebSocket subscribers.
pub struct RealtimeFeed {
    state: Mutex<FeedState>,
    notifier: broadcast::Sender<RealtimeSnapshot>,
}

impl RealtimeFeed {
    pub fn new(counter: RealtimeCounter) -> Self {
        let (notifier, _) = broadcast::channel(16);
        Self {
            state: Mutex::new(FeedState {
                counter,
                last_refreshed: Utc::now(),
            }),
            notifier,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeSnapshot> {
        self.notifier.subscribe()
    }

    pub async fn snapshot(&self) -> RealtimeSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn refresh_with<R: Rng>(&self, rng: &mut R) -> RealtimeSnapshot {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.counter.step(rng);
            state.last_refreshed = Utc::now();
            state.snapshot()
        };

        debug!("Active visitors now {}", snapshot.active_visitors);
        // No subscribers is fine.
        let _ = self.notifier.send(snapshot.clone());
        snapshot
    }

    pub async fn refresh(&self) -> RealtimeSnapshot {
        let mut rng = StdRng::from_entropy();
        self.refresh_with(&mut rng).await
    }

    /// Ticks the counter every `period` until the task is dropped.
    pub async fn run<R: Rng + Send>(self: Arc<Self>, period: Duration, mut rng: R) {
        info!("Starting real-time visitor simulation every {:?}", period);

        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            self.refresh_with(&mut rng).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut counter = RealtimeCounter::new(42, 5);
        for _ in 0..1000 {
            let before = counter.value() as i64;
            let after = counter.step(&mut rng) as i64;
            assert!((after - before).abs() <= 5);
        }
    }

    #[test]
    fn test_step_clamps_at_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut counter = RealtimeCounter::new(0, 5);
        let mut hit_zero = false;
        for _ in 0..1000 {
            let before = counter.value();
            let after = counter.step(&mut rng);
            assert!(after <= before + 5);
            hit_zero |= after == 0;
        }
        assert!(hit_zero);
    }

    #[test]
    fn test_seeded_walk_is_deterministic() {
        let walk = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut counter = RealtimeCounter::new(42, 5);
            (0..20).map(|_| counter.step(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(walk(99), walk(99));
    }

    #[test]
    fn test_zero_delta_never_moves() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut counter = RealtimeCounter::new(42, 0);
        for _ in 0..10 {
            assert_eq!(counter.step(&mut rng), 42);
        }
    }

    #[tokio::test]
    async fn test_refresh_broadcasts_snapshot() {
        let feed = RealtimeFeed::new(RealtimeCounter::new(42, 5));
        let mut rx = feed.subscribe();
        let mut rng = StdRng::seed_from_u64(11);

        let snapshot = feed.refresh_with(&mut rng).await;
        let received = rx.recv().await.unwrap();

        assert_eq!(received, snapshot);
        assert_eq!(feed.snapshot().await, snapshot);
        assert!(snapshot.active_visitors >= 37 && snapshot.active_visitors <= 47);
    }
}
