use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::sleep;

const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Weighted two-window counter: the previous window's hits fade out
/// linearly while the current window fills.
#[derive(Debug)]
struct SlidingWindow {
    window_size: Duration,
    limit: u64,
    current_window_start: Instant,
    current_count: u64,
    prev_count: u64,
    last_seen: Instant,
}

impl SlidingWindow {
    fn new(window_size: Duration, limit: u64, now: Instant) -> Self {
        Self {
            window_size,
            limit,
            current_window_start: now,
            current_count: 0,
            prev_count: 0,
            last_seen: now,
        }
    }

    fn roll(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.current_window_start);
        if elapsed >= self.window_size * 2 {
            self.prev_count = 0;
            self.current_count = 0;
            self.current_window_start = now;
        } else if elapsed >= self.window_size {
            self.prev_count = self.current_count;
            self.current_count = 0;
            self.current_window_start += self.window_size;
        }
    }

    fn hit(&mut self, now: Instant) -> RateDecision {
        self.last_seen = now;
        self.roll(now);

        let elapsed = now.duration_since(self.current_window_start);
        let weight = 1.0 - elapsed.as_secs_f64() / self.window_size.as_secs_f64();
        let effective = self.prev_count as f64 * weight.max(0.0) + self.current_count as f64;

        if effective + 1.0 <= self.limit as f64 + 1e-9 {
            self.current_count += 1;
            RateDecision {
                allowed: true,
                remaining: (self.limit as f64 - effective - 1.0).max(0.0).floor() as u64,
                retry_after: None,
            }
        } else {
            let retry_after = (self.window_size - elapsed).as_secs().max(1);
            RateDecision {
                allowed: false,
                remaining: 0,
                retry_after: Some(retry_after),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub remaining: u64,
    /// Seconds until another attempt may succeed.
    pub retry_after: Option<u64>,
}

/// Per-key in-memory limiter shared across workers.
#[derive(Clone)]
pub struct RateLimiterStore {
    map: Arc<DashMap<String, Arc<Mutex<SlidingWindow>>>>,
    window_size: Duration,
    limit: u64,
}

impl RateLimiterStore {
    pub fn new(limit: u64, window_size: Duration) -> Self {
        let store = Self {
            map: Arc::new(DashMap::new()),
            window_size,
            limit,
        };

        // Only spawn the sweeper when a runtime is around (not in plain unit tests).
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let map = Arc::downgrade(&store.map);
            let ttl = window_size * 2;
            handle.spawn(async move {
                loop {
                    sleep(EVICTION_INTERVAL).await;
                    let Some(map) = map.upgrade() else { break };
                    let now = Instant::now();
                    map.retain(|_, window| now.duration_since(window.lock().last_seen) <= ttl);
                }
            });
        }

        store
    }

    pub fn per_minute(limit: u64) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    pub fn per_hour(limit: u64) -> Self {
        Self::new(limit, Duration::from_secs(3600))
    }

    fn window(&self, key: &str) -> Arc<Mutex<SlidingWindow>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }
        self.map
            .entry(key.to_string())
            .or_insert_with(|| {
                Arc::new(Mutex::new(SlidingWindow::new(self.window_size, self.limit, Instant::now())))
            })
            .clone()
    }

    pub fn check(&self, key: &str) -> RateDecision {
        let window = self.window(key);
        let mut guard = window.lock();
        guard.hit(Instant::now())
    }

    pub fn tracked_keys(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_after_limit_within_window() {
        let limiter = RateLimiterStore::per_hour(2);
        assert!(limiter.check("1.2.3.4").allowed);
        assert!(limiter.check("1.2.3.4").allowed);

        let denied = limiter.check("1.2.3.4");
        assert!(!denied.allowed);
        assert!(denied.retry_after.is_some_and(|s| s >= 1));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiterStore::per_minute(1);
        assert!(limiter.check("a").allowed);
        assert!(!limiter.check("a").allowed);
        assert!(limiter.check("b").allowed);
        assert_eq!(limiter.tracked_keys(), 2);
    }

    #[test]
    fn previous_window_fades_out() {
        let start = Instant::now();
        let mut window = SlidingWindow::new(Duration::from_secs(10), 2, start);
        assert!(window.hit(start).allowed);
        assert!(window.hit(start).allowed);
        assert!(!window.hit(start + Duration::from_secs(5)).allowed);

        // Halfway through the next window only one previous hit still counts.
        assert!(window.hit(start + Duration::from_secs(15)).allowed);
        assert!(!window.hit(start + Duration::from_secs(15)).allowed);

        // Two full windows later the slate is clean.
        assert!(window.hit(start + Duration::from_secs(40)).allowed);
    }

    #[test]
    fn remaining_counts_down() {
        let limiter = RateLimiterStore::per_minute(3);
        assert_eq!(limiter.check("k").remaining, 2);
        assert_eq!(limiter.check("k").remaining, 1);
        assert_eq!(limiter.check("k").remaining, 0);
    }
}
