use std::{collections::HashMap, net::SocketAddr, time::Duration};
use tokio::{sync::RwLock, time::Instant};

struct WindowEntry {
    count: u32,
    window_start: Instant,
}

/// Fixed-window request limiter keyed by peer address.
pub struct RateLimiter {
    entries: RwLock<HashMap<SocketAddr, WindowEntry>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    pub async fn allow(&self, addr: SocketAddr) -> bool {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        let entry = entries.entry(addr).or_insert(WindowEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) > self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= self.max_requests {
            return false;
        }

        entry.count += 1;
        true
    }
}
