use chrono::Utc;
use std::{sync::Arc, time::Duration};
use tokio::task::AbortHandle;

use crate::{models::subscriber::Subscriber, stream::broadcast::Broadcaster};

/// Starts the keep-alive timer for one subscriber. The task lives exactly as
/// long as the registration: a failed send closes the connection and ends the
/// task, and `Broadcaster::close` aborts it through the returned handle.
pub fn spawn(
    broadcaster: Arc<Broadcaster>,
    subscriber: Subscriber,
    interval: Duration,
) -> AbortHandle {
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; the connected event already
        // greeted this subscriber.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match broadcaster.publish_heartbeat(&subscriber) {
                Ok(()) => {
                    broadcaster
                        .registry()
                        .touch(&subscriber.connection_id, Utc::now().timestamp_millis())
                        .await;
                }
                Err(_) => {
                    broadcaster.close(&subscriber.connection_id).await;
                    break;
                }
            }
        }
    });

    task.abort_handle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::event::StreamEvent, stream::registry::ConnectionRegistry};
    use tokio::{sync::mpsc, time::timeout};

    fn fixture() -> (Arc<ConnectionRegistry>, Arc<Broadcaster>) {
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Arc::new(Broadcaster::new(registry.clone()));
        (registry, broadcaster)
    }

    fn subscriber(id: &str) -> (Subscriber, mpsc::Receiver<StreamEvent>) {
        let (tx, rx) = mpsc::channel(8);
        (
            Subscriber::new(Arc::from(id), "u1".to_string(), "Alice".to_string(), tx),
            rx,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn emits_heartbeats_at_the_configured_interval() {
        let (registry, broadcaster) = fixture();
        let (sub, mut rx) = subscriber("c1");
        registry.register(sub.clone()).await;

        let handle = spawn(broadcaster, sub, Duration::from_secs(30));

        for _ in 0..2 {
            let event = timeout(Duration::from_secs(120), rx.recv())
                .await
                .expect("no heartbeat within two intervals")
                .unwrap();
            assert!(matches!(event, StreamEvent::Heartbeat { .. }));
        }

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn successful_heartbeat_refreshes_last_seen() {
        let (registry, broadcaster) = fixture();
        let (sub, mut rx) = subscriber("c1");
        let before = sub.last_seen;
        registry.register(sub.clone()).await;

        let handle = spawn(broadcaster, sub, Duration::from_secs(30));
        timeout(Duration::from_secs(120), rx.recv())
            .await
            .expect("no heartbeat within two intervals")
            .unwrap();
        // Give the task a beat to get past the touch.
        tokio::task::yield_now().await;

        assert!(registry.snapshot().await[0].last_seen >= before);
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn dead_sink_closes_the_connection_and_ends_the_task() {
        let (registry, broadcaster) = fixture();
        let (sub, rx) = subscriber("c1");
        registry.register(sub.clone()).await;
        drop(rx);

        let handle = spawn(broadcaster, sub, Duration::from_secs(30));

        timeout(Duration::from_secs(120), async {
            while registry.count().await > 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            while !handle.is_finished() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("subscriber was not pruned after a failed heartbeat");
    }

    #[tokio::test(start_paused = true)]
    async fn close_cancels_the_heartbeat_task() {
        let (registry, broadcaster) = fixture();
        let (sub, _rx) = subscriber("c1");
        registry.register(sub.clone()).await;

        let handle = spawn(broadcaster.clone(), sub, Duration::from_secs(30));
        registry.attach_heartbeat("c1", handle.clone()).await;

        broadcaster.close("c1").await;

        timeout(Duration::from_secs(120), async {
            while !handle.is_finished() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("heartbeat task survived close");
        assert_eq!(registry.count().await, 0);
    }
}
