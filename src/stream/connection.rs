use axum::response::sse::Event;
use futures_util::Stream;
use std::{
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tokio::sync::mpsc::Receiver;

use crate::{models::event::StreamEvent, stream::broadcast::Broadcaster};

/// The SSE body for one connection: pulls typed events off the subscriber's
/// channel and frames each as a `data: <JSON>` event. The stream ends once
/// every sender is gone, i.e. after the registry let go of the subscriber.
pub struct EventStream {
    rx: Receiver<StreamEvent>,
    _guard: DisconnectGuard,
}

impl EventStream {
    pub fn new(rx: Receiver<StreamEvent>, broadcaster: Arc<Broadcaster>, connection_id: Arc<str>) -> Self {
        Self {
            rx,
            _guard: DisconnectGuard {
                broadcaster,
                connection_id,
            },
        }
    }
}

impl Stream for EventStream {
    type Item = Result<Event, axum::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(event)) => Poll::Ready(Some(Event::default().json_data(&event))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

// Runs the Closed transition when the transport goes away, covering abrupt
// client aborts as well as normal stream completion. Closing is idempotent,
// so racing a server-side prune is harmless.
struct DisconnectGuard {
    broadcaster: Arc<Broadcaster>,
    connection_id: Arc<str>,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let broadcaster = self.broadcaster.clone();
        let connection_id = self.connection_id.clone();
        tokio::spawn(async move {
            broadcaster.close(&connection_id).await;
        });
    }
}
