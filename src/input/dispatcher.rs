use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;
use tracing::{debug, warn};

use crate::input::event::AppEvent;

/// Depth of the classified-event queue feeding the game machine.
pub const EVENT_QUEUE_DEPTH: usize = 10;

const DEFAULT_ENQUEUE_TIMEOUT: Duration = Duration::from_millis(100);

/// Sending side of the ordered event stream. Cloned by every producer
/// (classifier, setup timer, remote injection); the game task holds the
/// single receiver.
///
/// Sends wait a bounded time when the queue is momentarily full, then
/// drop the event: a lost button press is an accepted degradation, a
/// blocked producer is not.
#[derive(Clone, Debug)]
pub struct EventDispatcher {
    tx: mpsc::Sender<AppEvent>,
    enqueue_timeout: Duration,
}

impl EventDispatcher {
    pub fn channel(enqueue_timeout: Option<Duration>) -> (Self, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let dispatcher = Self {
            tx,
            enqueue_timeout: enqueue_timeout.unwrap_or(DEFAULT_ENQUEUE_TIMEOUT),
        };
        (dispatcher, rx)
    }

    pub async fn dispatch(&self, event: AppEvent) {
        match self.tx.send_timeout(event, self.enqueue_timeout).await {
            Ok(()) => debug!("Dispatched {:?}", event),
            Err(SendTimeoutError::Timeout(event)) => {
                warn!("Event queue full, dropping {:?}", event);
            }
            Err(SendTimeoutError::Closed(event)) => {
                warn!("Event queue closed, dropping {:?}", event);
            }
        }
    }
}
