//! Timer-driven dismissal.
//!
//! A single task owns a [`DelayQueue`] holding one entry per scheduled
//! notification. Entries are never cancelled: when a notification is closed
//! by another path first, its entry still fires and the target's dismissal
//! guard turns it into a no-op.

use std::sync::Weak;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::time::DelayQueue;
use tracing::{debug, trace};

use super::errors::NotificationError;
use super::types::NotificationId;

/// Receiver of expiry firings.
pub trait ExpiryTarget: Send + Sync {
    fn expire(&self, id: NotificationId);
}

#[derive(Debug)]
struct ExpiryRequest {
    id: NotificationId,
    after: Duration,
}

/// Converts a wire `expire_timeout` into a delay. Negative values never expire.
pub fn expiry_delay(expire_timeout: i32) -> Option<Duration> {
    u64::try_from(expire_timeout).ok().map(Duration::from_millis)
}

pub struct ExpiryScheduler {
    requests: mpsc::UnboundedSender<ExpiryRequest>,
}

impl ExpiryScheduler {
    /// Starts the expiry task on `runtime`.
    ///
    /// The task stops once every sender is dropped, or when a firing finds the
    /// target gone. Pending entries keep firing for as long as the target lives.
    pub fn spawn(runtime: &Handle, target: Weak<dyn ExpiryTarget>) -> Self {
        let (requests, rx) = mpsc::unbounded_channel();
        runtime.spawn(run_expiry_loop(rx, target));
        Self { requests }
    }

    /// Registers `id` to expire after `expire_timeout` milliseconds.
    ///
    /// Returns `Ok(false)` for a negative timeout.
    ///
    /// # Errors
    ///
    /// [`NotificationError::Internal`] when the expiry task has stopped.
    pub fn schedule(&self, id: NotificationId, expire_timeout: i32) -> Result<bool, NotificationError> {
        let Some(after) = expiry_delay(expire_timeout) else {
            trace!(id, expire_timeout, "Notification never expires");
            return Ok(false);
        };
        self.requests
            .send(ExpiryRequest { id, after })
            .map(|()| true)
            .map_err(|_| NotificationError::Internal(format!("expiry task stopped, cannot schedule {}", id)))
    }
}

async fn run_expiry_loop(mut rx: mpsc::UnboundedReceiver<ExpiryRequest>, target: Weak<dyn ExpiryTarget>) {
    let mut queue: DelayQueue<NotificationId> = DelayQueue::new();
    loop {
        tokio::select! {
            request = rx.recv() => match request {
                Some(ExpiryRequest { id, after }) => {
                    debug!(id, delay_ms = after.as_millis() as u64, "Scheduling expiry");
                    queue.insert(id, after);
                }
                None => break,
            },
            Some(expired) = queue.next(), if !queue.is_empty() => {
                let id = expired.into_inner();
                match target.upgrade() {
                    Some(target) => target.expire(id),
                    None => break,
                }
            }
        }
    }
    debug!("Expiry task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tokio::time::{sleep, Instant};

    #[derive(Default)]
    struct Recorder {
        fired: Mutex<Vec<(NotificationId, Instant)>>,
    }

    impl ExpiryTarget for Recorder {
        fn expire(&self, id: NotificationId) {
            self.fired.lock().push((id, Instant::now()));
        }
    }

    fn scheduler_for(recorder: &Arc<Recorder>) -> ExpiryScheduler {
        let target: Weak<dyn ExpiryTarget> = Arc::downgrade(recorder) as Weak<Recorder>;
        ExpiryScheduler::spawn(&Handle::current(), target)
    }

    #[test]
    fn negative_timeouts_have_no_delay() {
        assert_eq!(expiry_delay(-1), None);
        assert_eq!(expiry_delay(0), Some(Duration::ZERO));
        assert_eq!(expiry_delay(250), Some(Duration::from_millis(250)));
    }

    #[tokio::test(start_paused = true)]
    async fn fires_in_deadline_order() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = scheduler_for(&recorder);
        let start = Instant::now();

        assert_eq!(scheduler.schedule(1, 300), Ok(true));
        assert_eq!(scheduler.schedule(2, 100), Ok(true));
        assert_eq!(scheduler.schedule(3, 0), Ok(true));
        assert_eq!(scheduler.schedule(4, -1), Ok(false));

        sleep(Duration::from_secs(1)).await;

        let fired = recorder.fired.lock().clone();
        let order: Vec<NotificationId> = fired.iter().map(|(id, _)| *id).collect();
        assert_eq!(order, vec![3, 2, 1]);
        assert!(fired[1].1 - start >= Duration::from_millis(100));
        assert!(fired[2].1 - start >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_before_deadline() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = scheduler_for(&recorder);

        scheduler.schedule(1, 5_000).unwrap();
        sleep(Duration::from_millis(4_990)).await;
        assert!(recorder.fired.lock().is_empty());

        sleep(Duration::from_millis(20)).await;
        assert_eq!(recorder.fired.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_target_stops_delivery() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = scheduler_for(&recorder);
        scheduler.schedule(1, 10).unwrap();
        drop(recorder);

        sleep(Duration::from_millis(50)).await;
        assert!(matches!(scheduler.schedule(2, 10), Err(NotificationError::Internal(_))));
        assert_eq!(scheduler.schedule(3, -1), Ok(false));
    }
}
