//! Thread-safe hand-off point between the capture decoder and consumers.
//!
//! Completed frames are queued in arrival order. Every enqueue also fires
//! a [`FrameNotice`] on a broadcast channel so UI layers can wake up and
//! pull the newest frame. The queue is unbounded: a consumer that falls
//! behind grows memory, the producer is never slowed down.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tokio::sync::{Notify, broadcast};

/// Capacity of the notice channel before slow subscribers start lagging.
const NOTICE_CAPACITY: usize = 64;

/// Fired once per enqueued frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameNotice {
    /// 1-based position of the frame in the stream.
    pub sequence: u64,
    /// Frame length in bytes.
    pub len: usize,
}

struct Inner {
    queue: Mutex<VecDeque<Bytes>>,
    available: Notify,
    notices: broadcast::Sender<FrameNotice>,
    enqueued: AtomicU64,
}

// ── FrameSink ────────────────────────────────────────────────────

/// Multi-producer / multi-consumer frame queue.
///
/// Cloning is cheap and every clone refers to the same queue.
#[derive(Clone)]
pub struct FrameSink {
    inner: Arc<Inner>,
}

impl FrameSink {
    pub fn new() -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                queue: Mutex::new(VecDeque::new()),
                available: Notify::new(),
                notices,
                enqueued: AtomicU64::new(0),
            }),
        }
    }

    /// Queue a frame and notify subscribers. Never blocks.
    pub fn enqueue(&self, frame: Bytes) {
        let len = frame.len();
        self.queue().push_back(frame);
        let sequence = self.inner.enqueued.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.available.notify_one();
        // No subscribers is fine.
        let _ = self.inner.notices.send(FrameNotice { sequence, len });
    }

    /// Pop the oldest frame, if any.
    pub fn try_dequeue(&self) -> Option<Bytes> {
        self.queue().pop_front()
    }

    /// Wait for the next frame.
    pub async fn dequeue(&self) -> Bytes {
        loop {
            let notified = self.inner.available.notified();
            if let Some(frame) = self.try_dequeue() {
                return frame;
            }
            notified.await;
        }
    }

    /// Take every queued frame, oldest first.
    pub fn drain(&self) -> Vec<Bytes> {
        self.queue().drain(..).collect()
    }

    /// Register for notices of frames enqueued from now on.
    ///
    /// Notices fired before this call are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<FrameNotice> {
        self.inner.notices.subscribe()
    }

    pub fn len(&self) -> usize {
        self.queue().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue().is_empty()
    }

    /// Frames enqueued over the sink's lifetime.
    pub fn total_enqueued(&self) -> u64 {
        self.inner.enqueued.load(Ordering::SeqCst)
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<Bytes>> {
        // A panicking consumer cannot leave a VecDeque half-updated.
        self.inner
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FrameSink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSink")
            .field("queued", &self.len())
            .field("total_enqueued", &self.total_enqueued())
            .finish()
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn fifo_order() {
        let sink = FrameSink::new();
        sink.enqueue(Bytes::from_static(b"one"));
        sink.enqueue(Bytes::from_static(b"two"));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.try_dequeue().unwrap(), "one");
        assert_eq!(sink.try_dequeue().unwrap(), "two");
        assert!(sink.try_dequeue().is_none());
        assert!(sink.is_empty());
        assert_eq!(sink.total_enqueued(), 2);
    }

    #[test]
    fn enqueue_without_subscribers_is_fine() {
        let sink = FrameSink::new();
        sink.enqueue(Bytes::new());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn drain_takes_everything() {
        let sink = FrameSink::new();
        for i in 0..5u8 {
            sink.enqueue(Bytes::from(vec![i]));
        }
        let all = sink.drain();
        assert_eq!(all.len(), 5);
        assert_eq!(all[4][0], 4);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn notice_per_enqueue_without_replay() {
        let sink = FrameSink::new();
        sink.enqueue(Bytes::from_static(b"before"));

        let mut rx = sink.subscribe();
        sink.enqueue(Bytes::from_static(b"after"));

        let notice = rx.recv().await.unwrap();
        assert_eq!(notice, FrameNotice { sequence: 2, len: 5 });
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn dequeue_waits_for_producer() {
        let sink = FrameSink::new();
        let consumer = {
            let sink = sink.clone();
            tokio::spawn(async move { sink.dequeue().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        sink.enqueue(Bytes::from_static(b"late"));

        let frame = tokio::time::timeout(Duration::from_secs(5), consumer)
            .await
            .expect("timeout")
            .unwrap();
        assert_eq!(frame, "late");
    }

    #[test]
    fn concurrent_producers_and_consumers() {
        let sink = FrameSink::new();
        let producers: Vec<_> = (0..4)
            .map(|p| {
                let sink = sink.clone();
                std::thread::spawn(move || {
                    for i in 0..250u32 {
                        sink.enqueue(Bytes::from((p * 1000 + i).to_le_bytes().to_vec()));
                    }
                })
            })
            .collect();
        for handle in producers {
            handle.join().unwrap();
        }

        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let sink = sink.clone();
                std::thread::spawn(move || {
                    let mut taken = 0;
                    while sink.try_dequeue().is_some() {
                        taken += 1;
                    }
                    taken
                })
            })
            .collect();
        let total: usize = consumers.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(total, 1000);
        assert_eq!(sink.total_enqueued(), 1000);
    }
}
