//! Frame consumption and gesture playback for the mirror client.

use std::path::PathBuf;

use bytes::Bytes;
use minicast_core::{CancellationToken, FrameSink, MinicastError, Point, TouchSession};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

// ── Frame consumer ───────────────────────────────────────────────

/// Drains decoded frames, optionally writing each one to disk.
pub struct FrameConsumer {
    sink: FrameSink,
    dump_dir: Option<PathBuf>,
    limit: Option<u64>,
    consumed: u64,
    bytes: u64,
}

impl FrameConsumer {
    pub fn new(sink: FrameSink) -> Self {
        Self {
            sink,
            dump_dir: None,
            limit: None,
            consumed: 0,
            bytes: 0,
        }
    }

    /// Write every frame to `dir` as `frame-<seq>.jpg`.
    pub fn with_dump_dir(mut self, dir: PathBuf) -> Self {
        self.dump_dir = Some(dir);
        self
    }

    /// Stop (and cancel the capture) after `limit` frames.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Consume frames until `cancel` fires or the limit is reached.
    ///
    /// Frames already queued when `cancel` fires are still consumed, so the
    /// tail of a stream that ended cleanly is not lost.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<u64, MinicastError> {
        if let Some(dir) = &self.dump_dir {
            tokio::fs::create_dir_all(dir).await?;
        }

        loop {
            if self.limit_reached() {
                info!(frames = self.consumed, "frame limit reached");
                cancel.cancel();
                return Ok(self.consumed);
            }

            let frame = tokio::select! {
                biased;
                frame = self.sink.dequeue() => frame,
                _ = cancel.cancelled() => break,
            };
            self.consume(frame).await?;
        }

        for frame in self.sink.drain() {
            if self.limit_reached() {
                break;
            }
            self.consume(frame).await?;
        }
        Ok(self.consumed)
    }

    fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.consumed >= limit)
    }

    async fn consume(&mut self, frame: Bytes) -> Result<(), MinicastError> {
        self.consumed += 1;
        self.bytes += frame.len() as u64;
        debug!(seq = self.consumed, len = frame.len(), "frame received");

        if let Some(dir) = &self.dump_dir {
            let path = dir.join(format!("frame-{:06}.jpg", self.consumed));
            tokio::fs::write(&path, &frame).await?;
        }
        Ok(())
    }
}

// ── Gestures ─────────────────────────────────────────────────────

/// A gesture requested on the command line, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Tap(Point),
    Swipe { from: Point, to: Point, steps: u32 },
}

impl Gesture {
    /// Play the gesture on `session`.
    pub async fn perform<T>(&self, session: &mut TouchSession<T>) -> Result<(), MinicastError>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        match *self {
            Gesture::Tap(at) => session.tap(at.x, at.y).await,
            Gesture::Swipe { from, to, steps } => {
                let steps = steps.max(1) as i64;
                session.set_pointer(from.x, from.y);
                session.tap_down().await?;
                for i in 1..=steps {
                    let x = from.x as i64 + (to.x as i64 - from.x as i64) * i / steps;
                    let y = from.y as i64 + (to.y as i64 - from.y as i64) * i / steps;
                    session.set_pointer(x as i32, y as i32);
                    session.swipe().await?;
                }
                session.tap_up().await
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
