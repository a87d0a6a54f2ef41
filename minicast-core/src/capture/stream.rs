//! Receive loop driving a [`FrameStreamDecoder`] from a transport.
//!
//! One `CaptureStream` per capture socket. [`CaptureStream::run`] reads a
//! chunk, feeds it to the decoder, and checks the cancellation token
//! between chunks. The token does not interrupt a read that is already
//! pending: callers that need a prompt shutdown must also close the peer
//! or abort the task running the loop.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::capture::banner::CaptureBanner;
use crate::capture::decoder::FrameStreamDecoder;
use crate::capture::sink::FrameSink;
use crate::config::CaptureConfig;
use crate::error::MinicastError;

/// Outcome of a completed [`CaptureStream::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Frames emitted during this run.
    pub frames: u64,
    /// Raw bytes read from the transport.
    pub bytes_received: u64,
    /// Whether the loop stopped because the token was cancelled.
    pub cancelled: bool,
    /// Bytes of a truncated trailing frame that were dropped.
    pub discarded: usize,
}

// ── CaptureStream ────────────────────────────────────────────────

/// Owns a capture transport and the decoder for its byte stream.
pub struct CaptureStream<T> {
    transport: Option<T>,
    decoder: FrameStreamDecoder,
    sink: FrameSink,
    read_buffer_size: usize,
    /// Publishes the banner once it is complete.
    banner_tx: watch::Sender<Option<CaptureBanner>>,
}

impl<T> CaptureStream<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap a connected transport. Frames are delivered to `sink`.
    pub fn new(transport: T, sink: FrameSink, config: &CaptureConfig) -> Result<Self, MinicastError> {
        config.validate()?;
        Ok(Self {
            transport: Some(transport),
            decoder: FrameStreamDecoder::with_max_frame_size(config.max_frame_size),
            sink,
            read_buffer_size: config.read_buffer_size,
            banner_tx: watch::Sender::new(None),
        })
    }

    /// The capture banner, once it has been fully received.
    pub fn banner(&self) -> Option<&CaptureBanner> {
        self.decoder.banner()
    }

    /// Obtain a `watch::Receiver` that yields the banner once decoded.
    ///
    /// Useful when [`run`](Self::run) is executing on another task.
    pub fn banner_receiver(&self) -> watch::Receiver<Option<CaptureBanner>> {
        self.banner_tx.subscribe()
    }

    pub fn sink(&self) -> &FrameSink {
        &self.sink
    }

    pub fn decoder(&self) -> &FrameStreamDecoder {
        &self.decoder
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    /// Read and decode until end of stream or cancellation.
    ///
    /// End of stream is a clean exit: a partially received frame is
    /// discarded and reported in the summary. Transport and protocol
    /// errors end the loop and are returned to the caller.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<StreamSummary, MinicastError> {
        let transport = self.transport.as_mut().ok_or(MinicastError::Closed)?;
        let mut chunk = vec![0u8; self.read_buffer_size];
        let mut summary = StreamSummary::default();

        loop {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            let n = transport.read(&mut chunk).await?;
            if n == 0 {
                summary.discarded = self.decoder.finish();
                break;
            }

            summary.bytes_received += n as u64;
            summary.frames += self.decoder.feed(&chunk[..n], &self.sink)? as u64;

            if self.banner_tx.borrow().is_none() {
                if let Some(banner) = self.decoder.banner() {
                    self.banner_tx.send_replace(Some(*banner));
                }
            }
        }

        info!(
            frames = summary.frames,
            bytes = summary.bytes_received,
            cancelled = summary.cancelled,
            "capture stream stopped"
        );
        Ok(summary)
    }

    /// Shut down and release the transport. Further calls are no-ops.
    pub async fn close(&mut self) {
        let Some(mut transport) = self.transport.take() else {
            return;
        };
        if let Err(e) = transport.shutdown().await {
            warn!("capture transport shutdown failed: {e}");
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
