//! # minicast-core
//!
//! Client-side protocol library for the device-side screen capture and
//! touch injection helpers used to mirror and control a phone screen.
//!
//! This crate contains:
//! - **Capture**: `FrameStreamDecoder`, `FrameSink`, `CaptureStream` for the
//!   length-prefixed frame stream and its binary banner
//! - **Codec**: `CaptureCodec` for consuming the capture stream via `tokio_util`
//! - **Touch**: `TouchBanner`, `TouchCommand`, `TouchSession` for the text
//!   control channel
//! - **Config**: serde-backed tuning knobs
//! - **Error**: `MinicastError`, a typed, `thiserror`-based error hierarchy
//!
//! Transports are anything implementing `AsyncRead + AsyncWrite`; this
//! crate never dials a socket itself.

pub mod capture;
pub mod codec;
pub mod config;
pub mod error;
pub mod touch;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use capture::{
    BANNER_SIZE, CaptureBanner, CaptureStream, FrameNotice, FrameSink, FrameStreamDecoder, Phase,
    Quirks, StreamSummary,
};
pub use codec::CaptureCodec;
pub use config::{CaptureConfig, TouchConfig};
pub use error::MinicastError;
pub use touch::{Point, TouchBanner, TouchCommand, TouchSession, Viewport};

/// Cancellation token accepted by [`CaptureStream::run`].
pub use tokio_util::sync::CancellationToken;
