//! Tuning knobs for the capture and touch clients.
//!
//! Both structs deserialize with `#[serde(default)]` so a partial TOML
//! section only overrides the keys it names.

use serde::{Deserialize, Serialize};

use crate::error::MinicastError;

/// Default size of one transport read on the capture socket.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

/// Default upper bound on a single capture frame body (16 MiB).
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Default size of the one-shot touch banner read.
pub const DEFAULT_TOUCH_BANNER_SIZE: usize = 64;

/// Capture stream settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Bytes requested per transport read.
    pub read_buffer_size: usize,
    /// Frame length prefixes above this are rejected.
    pub max_frame_size: usize,
}

/// Touch session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchConfig {
    /// Bytes read for the startup banner.
    pub banner_buffer_size: usize,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            banner_buffer_size: DEFAULT_TOUCH_BANNER_SIZE,
        }
    }
}

// ── Validation ───────────────────────────────────────────────────

impl CaptureConfig {
    /// Reject settings that would stall or disable the decoder.
    pub fn validate(&self) -> Result<(), MinicastError> {
        if self.read_buffer_size == 0 {
            return Err(MinicastError::Configuration(
                "capture.read_buffer_size must be positive".into(),
            ));
        }
        if self.max_frame_size == 0 {
            return Err(MinicastError::Configuration(
                "capture.max_frame_size must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl TouchConfig {
    pub fn validate(&self) -> Result<(), MinicastError> {
        if self.banner_buffer_size == 0 {
            return Err(MinicastError::Configuration(
                "touch.banner_buffer_size must be positive".into(),
            ));
        }
        Ok(())
    }
}
