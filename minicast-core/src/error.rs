//! Domain-specific error types for the minicap / minitouch clients.
//!
//! All fallible operations return `Result<T, MinicastError>`.
//! No panics on malformed device output: every error is typed and
//! reported with the raw context that triggered it.

use thiserror::Error;

/// The canonical error type for the capture and touch clients.
#[derive(Debug, Error)]
pub enum MinicastError {
    // ── Transport Errors ─────────────────────────────────────────
    /// The socket layer reported an error.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The peer closed the stream before the expected data arrived.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// The session was already closed locally.
    #[error("session is closed")]
    Closed,

    // ── Protocol Errors ──────────────────────────────────────────
    /// The touch banner could not be decoded.
    #[error("touch banner parse error: {reason} (raw: {raw:?})")]
    BannerParse { reason: String, raw: String },

    /// A capture frame length prefix exceeded the configured limit.
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    // ── Configuration Errors ─────────────────────────────────────
    /// A caller-supplied setting is out of range.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Catch-all for errors that do not fit another variant.
    #[error("{0}")]
    Other(String),
}

impl MinicastError {
    /// Socket failure or closure.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::ConnectionClosed | Self::Closed
        )
    }

    /// The peer sent something this client cannot decode.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::BannerParse { .. } | Self::FrameTooLarge { .. })
    }

    /// The caller supplied an invalid setting.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

// ── Convenient From implementations ──────────────────────────────

impl From<String> for MinicastError {
    fn from(s: String) -> Self {
        MinicastError::Other(s)
    }
}

impl From<&str> for MinicastError {
    fn from(s: &str) -> Self {
        MinicastError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = MinicastError::FrameTooLarge {
            size: 1000,
            max: 500,
        };
        assert!(e.to_string().contains("1000"));
        assert!(e.to_string().contains("500"));

        let e = MinicastError::BannerParse {
            reason: "expected 9 tokens, got 2".into(),
            raw: "v 1".into(),
        };
        assert!(e.to_string().contains("9 tokens"));
        assert!(e.to_string().contains("v 1"));
    }

    #[test]
    fn from_string() {
        let e: MinicastError = "something broke".into();
        assert!(matches!(e, MinicastError::Other(_)));
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broke");
        let e: MinicastError = io_err.into();
        assert!(matches!(e, MinicastError::Transport(_)));
        assert!(e.is_transport());
    }

    #[test]
    fn categories() {
        assert!(MinicastError::FrameTooLarge { size: 2, max: 1 }.is_protocol());
        assert!(MinicastError::Configuration("zero width".into()).is_configuration());
        assert!(!MinicastError::Closed.is_protocol());
    }
}
