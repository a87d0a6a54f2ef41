//! The textual banner printed by the touch helper when a client connects.
//!
//! A typical banner looks like:
//!
//! ```text
//! v 1
//! ^ 10 1079 1919 2048
//! $ 12345
//! ```
//!
//! Whitespace-separated tokens are read by position; the marker tokens
//! (`v`, `^`, `$`) are not interpreted.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::error::MinicastError;

const VERSION_TOKEN: usize = 1;
const MAX_CONTACTS_TOKEN: usize = 3;
const MAX_X_TOKEN: usize = 4;
const MAX_Y_TOKEN: usize = 5;
const MAX_PRESSURE_TOKEN: usize = 6;
const PID_TOKEN: usize = 8;

/// Tokens needed to reach the highest referenced position.
const REQUIRED_TOKENS: usize = PID_TOKEN + 1;

/// Device capabilities reported by the touch helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TouchBanner {
    pub version: u32,
    pub max_contacts: u32,
    pub max_x: u32,
    pub max_y: u32,
    pub max_pressure: u32,
    pub pid: u32,
}

impl TouchBanner {
    /// Parse banner text.
    pub fn parse(text: &str) -> Result<Self, MinicastError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() < REQUIRED_TOKENS {
            return Err(MinicastError::BannerParse {
                reason: format!(
                    "expected at least {REQUIRED_TOKENS} tokens, got {}",
                    tokens.len()
                ),
                raw: text.to_string(),
            });
        }

        let field = |index: usize, name: &str| -> Result<u32, MinicastError> {
            tokens[index]
                .parse()
                .map_err(|e| MinicastError::BannerParse {
                    reason: format!("{name} at token {index} is not an integer: {e}"),
                    raw: text.to_string(),
                })
        };

        Ok(Self {
            version: field(VERSION_TOKEN, "version")?,
            max_contacts: field(MAX_CONTACTS_TOKEN, "max contacts")?,
            max_x: field(MAX_X_TOKEN, "max x")?,
            max_y: field(MAX_Y_TOKEN, "max y")?,
            max_pressure: field(MAX_PRESSURE_TOKEN, "max pressure")?,
            pid: field(PID_TOKEN, "pid")?,
        })
    }
}

impl FromStr for TouchBanner {
    type Err = MinicastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Read the banner with a single read of up to `buf_len` bytes.
///
/// A zero-byte read means the helper hung up before greeting us.
pub async fn read_touch_banner<R>(reader: &mut R, buf_len: usize) -> Result<TouchBanner, MinicastError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; buf_len];
    let n = reader.read(&mut buf).await?;
    if n == 0 {
        return Err(MinicastError::ConnectionClosed);
    }

    let text = String::from_utf8_lossy(&buf[..n]);
    let banner = TouchBanner::parse(&text)?;
    debug!(
        version = banner.version,
        max_contacts = banner.max_contacts,
        max_x = banner.max_x,
        max_y = banner.max_y,
        max_pressure = banner.max_pressure,
        pid = banner.pid,
        "touch banner decoded"
    );
    Ok(banner)
}
