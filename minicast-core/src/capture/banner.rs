//! The fixed binary banner sent once at the start of a capture stream.
//!
//! ## Wire format (24 bytes, little-endian)
//!
//! ```text
//! version:         u8   (1)
//! banner_length:   u8   (1)
//! pid:             u32  (4)
//! real_width:      u32  (4)
//! real_height:     u32  (4)
//! virtual_width:   u32  (4)
//! virtual_height:  u32  (4)
//! orientation:     u8   (1)   degrees = raw * 90
//! quirks:          u8   (1)   bitmask
//! ```

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Size of the fixed banner layout.
pub const BANNER_SIZE: usize = 24;

bitflags! {
    /// Behavioural quirks advertised by the capture helper.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Quirks: u8 {
        /// Frames are only sent when requested; the stream may stall.
        const DUMB = 0x1;
        /// Frames are always upright regardless of device rotation.
        const ALWAYS_UPRIGHT = 0x2;
        /// Frames may tear.
        const TEAR = 0x4;
    }
}

// ── CaptureBanner ────────────────────────────────────────────────

/// Stream geometry reported by the capture helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaptureBanner {
    pub version: u8,
    /// Banner length as announced by the helper itself.
    pub banner_length: u8,
    pub pid: u32,
    pub real_width: u32,
    pub real_height: u32,
    pub virtual_width: u32,
    pub virtual_height: u32,
    /// Display rotation in degrees (0, 90, 180 or 270).
    pub orientation: u16,
    pub quirks: Quirks,
}

impl CaptureBanner {
    /// Apply the byte found at `offset` of the banner region.
    ///
    /// Offsets at or past [`BANNER_SIZE`] carry no known field and are
    /// ignored.
    pub(crate) fn apply_byte(&mut self, offset: usize, byte: u8) {
        let b = byte as u32;
        match offset {
            0 => self.version = byte,
            1 => self.banner_length = byte,
            2..=5 => self.pid |= b << (8 * (offset - 2)),
            6..=9 => self.real_width |= b << (8 * (offset - 6)),
            10..=13 => self.real_height |= b << (8 * (offset - 10)),
            14..=17 => self.virtual_width |= b << (8 * (offset - 14)),
            18..=21 => self.virtual_height |= b << (8 * (offset - 18)),
            22 => self.orientation = byte as u16 * 90,
            23 => self.quirks = Quirks::from_bits_retain(byte),
            _ => {}
        }
    }

    /// Encode the fixed 24-byte layout.
    pub fn encode(&self) -> [u8; BANNER_SIZE] {
        let mut buf = [0u8; BANNER_SIZE];
        buf[0] = self.version;
        buf[1] = self.banner_length;
        buf[2..6].copy_from_slice(&self.pid.to_le_bytes());
        buf[6..10].copy_from_slice(&self.real_width.to_le_bytes());
        buf[10..14].copy_from_slice(&self.real_height.to_le_bytes());
        buf[14..18].copy_from_slice(&self.virtual_width.to_le_bytes());
        buf[18..22].copy_from_slice(&self.virtual_height.to_le_bytes());
        buf[22] = (self.orientation / 90) as u8;
        buf[23] = self.quirks.bits();
        buf
    }
}

impl fmt::Display for CaptureBanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Version       : {}", self.version)?;
        writeln!(f, "Length        : {}", self.banner_length)?;
        writeln!(f, "Pid           : {}", self.pid)?;
        writeln!(f, "RealWidth     : {}", self.real_width)?;
        writeln!(f, "RealHeight    : {}", self.real_height)?;
        writeln!(f, "VirtualWidth  : {}", self.virtual_width)?;
        writeln!(f, "VirtualHeight : {}", self.virtual_height)?;
        writeln!(f, "Orientation   : {}", self.orientation)?;
        write!(f, "Quirks        : {:#04x}", self.quirks.bits())
    }
}

// ── Tests ────────────────────────────────────────────────────────
