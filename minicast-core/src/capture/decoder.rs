//! Incremental decoder for the capture stream.
//!
//! The transport hands over chunks of arbitrary size. A chunk may end in
//! the middle of a banner field, a length prefix or a frame body, so the
//! decoder keeps its position between calls and resumes exactly where the
//! previous chunk stopped.
//!
//! ```text
//! ┌────────┐ banner done ┌───────────────┐ 4 bytes ┌────────────┐
//! │ Banner │ ──────────► │ LengthPrefix  │ ──────► │ FrameBody  │
//! └────────┘             └───────────────┘ ◄────── └────────────┘
//!                                          body done (emit frame)
//! ```

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::capture::banner::{BANNER_SIZE, CaptureBanner};
use crate::capture::sink::FrameSink;
use crate::config::DEFAULT_MAX_FRAME_SIZE;
use crate::error::MinicastError;

/// Size of the little-endian length prefix in front of every frame.
pub const LENGTH_PREFIX_SIZE: usize = 4;

// ── Phase ────────────────────────────────────────────────────────

/// Which part of the stream the decoder expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Banner,
    LengthPrefix,
    FrameBody,
}

/// A fatal decode error, remembered so later calls keep failing.
#[derive(Debug, Clone, Copy)]
enum Failure {
    FrameTooLarge { size: usize, max: usize },
}

impl Failure {
    fn to_error(self) -> MinicastError {
        match self {
            Failure::FrameTooLarge { size, max } => MinicastError::FrameTooLarge { size, max },
        }
    }
}

// ── FrameStreamDecoder ───────────────────────────────────────────

/// Stateful decoder for one capture stream.
///
/// One instance per stream lifetime. Decoding depends only on the byte
/// content, never on where the chunk boundaries fall.
#[derive(Debug)]
pub struct FrameStreamDecoder {
    max_frame_size: usize,
    phase: Phase,

    banner: CaptureBanner,
    /// Banner bytes consumed so far.
    banner_read: usize,
    /// Banner bytes to consume; settled once the length byte arrives.
    banner_total: usize,

    /// Length prefix bytes consumed so far.
    prefix_read: usize,
    body_len: usize,
    body: BytesMut,

    frames_decoded: u64,
    failure: Option<Failure>,
}

impl Default for FrameStreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStreamDecoder {
    /// Create a decoder with the default frame size limit.
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Create a decoder rejecting frames longer than `max_frame_size`.
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            max_frame_size,
            phase: Phase::Banner,
            banner: CaptureBanner::default(),
            banner_read: 0,
            banner_total: BANNER_SIZE,
            prefix_read: 0,
            body_len: 0,
            body: BytesMut::new(),
            frames_decoded: 0,
            failure: None,
        }
    }

    /// The decoded banner, once every banner byte has been consumed.
    pub fn banner(&self) -> Option<&CaptureBanner> {
        match self.phase {
            Phase::Banner => None,
            _ => Some(&self.banner),
        }
    }

    /// The banner as decoded so far; fields not yet received are zero.
    pub fn partial_banner(&self) -> &CaptureBanner {
        &self.banner
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    /// Number of complete frames emitted so far.
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Whether frame body bytes are buffered awaiting the rest of the frame.
    pub fn has_partial_frame(&self) -> bool {
        self.phase == Phase::FrameBody && !self.body.is_empty()
    }

    /// Consume `chunk`, pushing every completed frame into `sink`.
    ///
    /// Returns the number of frames emitted by this call.
    pub fn feed(&mut self, chunk: &[u8], sink: &FrameSink) -> Result<usize, MinicastError> {
        self.feed_with(chunk, |frame| sink.enqueue(frame))
    }

    /// Consume `chunk`, handing every completed frame to `emit` in order.
    pub fn feed_with<F>(&mut self, chunk: &[u8], mut emit: F) -> Result<usize, MinicastError>
    where
        F: FnMut(Bytes),
    {
        let mut offset = 0;
        let mut emitted = 0;
        while offset < chunk.len() {
            let (consumed, frame) = self.decode_next(&chunk[offset..])?;
            offset += consumed;
            match frame {
                Some(frame) => {
                    emit(frame);
                    emitted += 1;
                }
                None => break,
            }
        }
        Ok(emitted)
    }

    /// Signal end of stream.
    ///
    /// A truncated frame cannot be validated, so any buffered body bytes
    /// are dropped. Returns the number of bytes discarded.
    pub fn finish(&mut self) -> usize {
        let discarded = match self.phase {
            Phase::FrameBody => self.body.len(),
            _ => 0,
        };
        if discarded > 0 {
            debug!(
                discarded,
                expected = self.body_len,
                "stream ended mid-frame; discarding partial frame"
            );
        }
        self.body = BytesMut::new();
        self.prefix_read = 0;
        self.body_len = 0;
        if self.phase == Phase::FrameBody {
            self.phase = Phase::LengthPrefix;
        }
        discarded
    }

    /// Advance through `src` until one frame completes or `src` runs out.
    ///
    /// Returns how many bytes of `src` were consumed alongside the frame,
    /// if one completed. Bytes after a completed frame are left untouched.
    pub(crate) fn decode_next(
        &mut self,
        src: &[u8],
    ) -> Result<(usize, Option<Bytes>), MinicastError> {
        if let Some(failure) = self.failure {
            return Err(failure.to_error());
        }

        let mut cursor = 0;
        while cursor < src.len() {
            match self.phase {
                Phase::Banner => {
                    let byte = src[cursor];
                    cursor += 1;
                    self.banner.apply_byte(self.banner_read, byte);
                    if self.banner_read == 1 {
                        self.settle_banner_length(byte);
                    }
                    self.banner_read += 1;
                    if self.banner_read == self.banner_total {
                        self.phase = Phase::LengthPrefix;
                        debug!(
                            version = self.banner.version,
                            pid = self.banner.pid,
                            real_width = self.banner.real_width,
                            real_height = self.banner.real_height,
                            virtual_width = self.banner.virtual_width,
                            virtual_height = self.banner.virtual_height,
                            orientation = self.banner.orientation,
                            quirks = self.banner.quirks.bits(),
                            "capture banner decoded"
                        );
                    }
                }
                Phase::LengthPrefix => {
                    let byte = src[cursor] as usize;
                    cursor += 1;
                    self.body_len |= byte << (8 * self.prefix_read);
                    self.prefix_read += 1;
                    if self.prefix_read == LENGTH_PREFIX_SIZE {
                        if self.body_len > self.max_frame_size {
                            let failure = Failure::FrameTooLarge {
                                size: self.body_len,
                                max: self.max_frame_size,
                            };
                            self.failure = Some(failure);
                            return Err(failure.to_error());
                        }
                        self.body = BytesMut::with_capacity(self.body_len);
                        self.phase = Phase::FrameBody;
                        if self.body_len == 0 {
                            return Ok((cursor, Some(self.complete_frame())));
                        }
                    }
                }
                Phase::FrameBody => {
                    let wanted = self.body_len - self.body.len();
                    let take = wanted.min(src.len() - cursor);
                    self.body.extend_from_slice(&src[cursor..cursor + take]);
                    cursor += take;
                    if self.body.len() == self.body_len {
                        return Ok((cursor, Some(self.complete_frame())));
                    }
                }
            }
        }
        Ok((cursor, None))
    }

    // ── Internal ─────────────────────────────────────────────────

    /// The fixed layout is always read in full. A longer announced banner
    /// has trailing bytes with no known fields, which are skipped.
    fn settle_banner_length(&mut self, announced: u8) {
        let announced_len = announced as usize;
        if announced_len > BANNER_SIZE {
            self.banner_total = announced_len;
        } else if announced_len < BANNER_SIZE {
            debug!(announced, "capture banner length below fixed layout; reading 24 bytes");
        }
    }

    fn complete_frame(&mut self) -> Bytes {
        let frame = std::mem::take(&mut self.body).freeze();
        self.prefix_read = 0;
        self.body_len = 0;
        self.phase = Phase::LengthPrefix;
        self.frames_decoded += 1;
        trace!(len = frame.len(), seq = self.frames_decoded, "frame decoded");
        frame
    }
}

// ── Tests ────────────────────────────────────────────────────────
