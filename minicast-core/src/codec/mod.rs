//! `tokio_util` codec adapter for the capture stream.
//!
//! Lets a capture socket be consumed as `FramedRead<_, CaptureCodec>`,
//! yielding one `Bytes` per frame. The banner is decoded along the way and
//! exposed through [`CaptureCodec::banner`].

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::Decoder;

use crate::capture::banner::CaptureBanner;
use crate::capture::decoder::FrameStreamDecoder;
use crate::error::MinicastError;

#[derive(Debug, Default)]
pub struct CaptureCodec {
    decoder: FrameStreamDecoder,
}

impl CaptureCodec {
    pub fn new(max_frame_size: usize) -> Self {
        Self {
            decoder: FrameStreamDecoder::with_max_frame_size(max_frame_size),
        }
    }

    pub fn banner(&self) -> Option<&CaptureBanner> {
        self.decoder.banner()
    }
}

impl Decoder for CaptureCodec {
    type Item = Bytes;
    type Error = MinicastError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // The decoder keeps partial state itself, so every byte handed
        // over is consumed even when no frame completes.
        let (consumed, frame) = self.decoder.decode_next(src)?;
        src.advance(consumed);
        Ok(frame)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None => {
                self.decoder.finish();
                Ok(None)
            }
        }
    }
}
