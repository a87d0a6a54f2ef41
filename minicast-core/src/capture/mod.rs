//! Screen capture stream client.
//!
//! ## Wire format
//!
//! ```text
//! ┌──────────────────┬──────────────┬────────────┬──────────────┬────────────┬ ...
//! │ banner (24 B)    │ len (u32 LE) │ frame body │ len (u32 LE) │ frame body │
//! └──────────────────┴──────────────┴────────────┴──────────────┴────────────┴ ...
//! ```
//!
//! | Module    | Purpose                                              |
//! |-----------|------------------------------------------------------|
//! | `banner`  | Fixed banner layout and `Quirks` bitmask              |
//! | `decoder` | Chunk-boundary-agnostic banner/frame state machine    |
//! | `sink`    | Thread-safe frame queue with broadcast notices        |
//! | `stream`  | Receive loop with cooperative cancellation            |

pub mod banner;
pub mod decoder;
pub mod sink;
pub mod stream;

pub use banner::{BANNER_SIZE, CaptureBanner, Quirks};
pub use decoder::{FrameStreamDecoder, LENGTH_PREFIX_SIZE, Phase};
pub use sink::{FrameNotice, FrameSink};
pub use stream::{CaptureStream, StreamSummary};
