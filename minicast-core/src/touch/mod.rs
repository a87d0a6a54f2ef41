//! Touch injection control session.
//!
//! The helper greets each client with a short text banner describing the
//! device's contact range, then accepts newline-terminated commands.

pub mod banner;
pub mod command;
pub mod session;

pub use banner::{TouchBanner, read_touch_banner};
pub use command::{DEFAULT_CONTACT, DEFAULT_PRESSURE, TouchCommand};
pub use session::{Point, TouchSession, Viewport};
