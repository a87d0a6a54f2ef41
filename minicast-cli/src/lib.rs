//! # minicast-cli: screen mirror client
//!
//! Connects to the forwarded capture and touch helper sockets of a
//! device, reports their banners, drains capture frames (optionally
//! dumping them to disk) and replays tap / swipe gestures.

pub mod config;
pub mod mirror;
