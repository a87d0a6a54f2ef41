//! Touch control session: viewport scaling and gesture transmission.
//!
//! Pointer positions arrive in consumer space (the viewport showing the
//! mirrored screen) and are scaled into the device space reported by the
//! touch banner before being sent. Every gesture is followed by a commit.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::config::TouchConfig;
use crate::error::MinicastError;
use crate::touch::banner::{TouchBanner, read_touch_banner};
use crate::touch::command::TouchCommand;

// ── Point / Viewport ─────────────────────────────────────────────

/// A position in either consumer or device space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Dimensions of the consumer viewport. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: i32,
    height: i32,
}

impl Viewport {
    /// Validate and build a viewport.
    pub fn new(width: i32, height: i32) -> Result<Self, MinicastError> {
        if width <= 0 || height <= 0 {
            return Err(MinicastError::Configuration(format!(
                "viewport must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Map a consumer-space point into device space.
    ///
    /// Each axis is divided in floating point and truncated toward zero.
    pub fn scale(&self, point: Point, banner: &TouchBanner) -> Point {
        let x = point.x as f64 / self.width as f64 * banner.max_x as f64;
        let y = point.y as f64 / self.height as f64 * banner.max_y as f64;
        Point {
            x: x as i32,
            y: y as i32,
        }
    }
}

// ── TouchSession ─────────────────────────────────────────────────

/// Owns the touch control transport and its banner.
///
/// Calls are sequential and complete before returning; there is no
/// background task.
pub struct TouchSession<T> {
    transport: Option<T>,
    banner: TouchBanner,
    viewport: Viewport,
    pointer: Point,
    last_device_point: Option<Point>,
}

impl<T> TouchSession<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Read the banner from a freshly connected transport.
    pub async fn connect(
        mut transport: T,
        viewport: Viewport,
        config: &TouchConfig,
    ) -> Result<Self, MinicastError> {
        config.validate()?;
        let banner = read_touch_banner(&mut transport, config.banner_buffer_size).await?;
        Ok(Self {
            transport: Some(transport),
            banner,
            viewport,
            pointer: Point::default(),
            last_device_point: None,
        })
    }

    pub fn banner(&self) -> &TouchBanner {
        &self.banner
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replace the viewport. The old one is kept if validation fails.
    pub fn set_viewport(&mut self, width: i32, height: i32) -> Result<(), MinicastError> {
        self.viewport = Viewport::new(width, height)?;
        Ok(())
    }

    /// Record the consumer-space pointer position used by the next gesture.
    pub fn set_pointer(&mut self, x: i32, y: i32) {
        self.pointer = Point::new(x, y);
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Device-space position sent by the most recent press or move.
    pub fn last_device_point(&self) -> Option<Point> {
        self.last_device_point
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    /// Press at the current pointer position.
    pub async fn tap_down(&mut self) -> Result<(), MinicastError> {
        let device = self.scale_pointer();
        self.execute(TouchCommand::down(device.x, device.y)).await
    }

    /// Release the contact. Independent of the pointer position.
    pub async fn tap_up(&mut self) -> Result<(), MinicastError> {
        self.execute(TouchCommand::up()).await
    }

    /// Drag the pressed contact to the current pointer position.
    pub async fn swipe(&mut self) -> Result<(), MinicastError> {
        let device = self.scale_pointer();
        self.execute(TouchCommand::move_to(device.x, device.y)).await
    }

    /// Press and release at `(x, y)`.
    pub async fn tap(&mut self, x: i32, y: i32) -> Result<(), MinicastError> {
        self.set_pointer(x, y);
        self.tap_down().await?;
        self.tap_up().await
    }

    /// Send a command followed by the commit line.
    pub async fn execute(&mut self, command: TouchCommand) -> Result<(), MinicastError> {
        let transport = self.transport.as_mut().ok_or(MinicastError::Closed)?;
        let line = command.encode();
        transport.write_all(line.as_bytes()).await?;
        transport
            .write_all(TouchCommand::Commit.encode().as_bytes())
            .await?;
        transport.flush().await?;
        debug!(command = line.trim_end(), "touch command sent");
        Ok(())
    }

    /// Shut down and release the transport. Further calls are no-ops.
    pub async fn close(&mut self) {
        let Some(mut transport) = self.transport.take() else {
            return;
        };
        if let Err(e) = transport.shutdown().await {
            warn!("touch transport shutdown failed: {e}");
        }
    }

    fn scale_pointer(&mut self) -> Point {
        let device = self.viewport.scale(self.pointer, &self.banner);
        self.last_device_point = Some(device);
        device
    }
}

// ── Tests ────────────────────────────────────────────────────────
