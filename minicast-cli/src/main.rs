//! minicast: entry point.
//!
//! ```text
//! minicast                          Mirror with defaults
//! minicast --config <path>          Use custom config TOML
//! minicast --gen-config             Write default config to --config and exit
//! minicast --frames 10 --dump-dir out
//! minicast --tap 270 480            Tap in viewport coordinates
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpStream;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use minicast_core::{
    CancellationToken, CaptureStream, FrameSink, Point, TouchSession, Viewport,
};
use minicast_cli::config::CliConfig;
use minicast_cli::mirror::{FrameConsumer, Gesture};

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "minicast", about = "Mirror and control a device screen")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "minicast.toml")]
    config: PathBuf,

    /// Write the default configuration to the --config path and exit.
    #[arg(long)]
    gen_config: bool,

    /// Host the helper ports are forwarded to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Capture helper port (overrides config).
    #[arg(long)]
    capture_port: Option<u16>,

    /// Touch helper port (overrides config).
    #[arg(long)]
    touch_port: Option<u16>,

    /// Stop after this many frames.
    #[arg(long)]
    frames: Option<u64>,

    /// Write each frame to this directory.
    #[arg(long)]
    dump_dir: Option<PathBuf>,

    /// Print the capture banner as JSON once received.
    #[arg(long)]
    banner_json: bool,

    /// Tap at X Y (viewport coordinates).
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    tap: Option<Vec<i32>>,

    /// Swipe from X1 Y1 to X2 Y2 (viewport coordinates).
    #[arg(long, num_args = 4, value_names = ["X1", "Y1", "X2", "Y2"])]
    swipe: Option<Vec<i32>>,

    /// Intermediate move commands per swipe.
    #[arg(long, default_value_t = 10)]
    swipe_steps: u32,
}

impl Cli {
    fn gesture(&self) -> Option<Gesture> {
        if let Some([x, y]) = self.tap.as_deref() {
            return Some(Gesture::Tap(Point::new(*x, *y)));
        }
        if let Some([x1, y1, x2, y2]) = self.swipe.as_deref() {
            return Some(Gesture::Swipe {
                from: Point::new(*x1, *y1),
                to: Point::new(*x2, *y2),
                steps: self.swipe_steps,
            });
        }
        None
    }
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        CliConfig::write_default(&cli.config)?;
        println!("wrote default config to {}", cli.config.display());
        return Ok(());
    }

    let mut config = CliConfig::load(&cli.config);
    if let Some(host) = &cli.host {
        config.device.host = host.clone();
    }
    if let Some(port) = cli.capture_port {
        config.device.capture_port = port;
    }
    if let Some(port) = cli.touch_port {
        config.device.touch_port = port;
    }

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("minicast v{}", env!("CARGO_PKG_VERSION"));

    // Reject a bad viewport before touching the network.
    let viewport = Viewport::new(config.viewport.width, config.viewport.height)?;

    // ── 1. Gesture only ─────────────────────────────────────────

    if let Some(gesture) = cli.gesture() {
        let address = config.touch_address();
        info!("connecting to touch helper at {address}");
        let stream = TcpStream::connect(&address).await?;
        let mut session = TouchSession::connect(stream, viewport, &config.touch).await?;
        info!(
            "touch banner: v{} contacts={} max={}x{} pressure={} pid={}",
            session.banner().version,
            session.banner().max_contacts,
            session.banner().max_x,
            session.banner().max_y,
            session.banner().max_pressure,
            session.banner().pid,
        );

        let result = gesture.perform(&mut session).await;
        session.close().await;
        result?;
        info!("gesture sent: {gesture:?}");
        return Ok(());
    }

    // ── 2. Capture ──────────────────────────────────────────────

    let address = config.capture_address();
    info!("connecting to capture helper at {address}");
    let socket = TcpStream::connect(&address).await?;

    let sink = FrameSink::new();
    let mut capture = CaptureStream::new(socket, sink.clone(), &config.capture)?;
    let mut banner_rx = capture.banner_receiver();
    let cancel = CancellationToken::new();

    let capture_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let result = capture.run(cancel.clone()).await;
            // Stop the consumer whatever the outcome.
            cancel.cancel();
            capture.close().await;
            result
        })
    };

    let banner_json = cli.banner_json;
    tokio::spawn(async move {
        if let Ok(banner) = banner_rx.wait_for(Option::is_some).await {
            if let Some(banner) = *banner {
                info!("capture banner:\n{banner}");
                if banner_json {
                    match serde_json::to_string_pretty(&banner) {
                        Ok(json) => println!("{json}"),
                        Err(e) => warn!("banner JSON encoding failed: {e}"),
                    }
                }
            }
        }
    });

    // Ctrl-C handler.
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Ctrl-C received; shutting down");
        ctrl_c_cancel.cancel();
    });

    let mut consumer = FrameConsumer::new(sink);
    if let Some(dir) = cli.dump_dir.clone() {
        consumer = consumer.with_dump_dir(dir);
    }
    if let Some(limit) = cli.frames {
        consumer = consumer.with_limit(limit);
    }
    let consumed = consumer.run(cancel.clone()).await?;
    info!(frames = consumed, bytes = consumer.bytes(), "consumer finished");

    // A pending read is not interrupted by the token.
    let abort = capture_task.abort_handle();
    match tokio::time::timeout(Duration::from_secs(1), capture_task).await {
        Ok(Ok(Ok(summary))) => info!(
            frames = summary.frames,
            bytes = summary.bytes_received,
            discarded = summary.discarded,
            "capture finished"
        ),
        Ok(Ok(Err(e))) => {
            error!("capture failed: {e}");
            return Err(e.into());
        }
        Ok(Err(e)) => error!("capture task panicked: {e}"),
        Err(_) => {
            warn!("capture read still pending; aborting");
            abort.abort();
        }
    }

    Ok(())
}
