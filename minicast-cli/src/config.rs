//! Mirror client configuration.

use std::path::Path;

use minicast_core::{CaptureConfig, TouchConfig};
use serde::{Deserialize, Serialize};

/// Top-level configuration for the mirror client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Where the forwarded helper sockets live.
    pub device: DeviceConfig,
    /// Consumer viewport used to scale touch input.
    pub viewport: ViewportConfig,
    /// Capture stream tuning.
    pub capture: CaptureConfig,
    /// Touch session tuning.
    pub touch: TouchConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Forwarded helper endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Host the helper ports are forwarded to.
    pub host: String,
    /// Capture helper port.
    pub capture_port: u16,
    /// Touch helper port.
    pub touch_port: u16,
}

/// Consumer viewport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: i32,
    pub height: i32,
}

/// Logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level, overridden by `RUST_LOG`.
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            device: DeviceConfig::default(),
            viewport: ViewportConfig::default(),
            capture: CaptureConfig::default(),
            touch: TouchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            capture_port: 1717,
            touch_port: 1111,
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 540,
            height: 960,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl CliConfig {
    /// Load from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write default config to a file.
    pub fn write_default(path: &Path) -> std::io::Result<()> {
        let cfg = Self::default();
        let text = toml::to_string_pretty(&cfg).map_err(std::io::Error::other)?;
        std::fs::write(path, text)
    }

    pub fn capture_address(&self) -> String {
        format!("{}:{}", self.device.host, self.device.capture_port)
    }

    pub fn touch_address(&self) -> String {
        format!("{}:{}", self.device.host, self.device.touch_port)
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let cfg = CliConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("capture_port"));
        assert!(text.contains("max_frame_size"));
        assert!(text.contains("banner_buffer_size"));
    }

    #[test]
    fn roundtrip_config() {
        let cfg = CliConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: CliConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.viewport.width, 540);
        assert_eq!(parsed.capture_address(), "127.0.0.1:1717");
        assert_eq!(parsed.touch_address(), "127.0.0.1:1111");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let parsed: CliConfig = toml::from_str("[device]\ncapture_port = 2000\n").unwrap();
        assert_eq!(parsed.device.capture_port, 2000);
        assert_eq!(parsed.device.touch_port, 1111);
        assert_eq!(parsed.capture.read_buffer_size, 4096);
    }

    #[test]
    fn write_default_then_load() {
        let path = std::env::temp_dir().join(format!("minicast-{}.toml", std::process::id()));
        CliConfig::write_default(&path).unwrap();

        let cfg = CliConfig::load(&path);
        assert_eq!(cfg.capture_address(), "127.0.0.1:1717");
        assert_eq!(cfg.viewport.height, 960);
        assert_eq!(cfg.touch.banner_buffer_size, 64);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = CliConfig::load(Path::new("/nonexistent/minicast.toml"));
        assert_eq!(cfg.logging.level, "info");
    }
}
