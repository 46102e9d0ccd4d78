//! Camera tool configuration.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

const APP_NAME: &str = "rigcam";

fn default_config_dir() -> PathBuf {
    let mut dir = dirs_next::config_dir().unwrap_or_else(|| {
        dirs_next::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
    });
    dir.push(APP_NAME);
    dir
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn default_image_folder() -> PathBuf {
    PathBuf::from(".")
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_settle_delay_ms() -> u64 {
    2000
}

fn default_mask_center() -> (u32, u32) {
    (300, 300)
}

fn default_mask_radius() -> u32 {
    50
}

/// Connection and processing settings for one camera server.
///
/// The tuning fields (`http_timeout_secs`, `settle_delay_ms`,
/// `mask_center`, `mask_radius`) have defaults and may be omitted from
/// config files; the addressing fields are required.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CameraConfig {
    pub ip_address: String,
    pub port: u16,
    /// Path suffix of the live video endpoint.
    pub video_endpoint: String,
    /// Path suffix of the still capture endpoint.
    pub still_endpoint: String,
    /// Directory that receives pipeline output files.
    #[serde(default = "default_image_folder")]
    pub image_folder: PathBuf,
    /// Timeout for the still capture request.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// Pause after each capture so the device can settle before the next
    /// command reaches it.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Pixel coordinates of the region-of-interest center.
    #[serde(default = "default_mask_center")]
    pub mask_center: (u32, u32),
    /// Default region-of-interest radius in pixels.
    #[serde(default = "default_mask_radius")]
    pub mask_radius: u32,
}

impl CameraConfig {
    /// Load from an explicit path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let cfg = serde_json::from_str(&raw)?;
        Ok(cfg)
    }

    /// Load a named config file resolved against the default
    /// configuration directory.
    pub fn from_file(name: &str) -> Result<Self, ConfigError> {
        Self::load(default_config_dir().join(name))
    }

    /// Save to an explicit path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)?;
        Ok(())
    }

    /// URL of the still capture endpoint.
    pub fn still_url(&self) -> String {
        format!(
            "http://{}:{}/{}",
            self.ip_address, self.port, self.still_endpoint
        )
    }

    /// URL of the live video endpoint.
    pub fn video_url(&self) -> String {
        format!(
            "http://{}:{}/{}",
            self.ip_address, self.port, self.video_endpoint
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> CameraConfig {
        CameraConfig {
            ip_address: "192.168.1.40".to_owned(),
            port: 8080,
            video_endpoint: "video_feed".to_owned(),
            still_endpoint: "picture".to_owned(),
            image_folder: PathBuf::from("captures"),
            http_timeout_secs: 5,
            settle_delay_ms: 500,
            mask_center: (320, 240),
            mask_radius: 40,
        }
    }

    #[test]
    fn test_urls() {
        let cfg = full_config();
        assert_eq!(cfg.still_url(), "http://192.168.1.40:8080/picture");
        assert_eq!(cfg.video_url(), "http://192.168.1.40:8080/video_feed");
    }

    #[test]
    fn test_tuning_defaults() {
        let raw = r#"{
            "ip_address": "10.0.0.7",
            "port": 8000,
            "video_endpoint": "video_feed",
            "still_endpoint": "picture"
        }"#;

        let cfg: CameraConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(cfg.image_folder, PathBuf::from("."));
        assert_eq!(cfg.http_timeout_secs, 10);
        assert_eq!(cfg.settle_delay_ms, 2000);
        assert_eq!(cfg.mask_center, (300, 300));
        assert_eq!(cfg.mask_radius, 50);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camera.json");

        let cfg = full_config();
        cfg.save(&path).unwrap();

        let loaded = CameraConfig::load(&path).unwrap();
        assert_eq!(loaded.ip_address, cfg.ip_address);
        assert_eq!(loaded.port, cfg.port);
        assert_eq!(loaded.mask_center, cfg.mask_center);
        assert_eq!(loaded.settle_delay_ms, cfg.settle_delay_ms);
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camera.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            CameraConfig::load(&path),
            Err(ConfigError::Json(_))
        ));
    }
}
