//! Camera server client.

use std::{path::PathBuf, thread, time::Duration};

use tracing::{debug, info};

use crate::{
    config::CameraConfig,
    labware::Well,
    machine::{resolve_target, MotionControl},
    pipeline::{self, RgbSample},
    CameraError, RigcamResult,
};

/// Client for a networked still camera mounted as a tool on the rig.
///
/// Each capture drives the motion controller into position over the
/// target, then pulls one encoded frame from the camera server's still
/// endpoint. The per-tool Z offset is supplied explicitly at
/// construction; capture itself only moves in X/Y.
pub struct Camera<M: MotionControl> {
    name: String,
    index: usize,
    config: CameraConfig,
    machine: M,
    tool_z_offset: f64,
    http: reqwest::blocking::Client,
}

impl<M: MotionControl> Camera<M> {
    pub fn new(
        name: impl Into<String>,
        index: usize,
        config: CameraConfig,
        machine: M,
        tool_z_offset: f64,
    ) -> RigcamResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| CameraError::Capture(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            index,
            config,
            machine,
            tool_z_offset,
            http,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Focus-height offset of this tool, for rig code that positions in Z.
    pub fn tool_z_offset(&self) -> f64 {
        self.tool_z_offset
    }

    /// Capture one still frame over the given target.
    ///
    /// Exactly one of `well` or `location` selects the target. The
    /// motion controller is raised to its safe travel height, moved over
    /// the target (blocking until done), and one frame is requested from
    /// the still endpoint. Returns the raw encoded bytes.
    ///
    /// # Errors
    /// Fails on an invalid target, a motion controller fault, any
    /// transport failure, or a non-success HTTP status. There are no
    /// retries; any failure aborts the capture.
    pub fn capture_image(
        &mut self,
        well: Option<&Well>,
        location: Option<(f64, f64, f64)>,
    ) -> RigcamResult<Vec<u8>> {
        let (x, y, _z) = resolve_target(well, location)?;

        self.machine.safe_z_movement()?;
        self.machine.move_to(x, y, true)?;

        self.request_still()
    }

    fn request_still(&self) -> RigcamResult<Vec<u8>> {
        let url = self.config.still_url();
        debug!("requesting still frame from {url}");

        let response = self.http.get(&url).send().map_err(|e| {
            if e.is_timeout() {
                CameraError::Capture(format!("Still request timed out: {e}"))
            } else if e.is_connect() {
                CameraError::Capture(format!("Could not connect to camera server: {e}"))
            } else {
                CameraError::Capture(format!("Still request failed: {e}"))
            }
        })?;

        // let the device settle before anything else talks to it
        thread::sleep(Duration::from_millis(self.config.settle_delay_ms));

        if !response.status().is_success() {
            return Err(CameraError::Capture(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| CameraError::Capture(format!("Failed to read response: {e}")))?;
        Ok(bytes.to_vec())
    }

    /// Open the camera's live video feed in the default browser.
    pub fn video_feed(&self) -> RigcamResult<()> {
        let url = self.config.video_url();
        info!("opening video feed at {url}");
        webbrowser::open(&url)?;
        Ok(())
    }

    /// Run the processing pipeline on raw capture bytes.
    ///
    /// Uses the configured mask center and output folder; `radius`
    /// defaults to the configured region-of-interest radius.
    pub fn process_image(&self, raw: &[u8], radius: Option<u32>) -> RigcamResult<RgbSample> {
        let radius = radius.unwrap_or(self.config.mask_radius);
        pipeline::process_image(
            raw,
            self.config.mask_center,
            radius,
            &self.config.image_folder,
        )
    }

    /// Render raw capture bytes to a preview file and open it in the
    /// default viewer. With `masked` set the region-of-interest mask is
    /// applied to the decoded frame first.
    pub fn view_image(
        &self,
        raw: &[u8],
        masked: bool,
        radius: Option<u32>,
    ) -> RigcamResult<PathBuf> {
        let radius = radius.unwrap_or(self.config.mask_radius);
        let path = pipeline::render_preview(
            raw,
            masked,
            self.config.mask_center,
            radius,
            &self.config.image_folder,
        )?;
        webbrowser::open(&path.display().to_string())?;
        Ok(path)
    }
}
