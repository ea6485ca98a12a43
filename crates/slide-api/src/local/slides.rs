// Local API slide endpoints
//
// Reads via `Slide.GetInfo`, commands via `Slide.SetPos`, `Slide.Stop`,
// `Slide.Calibrate` and the `Slide.Config.*` setters.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::local::client::LocalClient;
use crate::local::models::SlideInfo;

impl LocalClient {
    /// Fetch device identity and live state.
    pub async fn info(&self, host: &str) -> Result<SlideInfo, Error> {
        debug!(host, "fetching slide info");
        self.rpc(host, "Slide.GetInfo", &json!({})).await
    }

    /// Move to a fractional position (0 = open, 1 = closed).
    pub async fn set_position(&self, host: &str, pos: f64) -> Result<(), Error> {
        debug!(host, pos, "setting slide position");
        let _: serde_json::Value = self.rpc(host, "Slide.SetPos", &json!({ "pos": pos })).await?;
        Ok(())
    }

    pub async fn open(&self, host: &str) -> Result<(), Error> {
        self.set_position(host, 0.0).await
    }

    pub async fn close(&self, host: &str) -> Result<(), Error> {
        self.set_position(host, 1.0).await
    }

    pub async fn stop(&self, host: &str) -> Result<(), Error> {
        debug!(host, "stopping slide");
        let _: serde_json::Value = self.rpc(host, "Slide.Stop", &json!({})).await?;
        Ok(())
    }

    pub async fn calibrate(&self, host: &str) -> Result<(), Error> {
        debug!(host, "calibrating slide");
        let _: serde_json::Value = self.rpc(host, "Slide.Calibrate", &json!({})).await?;
        Ok(())
    }

    /// Set motor current limits in milliamps.
    ///
    /// `max_current` caps normal movement, `calib_current` caps the
    /// calibration run.
    pub async fn set_motor_strength(
        &self,
        host: &str,
        max_current: u32,
        calib_current: u32,
    ) -> Result<(), Error> {
        debug!(host, max_current, calib_current, "setting motor strength");
        let body = json!({
            "maxcurrent": max_current,
            "calib_current": calib_current,
        });
        let _: serde_json::Value = self.rpc(host, "Slide.Config.Motor", &body).await?;
        Ok(())
    }

    /// Enable or disable Touch-Go.
    pub async fn set_touch_go(&self, host: &str, enabled: bool) -> Result<(), Error> {
        debug!(host, enabled, "setting touch-go");
        let _: serde_json::Value = self
            .rpc(host, "Slide.Config.TouchGo", &json!({ "touch_go": enabled }))
            .await?;
        Ok(())
    }
}
