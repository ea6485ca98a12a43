// Cloud API slide endpoints
//
// Overview (read) and per-slide commands. Open and close are expressed as
// position moves to the fully-open (0.0) and fully-closed (1.0) ends.

use serde_json::json;
use tracing::debug;

use crate::cloud::client::CloudClient;
use crate::cloud::models::SlidesOverview;
use crate::error::Error;

impl CloudClient {
    /// List every slide on the account with its live state.
    ///
    /// `GET slides/overview`
    pub async fn slides_overview(&self) -> Result<SlidesOverview, Error> {
        let url = self.api_url("slides/overview")?;
        debug!("fetching slides overview");
        self.get(url).await
    }

    /// Move a slide to a fractional position (0 = open, 1 = closed).
    ///
    /// `POST slide/{id}/position` with `{"pos": f}`
    pub async fn set_position(&self, slide_id: i64, pos: f64) -> Result<(), Error> {
        let url = self.api_url(&format!("slide/{slide_id}/position"))?;
        debug!(slide_id, pos, "setting slide position");
        let _: serde_json::Value = self.post(url, &json!({ "pos": pos })).await?;
        Ok(())
    }

    pub async fn open(&self, slide_id: i64) -> Result<(), Error> {
        self.set_position(slide_id, 0.0).await
    }

    pub async fn close(&self, slide_id: i64) -> Result<(), Error> {
        self.set_position(slide_id, 1.0).await
    }

    /// `POST slide/{id}/stop`
    pub async fn stop(&self, slide_id: i64) -> Result<(), Error> {
        let url = self.api_url(&format!("slide/{slide_id}/stop"))?;
        debug!(slide_id, "stopping slide");
        let _: serde_json::Value = self.post(url, &json!({})).await?;
        Ok(())
    }

    /// `POST slide/{id}/calibrate`
    pub async fn calibrate(&self, slide_id: i64) -> Result<(), Error> {
        let url = self.api_url(&format!("slide/{slide_id}/calibrate"))?;
        debug!(slide_id, "calibrating slide");
        let _: serde_json::Value = self.post(url, &json!({})).await?;
        Ok(())
    }
}
