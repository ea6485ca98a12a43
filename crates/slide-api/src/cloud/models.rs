// Cloud API response types
//
// Fields use `#[serde(default)]` liberally: the overview endpoint is the
// only source of truth for which keys are present, and a device that is
// offline answers with `code` instead of `pos`.

use serde::{Deserialize, Serialize};

/// Response body of `POST auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Response body of `GET slides/overview`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlidesOverview {
    #[serde(default)]
    pub slides: Vec<CloudSlide>,
}

/// One entry of the overview list.
///
/// `device_id` has the form `slide_<mac>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudSlide {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub device_info: Option<CloudDeviceInfo>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CloudSlide {
    /// The device MAC, i.e. `device_id` without its `slide_` prefix.
    pub fn mac(&self) -> Option<&str> {
        self.device_id
            .as_deref()
            .map(|id| id.strip_prefix("slide_").unwrap_or(id))
    }
}

/// Live state nested in a [`CloudSlide`]: either `pos` (reachable)
/// or `code` (the cloud could not reach the device).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudDeviceInfo {
    #[serde(default)]
    pub pos: Option<f64>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mac_strips_prefix() {
        let slide: CloudSlide = serde_json::from_value(json!({
            "device_id": "slide_300000000000",
            "id": 12,
            "device_name": "Living room",
            "device_info": { "pos": 0.5 }
        }))
        .unwrap();
        assert_eq!(slide.mac(), Some("300000000000"));
        assert_eq!(slide.device_info.unwrap().pos, Some(0.5));
    }

    #[test]
    fn offline_entry_carries_code() {
        let slide: CloudSlide = serde_json::from_value(json!({
            "device_id": "slide_aa",
            "id": 3,
            "device_name": "Bedroom",
            "device_info": { "code": 503, "message": "device offline" }
        }))
        .unwrap();
        let info = slide.device_info.unwrap();
        assert!(info.pos.is_none());
        assert_eq!(info.code, Some(json!(503)));
        assert!(info.extra.contains_key("message"));
    }

    #[test]
    fn missing_keys_deserialize_as_none() {
        let slide: CloudSlide = serde_json::from_value(json!({ "id": 9 })).unwrap();
        assert!(slide.device_id.is_none());
        assert!(slide.mac().is_none());
        assert!(slide.device_info.is_none());
    }
}
