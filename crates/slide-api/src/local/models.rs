// Local API response types

use serde::{Deserialize, Serialize};

/// Response body of `Slide.GetInfo`.
///
/// ```json
/// { "slide_id": "slide_300000000000", "mac": "300000000000", "board_rev": 1,
///   "device_name": "", "zone_name": "", "curtain_type": 0,
///   "calib_time": 10239, "pos": 0.0, "touch_go": true }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlideInfo {
    #[serde(default)]
    pub slide_id: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub board_rev: Option<i64>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub zone_name: Option<String>,
    #[serde(default)]
    pub curtain_type: Option<i64>,
    #[serde(default)]
    pub calib_time: Option<i64>,
    #[serde(default)]
    pub pos: Option<f64>,
    #[serde(default)]
    pub touch_go: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_info_payload() {
        let info: SlideInfo = serde_json::from_value(json!({
            "slide_id": "slide_300000000000",
            "mac": "300000000000",
            "board_rev": 1,
            "device_name": "",
            "zone_name": "",
            "curtain_type": 0,
            "calib_time": 10239,
            "pos": 0.0,
            "touch_go": true
        }))
        .unwrap();
        assert_eq!(info.slide_id.as_deref(), Some("slide_300000000000"));
        assert_eq!(info.calib_time, Some(10239));
        assert_eq!(info.touch_go, Some(true));
        assert!(info.extra.is_empty());
    }

    #[test]
    fn unexpected_payload_keeps_extras() {
        let info: SlideInfo = serde_json::from_value(json!({ "error": "busy" })).unwrap();
        assert!(info.pos.is_none());
        assert_eq!(info.extra.get("error"), Some(&json!("busy")));
    }
}
