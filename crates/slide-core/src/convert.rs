// ── API-to-domain conversions ──
//
// Bridges raw `slide_api` payloads into observations the store applies.
// Both APIs return loosely-shaped JSON, so every field is optional on the
// wire and validated here.

use slide_api::cloud::models::CloudSlide;
use slide_api::local::models::SlideInfo;

use crate::model::{CoverId, LocalDeviceInfo};

// ── Cloud ──────────────────────────────────────────────────────────

/// What the cloud reported for one slide.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CloudReading {
    /// Device online with a position fraction.
    Position(f64),
    /// Cloud could not reach the device; carries the reported code.
    Offline { code: String },
    /// `device_info` present but neither `pos` nor `code`.
    Invalid,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CloudObservation {
    pub id: CoverId,
    pub slide_id: i64,
    pub name: String,
    pub reading: CloudReading,
}

/// Why an overview entry was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SkippedEntry {
    MissingDeviceId,
    MissingId { device_id: String },
    MissingDeviceInfo { device_id: String },
}

impl TryFrom<&CloudSlide> for CloudObservation {
    type Error = SkippedEntry;

    fn try_from(slide: &CloudSlide) -> Result<Self, Self::Error> {
        let mac = slide.mac().ok_or(SkippedEntry::MissingDeviceId)?;
        let slide_id = slide.id.ok_or_else(|| SkippedEntry::MissingId {
            device_id: mac.to_owned(),
        })?;
        let info = slide
            .device_info
            .as_ref()
            .ok_or_else(|| SkippedEntry::MissingDeviceInfo {
                device_id: mac.to_owned(),
            })?;

        let reading = match (info.pos, &info.code) {
            (Some(pos), _) => CloudReading::Position(pos),
            (None, Some(code)) => CloudReading::Offline {
                code: match code {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            },
            (None, None) => CloudReading::Invalid,
        };

        Ok(Self {
            id: CoverId::new(mac),
            slide_id,
            name: slide
                .device_name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| mac.to_owned()),
            reading,
        })
    }
}

// ── Local ──────────────────────────────────────────────────────────

/// Parsed `Slide.GetInfo` reply.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LocalObservation {
    pub id: Option<CoverId>,
    pub position: Option<f64>,
    pub touch_go: Option<bool>,
    pub device: LocalDeviceInfo,
}

impl From<SlideInfo> for LocalObservation {
    fn from(info: SlideInfo) -> Self {
        Self {
            id: info.slide_id.filter(|s| !s.is_empty()).map(CoverId::from),
            position: info.pos,
            touch_go: info.touch_go,
            device: LocalDeviceInfo {
                mac: info.mac,
                board_rev: info.board_rev,
                device_name: info.device_name,
                zone_name: info.zone_name,
                curtain_type: info.curtain_type,
                calib_time: info.calib_time,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn slide(value: serde_json::Value) -> CloudSlide {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn online_cloud_slide() {
        let obs = CloudObservation::try_from(&slide(json!({
            "device_id": "slide_300000000000",
            "id": 12,
            "device_name": "Living room",
            "device_info": { "pos": 0.42 }
        })))
        .unwrap();
        assert_eq!(
            obs,
            CloudObservation {
                id: CoverId::from("300000000000"),
                slide_id: 12,
                name: "Living room".into(),
                reading: CloudReading::Position(0.42),
            }
        );
    }

    #[test]
    fn offline_cloud_slide_keeps_code() {
        let obs = CloudObservation::try_from(&slide(json!({
            "device_id": "slide_aa",
            "id": 3,
            "device_info": { "code": 503 }
        })))
        .unwrap();
        assert_eq!(obs.reading, CloudReading::Offline { code: "503".into() });
        assert_eq!(obs.name, "aa");
    }

    #[test]
    fn empty_device_info_is_invalid() {
        let obs = CloudObservation::try_from(&slide(json!({
            "device_id": "slide_aa",
            "id": 3,
            "device_info": {}
        })))
        .unwrap();
        assert_eq!(obs.reading, CloudReading::Invalid);
    }

    #[test]
    fn incomplete_entries_are_skipped() {
        assert_eq!(
            CloudObservation::try_from(&slide(json!({ "id": 1 }))),
            Err(SkippedEntry::MissingDeviceId)
        );
        assert_eq!(
            CloudObservation::try_from(&slide(json!({ "device_id": "slide_bb", "id": 1 }))),
            Err(SkippedEntry::MissingDeviceInfo {
                device_id: "bb".into()
            })
        );
        assert_eq!(
            CloudObservation::try_from(&slide(json!({
                "device_id": "slide_bb",
                "device_info": { "pos": 0.0 }
            }))),
            Err(SkippedEntry::MissingId {
                device_id: "bb".into()
            })
        );
    }

    #[test]
    fn local_info_maps_all_fields() {
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
        let obs = LocalObservation::from(info);
        assert_eq!(obs.id, Some(CoverId::from("slide_300000000000")));
        assert_eq!(obs.position, Some(0.0));
        assert_eq!(obs.touch_go, Some(true));
        assert_eq!(obs.device.calib_time, Some(10239));
        assert_eq!(obs.device.mac.as_deref(), Some("300000000000"));
    }

    #[test]
    fn local_info_without_id() {
        let obs = LocalObservation::from(SlideInfo::default());
        assert!(obs.id.is_none());
        assert!(obs.position.is_none());
    }
}
