// ── Cover domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cover_id::CoverId;
use super::position::resolve;
use super::status::{CoverStatus, MoveIntent};
use crate::config::DEFAULT_OFFSET;

/// How a cover is reached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CoverBackend {
    /// Through the vendor cloud, addressed by its numeric id.
    Cloud { slide_id: i64 },
    /// Directly on the local network.
    Local { host: String },
}

impl CoverBackend {
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local { .. })
    }

    /// Secondary lookup key: `cloud:{id}` or `local:{host}`.
    pub fn alias(&self) -> String {
        match self {
            Self::Cloud { slide_id } => format!("cloud:{slide_id}"),
            Self::Local { host } => format!("local:{host}"),
        }
    }
}

/// Hardware details reported by `Slide.GetInfo` on local devices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDeviceInfo {
    pub mac: Option<String>,
    pub board_rev: Option<i64>,
    pub device_name: Option<String>,
    pub zone_name: Option<String>,
    pub curtain_type: Option<i64>,
    pub calib_time: Option<i64>,
}

/// A single motorized curtain.
///
/// `position` is in device orientation: 0 is fully open, 1 fully closed.
/// Use [`current_position_percent`](Self::current_position_percent) for the
/// user-facing value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cover {
    pub id: CoverId,
    pub name: String,
    pub backend: CoverBackend,
    pub position: Option<f64>,
    pub status: CoverStatus,
    pub online: bool,
    pub touch_go: Option<bool>,
    pub invert_position: bool,
    pub device: Option<LocalDeviceInfo>,
    pub updated_at: DateTime<Utc>,

    /// Hysteresis band used for status and presentation snapping.
    #[serde(skip, default = "default_offset")]
    pub(crate) offset: f64,
}

fn default_offset() -> f64 {
    DEFAULT_OFFSET
}

impl Cover {
    /// A cover with no observed state yet.
    pub fn new(id: CoverId, name: impl Into<String>, backend: CoverBackend) -> Self {
        Self {
            id,
            name: name.into(),
            backend,
            position: None,
            status: CoverStatus::Unknown,
            online: false,
            touch_go: None,
            invert_position: false,
            device: None,
            updated_at: Utc::now(),
            offset: DEFAULT_OFFSET,
        }
    }

    #[must_use]
    pub fn with_invert_position(mut self, invert: bool) -> Self {
        self.invert_position = invert;
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_local(&self) -> bool {
        self.backend.is_local()
    }

    /// `None` while the status is unknown.
    pub fn is_closed(&self) -> Option<bool> {
        match self.status {
            CoverStatus::Unknown => None,
            status => Some(status == CoverStatus::Closed),
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Record a fresh device reading: clamp, resolve status, mark online.
    pub fn observe(&mut self, raw: f64) {
        let (pos, status) = resolve(self.position, raw, self.offset);
        self.position = Some(pos);
        self.status = status;
        self.online = true;
        self.touch();
    }

    /// Apply the optimistic status for an issued command.
    pub fn apply_intent(&mut self, intent: MoveIntent) {
        self.status = self.status.on_intent(intent, self.position);
        self.touch();
    }

    pub fn set_online(&mut self, online: bool) {
        if self.online != online {
            self.online = online;
            self.touch();
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // ── Presentation ─────────────────────────────────────────────────

    /// Position as a percentage where 100 is fully open, or fully closed
    /// when `invert_position` is set. Readings within `offset` of either
    /// end snap to that end.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn current_position_percent(&self) -> Option<u8> {
        let mut pos = self.position?;
        if 1.0 - pos <= self.offset || pos <= self.offset {
            pos = pos.round();
        }
        if !self.invert_position {
            pos = 1.0 - pos;
        }
        Some((pos * 100.0).floor().clamp(0.0, 100.0) as u8)
    }

    /// Device-orientation fraction for a user-facing percentage.
    pub fn target_fraction(&self, percent: u8) -> f64 {
        let fraction = f64::from(percent) / 100.0;
        if self.invert_position { fraction } else { 1.0 - fraction }
    }
}
