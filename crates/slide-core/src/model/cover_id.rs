// ── Cover identity ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable identity of a cover.
///
/// Cloud covers use the device MAC (the `slide_` prefix of `device_id`
/// stripped); local covers use the `slide_id` reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoverId(String);

impl CoverId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CoverId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for CoverId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CoverId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
