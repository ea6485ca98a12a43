// ── Motor strength presets ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

/// Named motor current presets accepted by local devices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MotorStrength {
    Light,
    Medium,
    Strong,
}

impl MotorStrength {
    /// `(max_current, calib_current)` in milliamps.
    pub fn currents(self) -> (u32, u32) {
        match self {
            Self::Light => (900, 850),
            Self::Medium => (1250, 1200),
            Self::Strong => (1500, 1450),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn preset_currents() {
        assert_eq!(MotorStrength::Light.currents(), (900, 850));
        assert_eq!(MotorStrength::Medium.currents(), (1250, 1200));
        assert_eq!(MotorStrength::Strong.currents(), (1500, 1450));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Strong".parse::<MotorStrength>().unwrap(), MotorStrength::Strong);
        assert!("turbo".parse::<MotorStrength>().is_err());
        assert_eq!(MotorStrength::VARIANTS, &["light", "medium", "strong"]);
    }
}
