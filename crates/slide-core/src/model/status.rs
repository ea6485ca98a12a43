// ── Cover status and optimistic transitions ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Motion state of a cover as seen by consumers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CoverStatus {
    Open,
    Closed,
    Opening,
    Closing,
    /// No position has been observed yet.
    #[default]
    Unknown,
}

impl CoverStatus {
    /// Optimistic status after a command is issued, before the device
    /// reports back. The next poll reconciles it through [`resolve`].
    ///
    /// `position` is the last observed fraction (0 open, 1 closed).
    ///
    /// [`resolve`]: super::resolve
    pub fn on_intent(self, intent: MoveIntent, position: Option<f64>) -> Self {
        match (intent, position) {
            (MoveIntent::Open, _) => Self::Opening,
            (MoveIntent::Close, _) => Self::Closing,
            (MoveIntent::MoveTo(target), Some(current)) => {
                if target > current {
                    Self::Closing
                } else {
                    Self::Opening
                }
            }
            (MoveIntent::Stop | MoveIntent::MoveTo(_), _) => self,
        }
    }
}

/// Motion a command asks the device to perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveIntent {
    Open,
    Close,
    Stop,
    /// Target fraction in device orientation (0 open, 1 closed).
    MoveTo(f64),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn open_and_close_ignore_position() {
        for status in [CoverStatus::Open, CoverStatus::Closed, CoverStatus::Unknown] {
            assert_eq!(status.on_intent(MoveIntent::Open, None), CoverStatus::Opening);
            assert_eq!(status.on_intent(MoveIntent::Close, Some(0.3)), CoverStatus::Closing);
        }
    }

    #[test]
    fn stop_keeps_status() {
        assert_eq!(
            CoverStatus::Closing.on_intent(MoveIntent::Stop, Some(0.4)),
            CoverStatus::Closing
        );
    }

    #[test]
    fn move_to_compares_with_current_position() {
        let s = CoverStatus::Open;
        assert_eq!(s.on_intent(MoveIntent::MoveTo(0.8), Some(0.2)), CoverStatus::Closing);
        assert_eq!(s.on_intent(MoveIntent::MoveTo(0.1), Some(0.2)), CoverStatus::Opening);
        // Equal target counts as opening.
        assert_eq!(s.on_intent(MoveIntent::MoveTo(0.2), Some(0.2)), CoverStatus::Opening);
    }

    #[test]
    fn move_to_without_position_is_noop() {
        assert_eq!(
            CoverStatus::Unknown.on_intent(MoveIntent::MoveTo(0.5), None),
            CoverStatus::Unknown
        );
    }

    #[test]
    fn display_and_parse() {
        assert_eq!(CoverStatus::Closing.to_string(), "closing");
        assert_eq!("open".parse::<CoverStatus>().unwrap(), CoverStatus::Open);
    }
}
