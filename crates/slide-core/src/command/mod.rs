// ── Command API ──
//
// All write operations flow through a unified `Command` enum.
// The controller routes each variant to the backend that owns the cover
// (cloud or local) after applying the optimistic status.

use std::sync::Arc;

use crate::error::CoreError;
use crate::model::{Cover, CoverId, MotorStrength};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// All write operations against a cover.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ── Motion ───────────────────────────────────────────────────────
    Open { id: CoverId },
    Close { id: CoverId },
    Stop { id: CoverId },
    /// User-facing percentage, 0..=100. Orientation follows the cover's
    /// `invert_position` flag.
    SetPosition { id: CoverId, percent: u8 },

    // ── Maintenance ──────────────────────────────────────────────────
    Calibrate { id: CoverId },

    // ── Local-only settings ──────────────────────────────────────────
    SetMotorStrength { id: CoverId, strength: MotorStrength },
    SetTouchGo { id: CoverId, enabled: bool },
}

impl Command {
    /// The cover this command targets.
    pub fn cover_id(&self) -> &CoverId {
        match self {
            Self::Open { id }
            | Self::Close { id }
            | Self::Stop { id }
            | Self::SetPosition { id, .. }
            | Self::Calibrate { id }
            | Self::SetMotorStrength { id, .. }
            | Self::SetTouchGo { id, .. } => id,
        }
    }

    /// Short verb for logs and messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Open { .. } => "open",
            Self::Close { .. } => "close",
            Self::Stop { .. } => "stop",
            Self::SetPosition { .. } => "set-position",
            Self::Calibrate { .. } => "calibrate",
            Self::SetMotorStrength { .. } => "strength",
            Self::SetTouchGo { .. } => "touch-go",
        }
    }

    /// Whether only local devices support this command.
    pub fn is_local_only(&self) -> bool {
        matches!(self, Self::SetMotorStrength { .. } | Self::SetTouchGo { .. })
    }
}

/// Outcome of a successfully dispatched command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// The cover as stored after the command, including any optimistic
    /// status change.
    pub cover: Arc<Cover>,
}
