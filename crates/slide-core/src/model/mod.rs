// ── Cover domain model ──
//
// Every type in this module is the canonical representation of a Slide
// curtain, regardless of whether it is reached through the cloud or the
// local network API. Consumers (CLI) depend only on these types.

pub mod cover;
pub mod cover_id;
pub mod position;
pub mod status;
pub mod strength;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use slide_core::model::*` gives you everything.

pub use cover::{Cover, CoverBackend, LocalDeviceInfo};
pub use cover_id::CoverId;
pub use position::{clamp_position, resolve};
pub use status::{CoverStatus, MoveIntent};
pub use strength::MotorStrength;
