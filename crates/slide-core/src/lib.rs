//! Cover model and controller lifecycle between `slide-api` and consumers.
//!
//! - **[`Controller`]**: Owns the integration state. Logs in to the cloud,
//!   sets up local devices, runs the periodic poll and routes [`Command`]s.
//!   Nothing is global; every handler receives the controller explicitly.
//!
//! - **[`CoverStore`]**: Lock-free reactive storage (`DashMap` +
//!   `tokio::sync::watch`) holding one [`Cover`] per device.
//!
//! - **[`resolve`]**: The position-to-status mapping with hysteresis
//!   near both endpoints.
//!
//! - **[`CoverStatus::on_intent`]**: Optimistic transition table applied
//!   when a command is issued, reconciled by the next poll.

pub mod command;
pub mod config;
pub mod controller;
mod convert;
pub mod error;
pub mod model;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::{
    CloudConfig, DEFAULT_OFFSET, DEFAULT_SCAN_INTERVAL, DEFAULT_SETUP_RETRY, DEFAULT_TIMEOUT,
    IntegrationConfig, LocalCoverConfig,
};
pub use controller::{ConnectionState, Controller};
pub use error::CoreError;
pub use store::CoverStore;
pub use stream::EntityStream;

pub use slide_api::{ApiVersion, DEFAULT_CLOUD_URL};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Cover, CoverBackend, CoverId, CoverStatus, LocalDeviceInfo, MotorStrength, MoveIntent,
    clamp_position, resolve,
};
