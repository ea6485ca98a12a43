// slide-api: Async Rust client for the Slide cloud and local APIs

pub mod cloud;
pub mod error;
pub mod local;
pub mod transport;

pub use cloud::{CloudClient, DEFAULT_CLOUD_URL};
pub use error::Error;
pub use local::{ApiVersion, LocalClient};
pub use transport::TransportConfig;
