// Local API client modules
//
// JSON-RPC style endpoints served by the device itself at
// `http://{host}/rpc/{method}`. One client serves any number of hosts.

pub mod client;
pub mod models;
pub mod slides;

pub use client::{ApiVersion, LocalClient};
