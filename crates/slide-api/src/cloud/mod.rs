// Cloud API client modules
//
// Hand-written client for the vendor-hosted Slide API. A bearer token from
// `auth/login` authorizes every other call; the client holds it internally.

pub mod auth;
pub mod client;
pub mod models;
pub mod slides;

pub use client::{CloudClient, DEFAULT_CLOUD_URL};
