// Local API HTTP client
//
// Keeps a registry of device hosts with their API version and password,
// and wraps `reqwest::Client` with RPC URL construction and status mapping.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Local API protocol revision reported by the device firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    /// Firmware 1.x: HTTP digest auth with the device password.
    V1,
    /// Firmware 2.x: unauthenticated.
    #[default]
    V2,
}

impl TryFrom<u8> for ApiVersion {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            other => Err(other),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("1"),
            Self::V2 => f.write_str("2"),
        }
    }
}

struct HostEntry {
    password: SecretString,
    api_version: ApiVersion,
}

/// Raw HTTP client for device-resident Slide APIs.
///
/// Hosts must be registered with [`add_host`](Self::add_host) before any
/// request; requests to unknown hosts fail with [`Error::UnknownHost`].
pub struct LocalClient {
    http: reqwest::Client,
    hosts: RwLock<HashMap<String, HostEntry>>,
}

impl LocalClient {
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http))
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            hosts: RwLock::new(HashMap::new()),
        }
    }

    /// Register (or re-register) a device host.
    pub fn add_host(&self, host: &str, password: SecretString, api_version: ApiVersion) {
        debug!(host, %api_version, "registering local slide");
        self.hosts.write().expect("host registry lock poisoned").insert(
            host.to_owned(),
            HostEntry {
                password,
                api_version,
            },
        );
    }

    /// Forget a device host. Returns `true` if it was registered.
    pub fn remove_host(&self, host: &str) -> bool {
        self.hosts
            .write()
            .expect("host registry lock poisoned")
            .remove(host)
            .is_some()
    }

    /// Build `http://{host}/rpc/{method}`.
    pub(crate) fn rpc_url(host: &str, method: &str) -> Result<Url, Error> {
        Url::parse(&format!("http://{host}/rpc/{method}")).map_err(Error::InvalidUrl)
    }

    /// Check the host is registered and speaks a supported protocol.
    fn check_host(&self, host: &str) -> Result<(), Error> {
        let hosts = self.hosts.read().expect("host registry lock poisoned");
        let entry = hosts.get(host).ok_or_else(|| Error::UnknownHost {
            host: host.to_owned(),
        })?;
        match entry.api_version {
            ApiVersion::V1 => Err(Error::UnsupportedOperation(
                "local API v1 (digest authentication)",
            )),
            ApiVersion::V2 => {
                if !entry.password.expose_secret().is_empty() {
                    trace!(host, "password ignored for local API v2");
                }
                Ok(())
            }
        }
    }

    /// Invoke an RPC method on a registered host and decode the reply.
    pub(crate) async fn rpc<T: DeserializeOwned>(
        &self,
        host: &str,
        method: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        self.check_host(host)?;
        let url = Self::rpc_url(host, method)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let text = resp.text().await.map_err(Error::Transport)?;
        trace!(host, method, %status, body = %text, "local response");

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: format!("device {host} rejected the request"),
            });
        }
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let text_ref = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text_ref).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: text,
        })
    }
}
