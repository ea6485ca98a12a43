// Cloud API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token injection and
// status mapping. Endpoint groups (auth, slides) are implemented as inherent
// methods in separate files to keep this module focused on transport.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Production endpoint of the vendor cloud.
pub const DEFAULT_CLOUD_URL: &str = "https://api.goslide.io/api/";

/// Raw HTTP client for the Slide cloud API.
///
/// Every call except `login` requires the bearer token captured by
/// [`login`](Self::login). The token is swapped atomically so a shared
/// client can be used from the poll and command tasks at once.
pub struct CloudClient {
    http: reqwest::Client,
    base_url: Url,
    token: ArcSwapOption<String>,
}

impl CloudClient {
    /// Create a new cloud client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a cloud client with a pre-built `reqwest::Client`.
    ///
    /// A missing trailing slash is added so relative endpoint paths join
    /// below the base path instead of replacing its last segment.
    pub fn with_client(http: reqwest::Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http,
            base_url,
            token: ArcSwapOption::empty(),
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a bearer token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.token.load().is_some()
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn set_token(&self, token: Option<String>) {
        self.token.store(token.map(Arc::new));
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path relative to the base.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn authorized(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        let guard = self.token.load();
        let token = guard.as_ref().ok_or(Error::SessionExpired)?;
        Ok(builder
            .bearer_auth(token.as_str())
            .header("X-Requested-With", "XMLHttpRequest"))
    }

    /// Send an authorized GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self
            .authorized(self.http.get(url))?
            .send()
            .await
            .map_err(Error::Transport)?;
        parse_response(resp).await
    }

    /// Send an authorized POST request with a JSON body and decode the reply.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .authorized(self.http.post(url).json(body))?
            .send()
            .await
            .map_err(Error::Transport)?;
        parse_response(resp).await
    }
}

/// Map HTTP status to errors, then decode the JSON body.
async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::SessionExpired);
    }

    let body = resp.text().await.map_err(Error::Transport)?;
    trace!(%status, body = %body, "cloud response");

    if !status.is_success() {
        return Err(Error::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    // Command endpoints may answer with an empty body.
    let body_ref = if body.trim().is_empty() { "null" } else { body.as_str() };
    serde_json::from_str(body_ref).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}
