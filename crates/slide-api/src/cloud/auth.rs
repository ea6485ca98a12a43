// Cloud API authentication
//
// Email/password login yielding a bearer token. Token refresh is not
// handled here: callers log in again when a call fails with
// `Error::SessionExpired`.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::cloud::client::CloudClient;
use crate::cloud::models::LoginResponse;
use crate::error::Error;

impl CloudClient {
    /// Authenticate with the cloud using account credentials.
    ///
    /// `POST auth/login` with `{"email", "password"}`. On success the bearer
    /// token is stored and used for all subsequent requests.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.api_url("auth/login")?;
        debug!("logging in at {}", url);

        let body = json!({
            "email": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .header("X-Requested-With", "XMLHttpRequest")
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if matches!(status.as_u16(), 401 | 403 | 422) {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login rejected (HTTP {status}): {body}"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let login: LoginResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        debug!(expires_at = ?login.expires_at, "login successful");
        self.set_token(Some(login.access_token));
        Ok(())
    }

    /// End the current session and drop the token.
    ///
    /// The token is cleared even if the logout request fails.
    pub async fn logout(&self) -> Result<(), Error> {
        if !self.is_authenticated() {
            return Ok(());
        }
        let url = self.api_url("auth/logout")?;
        debug!("logging out at {}", url);
        let result: Result<serde_json::Value, Error> = self.post(url, &json!({})).await;
        self.set_token(None);
        result.map(|_| ())
    }
}
