use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::config::{ListConfig, SecretKey};
use crate::types::{ListPatch, ListPatchResponse};

/// Every directory call gives up after this long.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The directory answered with a non-2xx status. Displays the raw body.
    #[error("{body}")]
    Rejected { status: StatusCode, body: String },

    #[error("directory request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode directory response: {0}")]
    Decode(#[from] serde_json::Error),
}

// ── DirectoryClient ──────────────────────────────────────────────────────────

/// Client for the directory's per-list endpoint.
#[derive(Clone)]
pub struct DirectoryClient {
    client: reqwest::Client,
    endpoint: String,
    secret_key: SecretKey,
}

impl DirectoryClient {
    pub fn new(
        api_url: &str,
        list_id: &str,
        secret_key: SecretKey,
    ) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: list_endpoint(api_url, list_id),
            secret_key,
        })
    }

    pub fn from_config(cfg: &ListConfig) -> Result<Self, DirectoryError> {
        Self::new(&cfg.api_url, &cfg.list_id, cfg.secret_key.clone())
    }

    /// `{api_url}/lists/{list_id}`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one PATCH to the list's endpoint. Never retried.
    pub async fn patch_list(&self, patch: &ListPatch) -> Result<ListPatchResponse, DirectoryError> {
        let body = serde_json::to_vec(patch)?;

        let resp = self
            .client
            .patch(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", self.secret_key.expose())
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        debug!(endpoint = %self.endpoint, %status, "directory answered list patch");

        if !status.is_success() {
            return Err(DirectoryError::Rejected {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// One-shot [`DirectoryClient::patch_list`] using the list's own config.
pub async fn patch_list(
    cfg: &ListConfig,
    patch: &ListPatch,
) -> Result<ListPatchResponse, DirectoryError> {
    DirectoryClient::from_config(cfg)?.patch_list(patch).await
}

fn list_endpoint(api_url: &str, list_id: &str) -> String {
    format!("{}/lists/{}", api_url.trim_end_matches('/'), list_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_inserts_single_slash() {
        assert_eq!(
            list_endpoint("https://catnip.metrobots.xyz", "abc"),
            "https://catnip.metrobots.xyz/lists/abc"
        );
        assert_eq!(
            list_endpoint("https://catnip.metrobots.xyz/", "abc"),
            "https://catnip.metrobots.xyz/lists/abc"
        );
    }

    #[test]
    fn client_targets_list_endpoint() {
        let client =
            DirectoryClient::new("http://localhost:4000/", "abc", SecretKey::new("k")).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:4000/lists/abc");
    }

    #[test]
    fn rejected_displays_raw_body() {
        let err = DirectoryError::Rejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "boom");
    }
}
