use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::types::DEFAULT_API_URL;

/// Address bound by [`crate::serve`] when the config leaves it unset.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("list ID not set")]
    MissingListId,
    #[error("secret key not set")]
    MissingSecretKey,
    #[error("invalid domain name {domain:?}: {reason}")]
    InvalidDomain { domain: String, reason: String },
}

// ── SecretKey ────────────────────────────────────────────────────────────────

/// Shared secret the directory sends in the `Authorization` header.
/// Wiped from memory on drop and never printed.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

impl From<String> for SecretKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for SecretKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

// ── ListConfig ───────────────────────────────────────────────────────────────

/// Configuration of one bot list. Loaded once at startup, read-only after.
#[derive(Debug, Clone)]
pub struct ListConfig {
    /// List ID issued by the directory (required).
    pub list_id: String,
    /// Secret key issued by the directory (required).
    pub secret_key: SecretKey,
    /// Public base URL of this list. When unset, self-registration is skipped.
    pub domain_name: Option<String>,
    pub startup_logs: bool,
    pub request_logs: bool,
    pub bind_addr: Option<String>,
    /// Base URL of the directory; `/lists/{list_id}` is appended to it.
    pub api_url: String,
}

impl ListConfig {
    pub fn new(list_id: impl Into<String>, secret_key: impl Into<SecretKey>) -> Self {
        Self {
            list_id: list_id.into(),
            secret_key: secret_key.into(),
            domain_name: None,
            startup_logs: false,
            request_logs: false,
            bind_addr: None,
            api_url: DEFAULT_API_URL.to_owned(),
        }
    }

    /// Reads `INTEGRASE_*` environment variables. Missing required values are
    /// left empty and surface later through [`ListConfig::validate`].
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from `INTEGRASE_*` keys resolved through `lookup`.
    /// Blank values count as unset; flags accept `1` or `true`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let flag = |name: &str| {
            var(name)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false)
        };

        Self {
            list_id: var("INTEGRASE_LIST_ID").unwrap_or_default(),
            secret_key: var("INTEGRASE_SECRET_KEY").unwrap_or_default().into(),
            domain_name: var("INTEGRASE_DOMAIN"),
            startup_logs: flag("INTEGRASE_STARTUP_LOGS"),
            request_logs: flag("INTEGRASE_REQUEST_LOGS"),
            bind_addr: var("INTEGRASE_BIND_ADDR"),
            api_url: var("INTEGRASE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain_name = Some(domain.into());
        self
    }

    pub fn with_bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = Some(addr.into());
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_startup_logs(mut self, on: bool) -> Self {
        self.startup_logs = on;
        self
    }

    pub fn with_request_logs(mut self, on: bool) -> Self {
        self.request_logs = on;
        self
    }

    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.list_id.trim().is_empty() {
            return Err(ConfigError::MissingListId);
        }
        if self.secret_key.is_empty() {
            return Err(ConfigError::MissingSecretKey);
        }
        Ok(())
    }
}

/// The domain is turned into route URLs handed to the directory, so it has to
/// be an absolute http(s) URL. Only self-registration depends on it.
pub fn validate_domain(domain: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidDomain {
        domain: domain.to_owned(),
        reason: reason.to_owned(),
    };

    let uri: http::Uri = domain.parse().map_err(|_| invalid("not a valid URL"))?;

    match uri.scheme_str() {
        Some("http") | Some("https") => {}
        _ => return Err(invalid("scheme must be http or https")),
    }
    if uri.host().is_none() {
        return Err(invalid("missing host"));
    }
    Ok(())
}
