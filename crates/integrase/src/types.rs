use serde::{Deserialize, Serialize};

/// Base URL of the central directory service.
pub const DEFAULT_API_URL: &str = "https://catnip.metrobots.xyz";

// ── Bot ──────────────────────────────────────────────────────────────────────

/// A bot as pushed by the directory on every lifecycle event.
///
/// Fields missing from the incoming JSON fall back to their defaults, so
/// directories that omit e.g. `tags` for non-cross-added bots still decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bot {
    pub bot_id: String,
    pub reviewer: String,
    pub username: String,
    pub description: String,
    pub long_description: String,
    pub nsfw: bool,
    /// Empty unless the bot is cross-added.
    pub tags: Vec<String>,
    pub owner: String,
    pub extra_owners: Vec<String>,
    pub list_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_note: Option<String>,
    /// In rare cases the directory does not set this at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_add: Option<bool>,
    pub limited: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite: Option<String>,
}

// ── List patch ───────────────────────────────────────────────────────────────

/// Partial update of a list's registration at the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_bot_api: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unclaim_bot_api: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approve_bot_api: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny_bot_api: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_request_api: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_deletion_api: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reset_secret_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ListPatch {
    /// Patch announcing every integrase route served under `domain`.
    pub fn for_domain(domain: &str) -> Self {
        let base = domain.trim_end_matches('/');
        let url = |path: &str| Some(format!("{base}{path}"));
        Self {
            claim_bot_api: url("/claim"),
            unclaim_bot_api: url("/unclaim"),
            approve_bot_api: url("/approve"),
            deny_bot_api: url("/deny"),
            data_request_api: url("/data-request"),
            data_deletion_api: url("/data-delete"),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Directory answer to a [`ListPatch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPatchResponse {
    #[serde(default)]
    pub has_updated: Vec<String>,
    /// Present only when the patch asked for `reset_secret_key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
}
