use std::fmt;

use async_trait::async_trait;

use crate::config::ListConfig;
use crate::types::Bot;

/// Everything a bot list has to provide to receive directory events.
///
/// One implementing type per list backend. The shim holds it as
/// `Arc<dyn ListAdapter>` and calls it concurrently from request tasks, so
/// implementations guard their own storage.
#[async_trait]
pub trait ListAdapter: Send + Sync {
    /// The list's configuration. Must not have side effects.
    fn config(&self) -> ListConfig;

    /// Claims the bot if the list has it. Must not add the bot otherwise.
    async fn claim_bot(&self, bot: &Bot) -> anyhow::Result<()>;

    /// Unclaims the bot if the list has it. Must not add the bot otherwise.
    async fn unclaim_bot(&self, bot: &Bot) -> anyhow::Result<()>;

    /// Approves the bot, adding it to the list if it is not there yet.
    async fn approve_bot(&self, bot: &Bot) -> anyhow::Result<()>;

    /// Denies the bot if the list has it. Must not add the bot otherwise.
    async fn deny_bot(&self, bot: &Bot) -> anyhow::Result<()>;

    /// Everything the list stores about the bot, as arbitrary JSON.
    async fn data_request(&self, bot_id: &str) -> anyhow::Result<serde_json::Value>;

    /// Deletes the bot and everything associated with it.
    async fn data_delete(&self, bot_id: &str) -> anyhow::Result<()>;
}

/// The four review events the directory pushes with a full [`Bot`] body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Claim,
    Unclaim,
    Approve,
    Deny,
}

impl Lifecycle {
    pub const ALL: [Lifecycle; 4] = [
        Lifecycle::Claim,
        Lifecycle::Unclaim,
        Lifecycle::Approve,
        Lifecycle::Deny,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Lifecycle::Claim => "/claim",
            Lifecycle::Unclaim => "/unclaim",
            Lifecycle::Approve => "/approve",
            Lifecycle::Deny => "/deny",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Lifecycle::Claim => "claim",
            Lifecycle::Unclaim => "unclaim",
            Lifecycle::Approve => "approve",
            Lifecycle::Deny => "deny",
        }
    }

    /// Calls the adapter method this event maps to.
    pub async fn dispatch(self, adapter: &dyn ListAdapter, bot: &Bot) -> anyhow::Result<()> {
        match self {
            Lifecycle::Claim => adapter.claim_bot(bot).await,
            Lifecycle::Unclaim => adapter.unclaim_bot(bot).await,
            Lifecycle::Approve => adapter.approve_bot(bot).await,
            Lifecycle::Deny => adapter.deny_bot(bot).await,
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
