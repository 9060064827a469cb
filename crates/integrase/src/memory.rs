use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{adapter::ListAdapter, config::ListConfig, types::Bot};

/// Where a bot stands on this list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReviewState {
    Pending,
    Claimed { reviewer: String },
    Approved,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedBot {
    pub bot: Bot,
    #[serde(flatten)]
    pub state: ReviewState,
}

/// In-process list backend. Keeps bots in memory only; everything is lost on
/// restart. Useful for trying out an integration and in tests.
pub struct MemoryAdapter {
    config: ListConfig,
    bots: RwLock<HashMap<String, ListedBot>>,
}

impl MemoryAdapter {
    pub fn new(config: ListConfig) -> Self {
        Self {
            config,
            bots: RwLock::new(HashMap::new()),
        }
    }

    /// Adds a bot in the `Pending` state, as if it had been submitted to
    /// this list directly.
    pub async fn insert_pending(&self, bot: Bot) {
        self.bots.write().await.insert(
            bot.bot_id.clone(),
            ListedBot {
                bot,
                state: ReviewState::Pending,
            },
        );
    }

    pub async fn get(&self, bot_id: &str) -> Option<ListedBot> {
        self.bots.read().await.get(bot_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.bots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bots.read().await.is_empty()
    }

    /// Moves an existing bot to `state`, refreshing its stored record.
    /// Unknown bots are left alone.
    async fn transition(&self, bot: &Bot, state: ReviewState) {
        let mut bots = self.bots.write().await;
        match bots.get_mut(&bot.bot_id) {
            Some(listed) => {
                listed.bot = bot.clone();
                listed.state = state;
            }
            None => debug!(bot_id = %bot.bot_id, "bot not on this list; ignoring"),
        }
    }
}

#[async_trait]
impl ListAdapter for MemoryAdapter {
    fn config(&self) -> ListConfig {
        self.config.clone()
    }

    async fn claim_bot(&self, bot: &Bot) -> anyhow::Result<()> {
        let state = ReviewState::Claimed {
            reviewer: bot.reviewer.clone(),
        };
        self.transition(bot, state).await;
        Ok(())
    }

    async fn unclaim_bot(&self, bot: &Bot) -> anyhow::Result<()> {
        self.transition(bot, ReviewState::Pending).await;
        Ok(())
    }

    async fn approve_bot(&self, bot: &Bot) -> anyhow::Result<()> {
        self.bots.write().await.insert(
            bot.bot_id.clone(),
            ListedBot {
                bot: bot.clone(),
                state: ReviewState::Approved,
            },
        );
        Ok(())
    }

    async fn deny_bot(&self, bot: &Bot) -> anyhow::Result<()> {
        self.transition(bot, ReviewState::Denied).await;
        Ok(())
    }

    async fn data_request(&self, bot_id: &str) -> anyhow::Result<serde_json::Value> {
        let listed = self
            .get(bot_id)
            .await
            .ok_or_else(|| anyhow!("bot {bot_id} is not on this list"))?;
        Ok(serde_json::to_value(listed)?)
    }

    async fn data_delete(&self, bot_id: &str) -> anyhow::Result<()> {
        match self.bots.write().await.remove(bot_id) {
            Some(_) => Ok(()),
            None => Err(anyhow!("bot {bot_id} is not on this list")),
        }
    }
}
