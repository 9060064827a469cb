#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::bail;
use async_trait::async_trait;
use integrase::{Bot, Lifecycle, ListAdapter, ListConfig};
use serde_json::json;

pub const SECRET: &str = "test-secret-key";
pub const LIST_ID: &str = "test-list";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Lifecycle(Lifecycle, Bot),
    DataRequest(String),
    DataDelete(String),
}

/// Adapter that records every call and optionally fails all of them.
pub struct RecordingAdapter {
    pub config: ListConfig,
    pub fail_with: Option<String>,
    pub calls: Mutex<Vec<Call>>,
}

impl RecordingAdapter {
    pub fn new(config: ListConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(config: ListConfig, message: &str) -> Arc<Self> {
        Arc::new(Self {
            config,
            fail_with: Some(message.to_owned()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(call);
        match &self.fail_with {
            Some(msg) => bail!("{msg}"),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ListAdapter for RecordingAdapter {
    fn config(&self) -> ListConfig {
        self.config.clone()
    }

    async fn claim_bot(&self, bot: &Bot) -> anyhow::Result<()> {
        self.record(Call::Lifecycle(Lifecycle::Claim, bot.clone()))
    }

    async fn unclaim_bot(&self, bot: &Bot) -> anyhow::Result<()> {
        self.record(Call::Lifecycle(Lifecycle::Unclaim, bot.clone()))
    }

    async fn approve_bot(&self, bot: &Bot) -> anyhow::Result<()> {
        self.record(Call::Lifecycle(Lifecycle::Approve, bot.clone()))
    }

    async fn deny_bot(&self, bot: &Bot) -> anyhow::Result<()> {
        self.record(Call::Lifecycle(Lifecycle::Deny, bot.clone()))
    }

    async fn data_request(&self, bot_id: &str) -> anyhow::Result<serde_json::Value> {
        self.record(Call::DataRequest(bot_id.to_owned()))?;
        Ok(json!({ "bot_id": bot_id, "votes": 12 }))
    }

    async fn data_delete(&self, bot_id: &str) -> anyhow::Result<()> {
        self.record(Call::DataDelete(bot_id.to_owned()))
    }
}

pub fn config() -> ListConfig {
    ListConfig::new(LIST_ID, SECRET)
}
