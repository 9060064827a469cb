//! Exercise a [`ListAdapter`] without the directory: feed it a sample bot
//! through each lifecycle event and collect what happened.

use tracing::{info, warn};

use crate::{
    adapter::{Lifecycle, ListAdapter},
    types::Bot,
};

/// A fully populated bot for trying out adapters.
pub fn default_bot() -> Bot {
    let blurb = "Metro Reviews is a test bot. It exists purely for integration testing.";
    Bot {
        bot_id: "968734728465289248".into(),
        reviewer: "510065483693817867".into(),
        username: "Metro Reviews".into(),
        description: blurb.into(),
        long_description: format!("{blurb}\n\n").repeat(100),
        nsfw: true,
        tags: vec!["Utility".into(), "Moderation".into()],
        owner: "728871946456137770".into(),
        extra_owners: vec!["564164277251080208".into()],
        list_source: "3b50d5e8-d0a0-4e63-aff7-f81068e9ad36".into(),
        reason: Some("Test reason".into()),
        review_note: Some("This bot is purely for testing purposes. It is not a real bot.".into()),
        cross_add: Some(true),
        limited: false,
        website: Some("https://metroreviews.xyz".into()),
        github: Some("https://github.com/MetroReviews".into()),
        support: Some("https://discord.gg/49DE35a5eJ".into()),
        invite: Some(
            "https://discord.com/api/oauth2/authorize?client_id=968734728465289248&permissions=8&scope=bot%20applications.commands"
                .into(),
        ),
        ..Default::default()
    }
}

/// Outcome of one lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub event: Lifecycle,
    pub result: Result<(), String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestReport {
    pub steps: Vec<StepOutcome>,
}

impl TestReport {
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|s| s.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| s.result.is_err())
    }
}

pub struct Tester<A> {
    pub adapter: A,
    pub bot: Bot,
}

impl<A: ListAdapter> Tester<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            bot: default_bot(),
        }
    }

    pub fn with_bot(mut self, bot: Bot) -> Self {
        self.bot = bot;
        self
    }

    /// Runs one event against the adapter.
    pub async fn run(&self, event: Lifecycle) -> StepOutcome {
        let result = event
            .dispatch(&self.adapter, &self.bot)
            .await
            .map_err(|e| format!("{e:#}"));

        match &result {
            Ok(()) => info!(%event, bot_id = %self.bot.bot_id, "adapter accepted event"),
            Err(error) => warn!(%event, bot_id = %self.bot.bot_id, %error, "adapter rejected event"),
        }

        StepOutcome { event, result }
    }

    /// Runs claim, unclaim, approve and deny in that order.
    pub async fn run_all(&self) -> TestReport {
        let mut report = TestReport::default();
        for event in Lifecycle::ALL {
            report.steps.push(self.run(event).await);
        }
        report
    }
}
