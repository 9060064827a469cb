use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use integrase::{tester::default_bot, Lifecycle, ListConfig, ListPatch, MemoryAdapter};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── CLI definition ─────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "integrased",
    about = "Integrased — run, register and exercise an integrase bot list",
    version
)]
struct Cli {
    /// Log level: error, warn, info, debug, verbose (default: $INTEGRASE_LOG_LEVEL or info)
    #[arg(long, global = true, env = "INTEGRASE_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the integrase routes backed by an in-memory list
    Serve {
        #[arg(long, env = "INTEGRASE_LIST_ID")]
        list_id: String,
        #[arg(long, env = "INTEGRASE_SECRET_KEY", hide_env_values = true)]
        secret_key: String,
        /// Public base URL of this list; enables self-registration at the directory
        #[arg(long, env = "INTEGRASE_DOMAIN")]
        domain: Option<String>,
        #[arg(long, env = "INTEGRASE_BIND_ADDR", default_value = integrase::config::DEFAULT_BIND_ADDR)]
        bind: String,
        #[arg(long, env = "INTEGRASE_API_URL", default_value = integrase::DEFAULT_API_URL)]
        api_url: String,
        /// Log every request (accepts 1/0, true/false, yes/no, on/off)
        #[arg(
            long,
            env = "INTEGRASE_REQUEST_LOGS",
            action = ArgAction::Set,
            num_args = 0..=1,
            default_value = "false",
            default_missing_value = "true",
            value_parser = BoolishValueParser::new()
        )]
        request_logs: bool,
    },
    /// Update the list's registration at the directory
    Patch {
        #[arg(long, env = "INTEGRASE_LIST_ID")]
        list_id: String,
        #[arg(long, env = "INTEGRASE_SECRET_KEY", hide_env_values = true)]
        secret_key: String,
        #[arg(long, env = "INTEGRASE_API_URL", default_value = integrase::DEFAULT_API_URL)]
        api_url: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        /// Announce every route served under this base URL
        #[arg(long)]
        domain: Option<String>,
        /// Ask the directory for a new secret key
        #[arg(long)]
        reset_secret_key: bool,
    },
    /// Play the directory: push the sample bot through a running list
    Simulate {
        /// Base URL of the list, e.g. http://localhost:8080
        #[arg(long)]
        target: String,
        #[arg(long, env = "INTEGRASE_SECRET_KEY", hide_env_values = true)]
        secret_key: String,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let raw = cli.log_level.unwrap_or_else(|| "info".into());
    let level = if raw.eq_ignore_ascii_case("verbose") {
        "debug".to_owned()
    } else {
        raw
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&level))
        .init();

    match cli.command {
        Commands::Serve {
            list_id,
            secret_key,
            domain,
            bind,
            api_url,
            request_logs,
        } => {
            let mut cfg = ListConfig::new(list_id, secret_key)
                .with_bind_addr(bind)
                .with_api_url(api_url)
                .with_startup_logs(true)
                .with_request_logs(request_logs);
            cfg.domain_name = domain;
            cmd_serve(cfg).await
        }

        Commands::Patch {
            list_id,
            secret_key,
            api_url,
            name,
            description,
            icon,
            domain,
            reset_secret_key,
        } => {
            let cfg = ListConfig::new(list_id, secret_key).with_api_url(api_url);
            let mut patch = match &domain {
                Some(d) => ListPatch::for_domain(d),
                None => ListPatch::default(),
            };
            patch.name = name;
            patch.description = description;
            patch.icon = icon;
            patch.domain = domain;
            patch.reset_secret_key = reset_secret_key;
            cmd_patch(cfg, patch).await
        }

        Commands::Simulate { target, secret_key } => cmd_simulate(&target, &secret_key).await,
    }
}

// ── Command implementations ───────────────────────────────────────────────────

async fn cmd_serve(cfg: ListConfig) -> Result<()> {
    let adapter = Arc::new(MemoryAdapter::new(cfg));
    integrase::serve(adapter).await
}

async fn cmd_patch(cfg: ListConfig, patch: ListPatch) -> Result<()> {
    cfg.validate().context("invalid list configuration")?;
    if patch.is_empty() {
        bail!("nothing to patch; pass at least one of --name, --description, --icon, --domain, --reset-secret-key");
    }

    let resp = integrase::patch_list(&cfg, &patch)
        .await
        .context("directory rejected list patch")?;

    println!("{}", serde_json::to_string_pretty(&resp)?);
    if resp.secret_key.is_some() {
        eprintln!("the directory issued a new secret key; store it and restart the list with it");
    }
    Ok(())
}

async fn cmd_simulate(target: &str, secret_key: &str) -> Result<()> {
    let base = target.trim_end_matches('/');
    let bot = default_bot();
    let client = reqwest::Client::builder()
        .timeout(integrase::directory::REQUEST_TIMEOUT)
        .build()
        .context("build http client")?;

    // Approve first so the list has the bot when claim/unclaim/deny arrive.
    let order = [
        Lifecycle::Approve,
        Lifecycle::Claim,
        Lifecycle::Unclaim,
        Lifecycle::Deny,
    ];

    for event in order {
        let url = format!("{base}{}", event.path());
        let resp = client
            .post(&url)
            .header("Authorization", secret_key)
            .json(&bot)
            .send()
            .await
            .with_context(|| format!("POST {url}"))?;
        report(event.as_str(), resp).await?;
    }

    for path in ["/data-request", "/data-delete"] {
        let url = format!("{base}{path}");
        let resp = client
            .get(&url)
            .query(&[("bot_id", bot.bot_id.as_str())])
            .header("Authorization", secret_key)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        report(path.trim_start_matches('/'), resp).await?;
    }

    Ok(())
}

async fn report(step: &str, resp: reqwest::Response) -> Result<()> {
    let status = resp.status();
    let body = resp.text().await.context("read response body")?;
    info!(step, %status, "list answered");
    println!("{step:<14} {status}  {body}");
    Ok(())
}
