use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{middleware, routing::any, Router};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    adapter::{Lifecycle, ListAdapter},
    auth::require_secret_key,
    config::{validate_domain, ConfigError, ListConfig},
    directory::patch_list,
    handlers::{data_delete, data_request, lifecycle_route},
    types::ListPatch,
    AppState,
};

/// Builds the six integrase routes for `adapter`.
///
/// The adapter's config is validated first; nothing is routed when the list
/// ID or secret key is missing.
pub fn routes(adapter: Arc<dyn ListAdapter>) -> Result<Router, ConfigError> {
    let config = adapter.config();
    config.validate()?;

    let state = AppState {
        adapter,
        config: Arc::new(config),
    };

    // Lifecycle routes check method before auth, so they authorize in-handler.
    let lifecycle = Lifecycle::ALL
        .into_iter()
        .fold(Router::new(), |router, action| {
            router.route(action.path(), lifecycle_route(action))
        });

    let data = Router::new()
        .route("/data-request", any(data_request))
        .route("/data-delete", any(data_delete))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_secret_key,
        ));

    Ok(Router::new()
        .merge(lifecycle)
        .merge(data)
        .with_state(state))
}

/// Merges the integrase routes into `router` and, when the list has a domain,
/// announces the route URLs to the directory.
///
/// Configuration errors are returned before anything is registered. An
/// unusable domain or a failed announcement is only logged.
pub async fn prepare(adapter: Arc<dyn ListAdapter>, router: Router) -> Result<Router, ConfigError> {
    let config = adapter.config();

    if config.startup_logs {
        info!(list_id = %config.list_id, "starting integrase");
    }

    let routes = routes(adapter)?;
    let router = router.merge(routes);

    if let Some(domain) = config.domain_name.as_deref() {
        announce(&config, domain).await;
    }

    if config.startup_logs {
        info!(list_id = %config.list_id, "integrase routes registered");
    }

    Ok(router)
}

async fn announce(config: &ListConfig, domain: &str) {
    if let Err(e) = validate_domain(domain) {
        warn!(error = %e, "skipping directory registration");
        return;
    }

    if config.startup_logs {
        info!(%domain, api_url = %config.api_url, "announcing routes to directory");
    }

    let patch = ListPatch::for_domain(domain);
    match patch_list(config, &patch).await {
        Ok(resp) => {
            if config.startup_logs {
                info!(has_updated = ?resp.has_updated, "directory registration updated");
            }
            if resp.secret_key.is_some() {
                warn!("directory rotated the list secret key; update the configuration before restarting");
            }
        }
        Err(e) => {
            warn!(error = %e, "directory registration failed");
        }
    }
}

/// Serves the list on its configured bind address until the server stops.
pub async fn serve(adapter: Arc<dyn ListAdapter>) -> Result<()> {
    let config = adapter.config();

    let mut app = prepare(adapter, Router::new())
        .await
        .context("invalid list configuration")?;

    if config.request_logs {
        app = app.layer(TraceLayer::new_for_http());
    }

    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .with_context(|| format!("invalid bind address {:?}", config.bind_addr()))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind listener")?;

    info!(%addr, list_id = %config.list_id, "integrase listening");
    axum::serve(listener, app).await.context("server error")
}
