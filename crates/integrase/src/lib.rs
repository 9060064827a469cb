//! Integrase lets a bot list receive review events from the central
//! directory and register its webhook URLs there.

use std::sync::Arc;

pub mod adapter;
pub mod auth;
pub mod config;
pub mod directory;
pub mod handlers;
pub mod memory;
pub mod server;
pub mod tester;
pub mod types;

/// Shared application state threaded through axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub adapter: Arc<dyn adapter::ListAdapter>,
    pub config: Arc<config::ListConfig>,
}

pub use adapter::{Lifecycle, ListAdapter};
pub use config::{ConfigError, ListConfig, SecretKey};
pub use directory::{patch_list, DirectoryClient, DirectoryError};
pub use memory::MemoryAdapter;
pub use server::{prepare, routes, serve};
pub use types::{Bot, ListPatch, ListPatchResponse, DEFAULT_API_URL};
