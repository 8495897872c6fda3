//! ClusterBroker: a registry of compute clusters and a constraint matcher
//! that recommends which of them can host a resource request.

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod handlers;
pub mod matcher;
pub mod models;
pub mod refresher;
pub mod registry;
pub mod router;
pub mod session;

use std::sync::Arc;

use config::Config;
use events::EventSink;
use matcher::Matcher;
use registry::{InventorySource, RegistryHandle};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub registry: RegistryHandle,
    pub matcher: Matcher,
    pub inventory: Arc<dyn InventorySource>,
    pub events: Arc<dyn EventSink>,
}
