//! The process-wide shared context.
//!
//! Explicitly constructed and dependency-injected: every subsystem receives a
//! clone instead of reaching for ambient global state. Mutable slots are each
//! guarded by their own lock; a lock is held for the duration of a single
//! accessor call, never across calls, so callers needing compound atomicity
//! must coordinate externally.

use crate::id;
use crate::modules::ModuleMap;
use crate::nodes::registry::NodeRegistry;
use crate::nodes::{NodeDescriptor, NodeError};
use crate::resources::LoadedResources;
use dynast_domain::config::AppConfig;
use dynast_domain::node::TransactionContext;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
struct ContextInner {
    app_name: String,
    root_path: PathBuf,
    boot_id: String,
    config: RwLock<AppConfig>,
    nodes: RwLock<NodeRegistry>,
    modules: RwLock<Option<ModuleMap>>,
    resources: RwLock<Option<LoadedResources>>,
    last_transaction: RwLock<Option<TransactionContext>>,
}

/// Cloneable handle to the shared state consulted by every other component.
///
/// Reads of mapping/list-typed slots return defensive copies; the `AppConfig`
/// slot is Arc-backed, so its copy is cheap. State resets each process start.
#[derive(Debug, Clone)]
pub struct SharedContext {
    inner: Arc<ContextInner>,
}

impl SharedContext {
    pub fn new(app_name: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                app_name: app_name.into(),
                root_path: root_path.into(),
                boot_id: id::tagged_id(),
                config: RwLock::new(AppConfig::default()),
                nodes: RwLock::new(NodeRegistry::default()),
                modules: RwLock::new(None),
                resources: RwLock::new(None),
                last_transaction: RwLock::new(None),
            }),
        }
    }

    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.inner.app_name
    }

    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.inner.root_path
    }

    /// Identifier of this process start, for log correlation.
    #[must_use]
    pub fn boot_id(&self) -> &str {
        &self.inner.boot_id
    }

    #[must_use]
    pub fn config(&self) -> AppConfig {
        self.inner.config.read().clone()
    }

    pub fn set_config(&self, config: AppConfig) {
        *self.inner.config.write() = config;
    }

    /// The services root, derived from the configured layout. Computed, not
    /// stored: recomputation is idempotent given identical config.
    #[must_use]
    pub fn services_root(&self) -> PathBuf {
        let config = self.inner.config.read();
        self.inner.root_path.join(&config.services.root)
    }

    /// The application root used for application-scoped resource resolution.
    #[must_use]
    pub fn application_root(&self) -> PathBuf {
        self.inner.root_path.clone()
    }

    /// Registers a node descriptor. Append-only; see [`NodeRegistry::register`]
    /// for the validation rules.
    ///
    /// # Errors
    /// Propagates [`NodeError::InvalidNode`] and [`NodeError::DuplicateNode`].
    pub fn register_node(&self, node: NodeDescriptor) -> Result<(), NodeError> {
        self.inner.nodes.write().register(node)
    }

    /// Snapshot of the registered nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> Vec<NodeDescriptor> {
        self.inner.nodes.read().list()
    }

    /// The active Entry descriptor, if one was registered.
    #[must_use]
    pub fn entry_node(&self) -> Option<NodeDescriptor> {
        self.inner.nodes.read().entry()
    }

    /// The Dynast descriptors in registration order.
    #[must_use]
    pub fn dynast_nodes(&self) -> Vec<NodeDescriptor> {
        self.inner.nodes.read().dynasts()
    }

    #[must_use]
    pub fn modules(&self) -> Option<ModuleMap> {
        self.inner.modules.read().clone()
    }

    pub fn set_modules(&self, modules: ModuleMap) {
        *self.inner.modules.write() = Some(modules);
    }

    #[must_use]
    pub fn resources(&self) -> Option<LoadedResources> {
        self.inner.resources.read().clone()
    }

    pub fn set_resources(&self, resources: LoadedResources) {
        *self.inner.resources.write() = Some(resources);
    }

    /// Diagnostics mirror of the most recent transaction. Response handling
    /// never reads this slot; the per-request context travels with the request.
    #[must_use]
    pub fn last_transaction(&self) -> Option<TransactionContext> {
        self.inner.last_transaction.read().clone()
    }

    pub fn set_last_transaction(&self, transaction: TransactionContext) {
        *self.inner.last_transaction.write() = Some(transaction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynast_domain::config::AppConfig;
    use serde_json::json;

    #[test]
    fn config_reads_are_defensive_copies() {
        let context = SharedContext::new("test-app", "/tmp/app");
        let raw = json!({ "application": { "port": 9000 } });
        context.set_config(serde_json::from_value::<AppConfig>(raw).expect("config"));

        let mut copy = context.config();
        copy.application.port = 1;
        assert_eq!(context.config().application.port, 9000);
    }

    #[test]
    fn services_root_follows_configured_layout() {
        let context = SharedContext::new("test-app", "/srv/app");
        assert_eq!(context.services_root(), PathBuf::from("/srv/app/services"));

        let raw = json!({ "services": { "root": "svc" } });
        context.set_config(serde_json::from_value::<AppConfig>(raw).expect("config"));
        assert_eq!(context.services_root(), PathBuf::from("/srv/app/svc"));
    }

    #[test]
    fn last_transaction_mirror_round_trips() {
        let context = SharedContext::new("test-app", "/tmp/app");
        assert!(context.last_transaction().is_none());

        let txn = dynast_domain::node::TransactionContext {
            id: "t-1".to_owned(),
            method: "GET".to_owned(),
            client_address: "127.0.0.1".to_owned(),
        };
        context.set_last_transaction(txn.clone());
        assert_eq!(context.last_transaction(), Some(txn));
    }
}
