//! Node registration and resolution.
//!
//! A node is a unit of user code that receives the assembled server: either
//! the single Entry handler that takes full responsibility for wiring it, or
//! one of many Dynast handlers each wiring a subset.

pub mod registry;
pub mod resolve;
pub mod scan;

pub use registry::NodeRegistry;
pub use resolve::{NodeResolver, Resolution};
pub use scan::{ModuleProvider, NodeBinder, NodeScanner};

use crate::server::assembly::AppAssembly;
use dynast_domain::node::{NodeInfo, NodeKind};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Error type node handlers may surface; the resolver classifies it.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A registration entry point receiving the live server assembly.
pub trait NodeHandler: Send + Sync {
    /// Wires this node's share of the server.
    ///
    /// # Errors
    /// Any error aborts startup when raised from an Entry node and is logged
    /// and isolated when raised from a Dynast node.
    fn mount(&self, assembly: &mut AppAssembly) -> Result<(), HandlerError>;
}

impl<F> NodeHandler for F
where
    F: Fn(&mut AppAssembly) -> Result<(), HandlerError> + Send + Sync,
{
    fn mount(&self, assembly: &mut AppAssembly) -> Result<(), HandlerError> {
        self(assembly)
    }
}

/// Errors raised by node registration and resolution.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// The descriptor is unusable: missing handler instance or empty name.
    /// Fatal for that single registration attempt.
    #[error("invalid node: {message}")]
    InvalidNode { message: String },

    /// A node with the same name (or a second Entry) is already registered.
    #[error("duplicate node registration: {name}")]
    DuplicateNode { name: String },

    /// A handler failed while receiving the server. Fatal from the Entry path.
    #[error("node initialization failed for '{name}': {source}")]
    Initialization { name: String, source: HandlerError },

    /// Resolution is one-shot per process.
    #[error("node resolution already completed")]
    AlreadyResolved,
}

/// A registered node: metadata plus the handler that receives the server.
#[derive(Clone)]
pub struct NodeDescriptor {
    info: NodeInfo,
    kind: NodeKind,
    handler: Arc<dyn NodeHandler>,
}

impl NodeDescriptor {
    /// Starts a descriptor for the single highest-priority handler.
    #[must_use]
    pub fn entry(name: impl Into<String>) -> NodeDescriptorBuilder {
        NodeDescriptorBuilder::new(name, NodeKind::Entry)
    }

    /// Starts a descriptor for a secondary component handler.
    #[must_use]
    pub fn dynast(name: impl Into<String>) -> NodeDescriptorBuilder {
        NodeDescriptorBuilder::new(name, NodeKind::Dynast)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    #[must_use]
    pub fn info(&self) -> &NodeInfo {
        &self.info
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub fn handler(&self) -> &dyn NodeHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for NodeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeDescriptor")
            .field("info", &self.info)
            .field("kind", &self.kind)
            .field("handler", &"<handler>")
            .finish()
    }
}

/// Validating builder for [`NodeDescriptor`].
///
/// A descriptor cannot be built without a handler instance; that makes a
/// handler-less registration fail before it ever reaches the registry.
#[must_use = "builders do nothing unless you call .build()"]
pub struct NodeDescriptorBuilder {
    name: String,
    author: String,
    description: String,
    cors_origins: BTreeSet<String>,
    kind: NodeKind,
    handler: Option<Arc<dyn NodeHandler>>,
}

impl NodeDescriptorBuilder {
    fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            author: String::new(),
            description: String::new(),
            cors_origins: BTreeSet::new(),
            kind,
            handler: None,
        }
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn cors_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cors_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    pub fn handler(mut self, handler: impl NodeHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Closure form of [`NodeDescriptorBuilder::handler`].
    pub fn handler_fn<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut AppAssembly) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Finalizes the descriptor.
    ///
    /// # Errors
    /// [`NodeError::InvalidNode`] when the name is empty or no handler
    /// instance was provided.
    pub fn build(self) -> Result<NodeDescriptor, NodeError> {
        if self.name.trim().is_empty() {
            return Err(NodeError::InvalidNode { message: "node name cannot be empty".to_owned() });
        }
        let Some(handler) = self.handler else {
            return Err(NodeError::InvalidNode {
                message: format!("node '{}' has no handler instance", self.name),
            });
        };

        let mut info = NodeInfo::new(self.name);
        info.author = self.author;
        info.description = self.description;
        info.cors_origins = self.cors_origins;

        Ok(NodeDescriptor { info, kind: self.kind, handler })
    }
}

impl fmt::Debug for NodeDescriptorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeDescriptorBuilder")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("handler", &self.handler.as_ref().map(|_| "<handler>"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BillingNode;

    impl NodeHandler for BillingNode {
        fn mount(&self, _assembly: &mut AppAssembly) -> Result<(), HandlerError> {
            Ok(())
        }
    }

    #[test]
    fn descriptor_without_handler_fails() {
        let error = NodeDescriptor::dynast("billing").build().expect_err("no handler");
        assert!(matches!(error, NodeError::InvalidNode { .. }));
    }

    #[test]
    fn descriptor_with_empty_name_fails() {
        let error = NodeDescriptor::dynast("  ")
            .handler_fn(|_| Ok(()))
            .build()
            .expect_err("empty name");
        assert!(matches!(error, NodeError::InvalidNode { .. }));
    }

    #[test]
    fn descriptor_carries_metadata() {
        let node = NodeDescriptor::dynast("billing")
            .author("ops")
            .description("billing controllers")
            .cors_origins(["https://billing.example"])
            .handler(BillingNode)
            .build()
            .expect("valid descriptor");

        assert_eq!(node.name(), "billing");
        assert_eq!(node.kind(), NodeKind::Dynast);
        assert_eq!(node.info().author, "ops");
        assert!(node.info().cors_origins.contains("https://billing.example"));
    }
}
