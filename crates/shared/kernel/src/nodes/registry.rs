//! Append-only registry of node descriptors.

use super::{NodeDescriptor, NodeError};
use dynast_domain::node::NodeKind;

/// Records node descriptors in registration order.
///
/// Insertion order is preserved on listing and later used as initialization
/// order. There is no removal: registered nodes live for the process lifetime.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: Vec<NodeDescriptor>,
}

impl NodeRegistry {
    /// Registers a descriptor.
    ///
    /// At most one Entry descriptor is honored, and names are unique across
    /// the registry; both violations are rejected rather than replaced.
    ///
    /// # Errors
    /// [`NodeError::DuplicateNode`] on a name collision or a second Entry.
    pub fn register(&mut self, node: NodeDescriptor) -> Result<(), NodeError> {
        if self.nodes.iter().any(|existing| existing.name() == node.name()) {
            return Err(NodeError::DuplicateNode { name: node.name().to_owned() });
        }
        if node.kind() == NodeKind::Entry
            && let Some(entry) = self.entry()
        {
            return Err(NodeError::DuplicateNode { name: entry.name().to_owned() });
        }
        tracing::info!(name = node.name(), kind = node.kind().as_str(), "Node registered");
        self.nodes.push(node);
        Ok(())
    }

    /// All descriptors in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<NodeDescriptor> {
        self.nodes.clone()
    }

    /// The active Entry descriptor, if any.
    #[must_use]
    pub fn entry(&self) -> Option<NodeDescriptor> {
        self.nodes.iter().find(|node| node.kind() == NodeKind::Entry).cloned()
    }

    /// The Dynast descriptors in registration order.
    #[must_use]
    pub fn dynasts(&self) -> Vec<NodeDescriptor> {
        self.nodes.iter().filter(|node| node.kind() == NodeKind::Dynast).cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dynast(name: &str) -> NodeDescriptor {
        NodeDescriptor::dynast(name)
            .handler_fn(|_| Ok(()))
            .build()
            .expect("valid descriptor")
    }

    fn entry(name: &str) -> NodeDescriptor {
        NodeDescriptor::entry(name)
            .handler_fn(|_| Ok(()))
            .build()
            .expect("valid descriptor")
    }

    #[test]
    fn listing_preserves_insertion_order() {
        let mut registry = NodeRegistry::default();
        for name in ["charlie", "alpha", "bravo"] {
            registry.register(dynast(name)).expect("register");
        }

        let listed = registry.list();
        let names: Vec<&str> = listed.iter().map(NodeDescriptor::name).collect();
        assert_eq!(names, ["charlie", "alpha", "bravo"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = NodeRegistry::default();
        registry.register(dynast("billing")).expect("first registration");
        let error = registry.register(dynast("billing")).expect_err("duplicate");
        assert!(matches!(error, NodeError::DuplicateNode { ref name } if name == "billing"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn second_entry_is_rejected() {
        let mut registry = NodeRegistry::default();
        registry.register(entry("main")).expect("first entry");
        let error = registry.register(entry("other")).expect_err("second entry");
        assert!(matches!(error, NodeError::DuplicateNode { .. }));
    }

    #[test]
    fn entry_and_dynasts_are_partitioned() {
        let mut registry = NodeRegistry::default();
        registry.register(dynast("billing")).expect("register");
        registry.register(entry("main")).expect("register");
        registry.register(dynast("reports")).expect("register");

        assert_eq!(registry.entry().expect("entry").name(), "main");
        let dynasts: Vec<String> =
            registry.dynasts().iter().map(|node| node.name().to_owned()).collect();
        assert_eq!(dynasts, ["billing", "reports"]);
    }
}
