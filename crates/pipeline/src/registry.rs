//! Name-unique ownership of node instances.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{Node, NodeName, RegistryError};

/// Owns zero or more [`Node`] instances, keyed by their stable name.
///
/// The registry is mutated only during the single-threaded bootstrap phase;
/// at steady state the orchestrator resolves nodes through [`get_mut`] and
/// drives them. Concurrent registration is undefined and avoided by
/// construction.
///
/// [`get_mut`]: NodeRegistry::get_mut
#[derive(Default)]
pub struct NodeRegistry {
    nodes: BTreeMap<NodeName, Box<dyn Node>>,
}

impl NodeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node under its own name.
    ///
    /// Fails with [`RegistryError::DuplicateNodeName`] if a node with the
    /// same name is already registered. This is a configuration-time fatal
    /// error: callers are expected to abort startup, not catch and retry.
    pub fn register(&mut self, node: Box<dyn Node>) -> Result<(), RegistryError> {
        let name = node.name().clone();
        if self.nodes.contains_key(&name) {
            return Err(RegistryError::DuplicateNodeName { name });
        }
        debug!(node = %name, "node registered");
        self.nodes.insert(name, node);
        Ok(())
    }

    /// Resolves a node for read-only access.
    ///
    /// Fails with [`RegistryError::NodeNotFound`] if no node with that name
    /// exists — a programmer error, not expected at steady state.
    pub fn get(&self, name: &NodeName) -> Result<&dyn Node, RegistryError> {
        self.nodes
            .get(name)
            .map(|n| n.as_ref())
            .ok_or_else(|| RegistryError::NodeNotFound { name: name.clone() })
    }

    /// Resolves a node for invocation (`configure`/`warmup`/`process`).
    pub fn get_mut(&mut self, name: &NodeName) -> Result<&mut dyn Node, RegistryError> {
        match self.nodes.get_mut(name) {
            Some(n) => Ok(n.as_mut()),
            None => Err(RegistryError::NodeNotFound { name: name.clone() }),
        }
    }

    /// Read-only view of the full name→node mapping, for orchestrator
    /// introspection.
    pub fn all(&self) -> &BTreeMap<NodeName, Box<dyn Node>> {
        &self.nodes
    }

    /// Iterates over the registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &NodeName> {
        self.nodes.keys()
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no nodes are registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl std::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeContext, NodeInputs, NodeMetrics, NodeOptions, NodeOutputs};

    struct StubNode {
        name: NodeName,
    }

    impl StubNode {
        fn boxed(name: &str) -> Box<dyn Node> {
            Box::new(Self {
                name: NodeName::new(name).unwrap(),
            })
        }
    }

    impl Node for StubNode {
        fn name(&self) -> &NodeName {
            &self.name
        }
        fn configure(&mut self, _options: &NodeOptions) {}
        fn warmup(&mut self, _ctx: &NodeContext) {}
        fn process(&mut self, _ctx: &NodeContext, _inputs: &NodeInputs) -> NodeOutputs {
            NodeOutputs::new()
        }
        fn metrics(&self) -> NodeMetrics {
            NodeMetrics::new()
        }
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = NodeRegistry::new();
        registry.register(StubNode::boxed("wm")).unwrap();
        let err = registry.register(StubNode::boxed("wm")).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateNodeName {
                name: NodeName::new("wm").unwrap()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn missing_name_is_not_found() {
        let registry = NodeRegistry::new();
        let missing = NodeName::new("missing").unwrap();
        let err = registry.get(&missing).err().unwrap();
        assert_eq!(err, RegistryError::NodeNotFound { name: missing });
    }

    #[test]
    fn all_exposes_every_node_once() {
        let mut registry = NodeRegistry::new();
        registry.register(StubNode::boxed("a")).unwrap();
        registry.register(StubNode::boxed("b")).unwrap();
        let names: Vec<_> = registry.all().keys().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(registry.names().count(), 2);
        assert!(!registry.is_empty());
    }

    #[test]
    fn get_mut_resolves_for_invocation() {
        let mut registry = NodeRegistry::new();
        registry.register(StubNode::boxed("a")).unwrap();
        let name = NodeName::new("a").unwrap();
        let node = registry.get_mut(&name).unwrap();
        assert_eq!(node.name(), &name);
    }
}
