//! Fluent builder for workflow graphs
//!
//! Provides a type-safe, fluent API for constructing workflows
//! programmatically with explicit ids, bypassing the registry's id
//! allocation. Intended for tests, fixtures and demo graphs.

use serde_json::Map;

use crate::config::NodeConfig;
use crate::types::{NodeKind, Workflow, WorkflowEdge, WorkflowNode};

/// Fluent builder for constructing workflows
///
/// # Example
///
/// ```ignore
/// let workflow = WorkflowBuilder::new()
///     .add_node("start-1", NodeKind::Start)
///     .add_node("end-2", NodeKind::End)
///     .add_edge("start-1", "end-2")
///     .build();
/// ```
#[derive(Default)]
pub struct WorkflowBuilder {
    nodes: Vec<WorkflowNode>,
    edges: Vec<WorkflowEdge>,
    edge_counter: usize,
}

impl WorkflowBuilder {
    /// Create a new workflow builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with the kind's default label and an empty config
    pub fn add_node(self, id: impl Into<String>, kind: NodeKind) -> Self {
        self.add_configured_node(id, kind, NodeConfig::empty(kind))
    }

    /// Add a node with an explicit config.
    ///
    /// The label and subtitle are derived from the config the same way the
    /// registry derives them on a config update.
    pub fn add_configured_node(
        mut self,
        id: impl Into<String>,
        kind: NodeKind,
        config: NodeConfig,
    ) -> Self {
        let label = config
            .title()
            .map(str::to_string)
            .unwrap_or_else(|| kind.default_label().to_string());
        self.nodes.push(WorkflowNode {
            id: id.into(),
            kind,
            label,
            subtitle: config.subtitle_hint(),
            config,
            extra: Map::new(),
        });
        self
    }

    /// Add an edge between two nodes (auto-generates the edge id)
    pub fn add_edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edge_counter += 1;
        self.edges.push(WorkflowEdge {
            id: format!("edge-{}", self.edge_counter),
            source_node_id: source.into(),
            target_node_id: target.into(),
            extra: Map::new(),
        });
        self
    }

    /// Build the workflow without validation
    pub fn build(self) -> Workflow {
        Workflow {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}
