//! Core types for workflow graphs
//!
//! These types define the structure of a designed workflow: nodes, edges,
//! and the aggregate `Workflow` that owns them. Unrecognized fields on node
//! and edge records (canvas position and other presentation metadata) are
//! captured in a passthrough map and survive an export/import round-trip
//! untouched.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::config::NodeConfig;

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// The kind of a workflow node, determining its configuration schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Entry point of the process
    Start,
    /// A human work item
    Task,
    /// A sign-off step routed to an approver
    Approval,
    /// An automated action resolved through the automation catalog
    Automated,
    /// Exit point of the process
    End,
}

impl NodeKind {
    /// Lowercase identifier used in allocated node ids and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Task => "task",
            NodeKind::Approval => "approval",
            NodeKind::Automated => "automated",
            NodeKind::End => "end",
        }
    }

    /// Default display label for freshly added nodes of this kind
    pub fn default_label(&self) -> &'static str {
        match self {
            NodeKind::Start => "Start",
            NodeKind::Task => "Task",
            NodeKind::Approval => "Approval",
            NodeKind::Automated => "Automated Action",
            NodeKind::End => "End",
        }
    }
}

/// A node instance in a workflow
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    /// Unique identifier, immutable once assigned
    pub id: NodeId,
    /// Node kind, fixed at creation
    pub kind: NodeKind,
    /// Display label, recomputed from the config on every update
    pub label: String,
    /// Derived display hint (assignee or approver role), empty when unset
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subtitle: String,
    /// Kind-specific configuration
    pub config: NodeConfig,
    /// Presentation fields preserved on round-trip but never interpreted
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire mirror of `WorkflowNode`; the config arrives as raw JSON and is
/// parsed against the record's kind.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    id: NodeId,
    kind: NodeKind,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    subtitle: String,
    #[serde(default)]
    config: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for WorkflowNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawNode::deserialize(deserializer)?;
        let config = match raw.config {
            Some(Value::Null) | None => NodeConfig::empty(raw.kind),
            Some(value) => NodeConfig::from_value(raw.kind, value).map_err(D::Error::custom)?,
        };
        Ok(WorkflowNode {
            id: raw.id,
            kind: raw.kind,
            label: raw
                .label
                .unwrap_or_else(|| raw.kind.default_label().to_string()),
            subtitle: raw.subtitle,
            config,
            extra: raw.extra,
        })
    }
}

/// An edge connecting two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEdge {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// Source node ID
    pub source_node_id: NodeId,
    /// Target node ID
    pub target_node_id: NodeId,
    /// Presentation fields preserved on round-trip but never interpreted
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A complete workflow: the aggregate of nodes and edges for one HR process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Nodes in document order (the order simulation executes them in)
    pub nodes: Vec<WorkflowNode>,
    /// Edges connecting nodes
    pub edges: Vec<WorkflowEdge>,
}

impl Workflow {
    /// Create a new empty workflow
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node by ID (mutable)
    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut WorkflowNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Find an edge by ID
    pub fn find_edge(&self, id: &str) -> Option<&WorkflowEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Check whether a node with this ID exists
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Check whether any node of the given kind exists
    pub fn has_kind(&self, kind: NodeKind) -> bool {
        self.nodes.iter().any(|n| n.kind == kind)
    }

    /// Get edges coming into a node
    pub fn incoming_edges<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a WorkflowEdge> + 'a {
        self.edges.iter().filter(move |e| e.target_node_id == node_id)
    }

    /// Get edges going out of a node
    pub fn outgoing_edges<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a WorkflowEdge> + 'a {
        self.edges.iter().filter(move |e| e.source_node_id == node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_kind_identifiers_and_labels() {
        assert_eq!(NodeKind::Start.as_str(), "start");
        assert_eq!(NodeKind::Automated.as_str(), "automated");
        assert_eq!(NodeKind::Start.default_label(), "Start");
        assert_eq!(NodeKind::Automated.default_label(), "Automated Action");
        assert_eq!(NodeKind::End.default_label(), "End");
    }

    #[test]
    fn test_node_kind_serializes_lowercase() {
        let value = serde_json::to_value(NodeKind::Approval).unwrap();
        assert_eq!(value, json!("approval"));
        let kind: NodeKind = serde_json::from_value(json!("task")).unwrap();
        assert_eq!(kind, NodeKind::Task);
    }

    #[test]
    fn test_node_round_trip_preserves_extra_fields() {
        let input = json!({
            "id": "task-2",
            "kind": "task",
            "label": "Collect documents",
            "config": { "title": "Collect documents", "customFields": [] },
            "position": { "x": 120.0, "y": 80.0 }
        });

        let node: WorkflowNode = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(node.id, "task-2");
        assert_eq!(node.kind, NodeKind::Task);
        assert!(node.extra.contains_key("position"));

        let output = serde_json::to_value(&node).unwrap();
        assert_eq!(output["position"], input["position"]);
        assert_eq!(output["label"], json!("Collect documents"));
        // empty subtitle stays off the wire
        assert!(output.get("subtitle").is_none());
    }

    #[test]
    fn test_node_without_config_gets_empty_variant_and_default_label() {
        let node: WorkflowNode =
            serde_json::from_value(json!({ "id": "approval-1", "kind": "approval" })).unwrap();
        assert_eq!(node.label, "Approval");
        assert_eq!(node.config, NodeConfig::empty(NodeKind::Approval));
        assert!(node.subtitle.is_empty());
    }

    #[test]
    fn test_edge_round_trip_preserves_extra_fields() {
        let input = json!({
            "id": "edge-1",
            "sourceNodeId": "start-1",
            "targetNodeId": "task-2",
            "animated": true
        });
        let edge: WorkflowEdge = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(edge.source_node_id, "start-1");
        assert_eq!(edge.target_node_id, "task-2");
        let output = serde_json::to_value(&edge).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_workflow_lookup_helpers() {
        let mut workflow = Workflow::new();
        workflow.nodes.push(
            serde_json::from_value(json!({ "id": "start-1", "kind": "start" })).unwrap(),
        );
        workflow.nodes.push(
            serde_json::from_value(json!({ "id": "end-2", "kind": "end" })).unwrap(),
        );
        workflow.edges.push(WorkflowEdge {
            id: "edge-1".to_string(),
            source_node_id: "start-1".to_string(),
            target_node_id: "end-2".to_string(),
            extra: Map::new(),
        });

        assert!(workflow.contains_node("start-1"));
        assert!(!workflow.contains_node("task-3"));
        assert!(workflow.has_kind(NodeKind::End));
        assert!(!workflow.has_kind(NodeKind::Task));
        assert_eq!(workflow.incoming_edges("end-2").count(), 1);
        assert_eq!(workflow.outgoing_edges("end-2").count(), 0);
        assert!(workflow.find_edge("edge-1").is_some());
    }
}
