//! Workflow registry: owning store and mutation surface
//!
//! The registry owns one `Workflow` plus the id allocation state. Every
//! graph mutation goes through it, and `&mut self` exclusivity makes each
//! operation atomic from any observer's point of view. Simulation never
//! reads the live workflow; it consumes a `snapshot()`.

use serde_json::{Map, Value};

use crate::config::NodeConfig;
use crate::error::{ImportError, Result};
use crate::types::{NodeKind, Workflow, WorkflowEdge, WorkflowNode};

/// Owning store for a workflow under design.
///
/// Node ids are `{kind}-{n}` with one monotonically increasing counter
/// shared by all kinds and owned by this instance; edge ids are `edge-{n}`.
/// Counters never move backwards, so ids stay unique for the registry's
/// lifetime even across removals and import-replace.
///
/// # Example
///
/// ```ignore
/// use workflow_designer::{NodeKind, WorkflowRegistry};
///
/// let mut registry = WorkflowRegistry::new();
/// let start = registry.add_node(NodeKind::Start).id.clone();
/// let end = registry.add_node(NodeKind::End).id.clone();
/// registry.connect(&start, &end);
/// let json = registry.export_json()?;
/// ```
#[derive(Debug)]
pub struct WorkflowRegistry {
    /// The workflow under design.
    workflow: Workflow,
    /// Next value of the node id counter, shared by all kinds.
    next_node_id: u64,
    /// Next value of the edge id counter.
    next_edge_id: u64,
}

impl WorkflowRegistry {
    /// Create a registry holding an empty workflow
    pub fn new() -> Self {
        Self {
            workflow: Workflow::new(),
            next_node_id: 1,
            next_edge_id: 1,
        }
    }

    /// The current workflow
    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// An immutable deep copy for handing to a simulation backend.
    ///
    /// Mutating the registry after taking a snapshot never affects an
    /// in-flight simulation over that snapshot.
    pub fn snapshot(&self) -> Workflow {
        self.workflow.clone()
    }

    // =========================================================================
    // Node operations
    // =========================================================================

    /// Add a node of the given kind.
    ///
    /// The id is `{kind}-{counter}`, the label starts at the kind default
    /// and the config starts empty. Returns the stored node.
    pub fn add_node(&mut self, kind: NodeKind) -> &WorkflowNode {
        let id = format!("{}-{}", kind.as_str(), self.next_node_id);
        self.next_node_id += 1;
        log::debug!("Added node '{}'", id);
        self.workflow.nodes.push(WorkflowNode {
            id,
            kind,
            label: kind.default_label().to_string(),
            subtitle: String::new(),
            config: NodeConfig::empty(kind),
            extra: Map::new(),
        });
        // just pushed, so the index is always in range
        &self.workflow.nodes[self.workflow.nodes.len() - 1]
    }

    /// Replace a node's configuration.
    ///
    /// An unknown id is a silent no-op; the `false` return is the only
    /// signal. A config variant that does not match the node's kind is
    /// rejected the same way. On success the display label is recomputed
    /// (config title, else the previous label) along with the subtitle hint
    /// (assignee, else approver role, else empty).
    pub fn update_node_config(&mut self, node_id: &str, config: NodeConfig) -> bool {
        let Some(node) = self.workflow.find_node_mut(node_id) else {
            log::warn!("Ignoring config update for unknown node '{}'", node_id);
            return false;
        };
        if config.kind() != node.kind {
            log::warn!(
                "Ignoring {} config for node '{}' of kind {}",
                config.kind().as_str(),
                node_id,
                node.kind.as_str()
            );
            return false;
        }
        if let Some(title) = config.title() {
            node.label = title.to_string();
        }
        node.subtitle = config.subtitle_hint();
        node.config = config;
        true
    }

    /// Remove a node and every edge referencing it.
    ///
    /// Returns false when the id is unknown. The freed id is never
    /// reallocated.
    pub fn remove_node(&mut self, node_id: &str) -> bool {
        let Some(pos) = self.workflow.nodes.iter().position(|n| n.id == node_id) else {
            return false;
        };
        self.workflow.nodes.remove(pos);
        self.workflow
            .edges
            .retain(|e| e.source_node_id != node_id && e.target_node_id != node_id);
        log::debug!("Removed node '{}'", node_id);
        true
    }

    // =========================================================================
    // Edge operations
    // =========================================================================

    /// Connect two nodes with a new edge.
    ///
    /// Duplicate edges between the same pair and self-loops are permitted
    /// and preserved. Returns `None` without mutating when either endpoint
    /// id does not exist.
    pub fn connect(&mut self, source_id: &str, target_id: &str) -> Option<&WorkflowEdge> {
        if !self.workflow.contains_node(source_id) || !self.workflow.contains_node(target_id) {
            log::warn!(
                "Ignoring edge from '{}' to '{}': missing endpoint",
                source_id,
                target_id
            );
            return None;
        }
        let id = format!("edge-{}", self.next_edge_id);
        self.next_edge_id += 1;
        log::debug!("Connected '{}' -> '{}' as '{}'", source_id, target_id, id);
        self.workflow.edges.push(WorkflowEdge {
            id,
            source_node_id: source_id.to_string(),
            target_node_id: target_id.to_string(),
            extra: Map::new(),
        });
        // just pushed, so the index is always in range
        Some(&self.workflow.edges[self.workflow.edges.len() - 1])
    }

    /// Remove a single edge.
    ///
    /// Returns false when the id is unknown.
    pub fn remove_edge(&mut self, edge_id: &str) -> bool {
        let before = self.workflow.edges.len();
        self.workflow.edges.retain(|e| e.id != edge_id);
        let removed = self.workflow.edges.len() < before;
        if removed {
            log::debug!("Removed edge '{}'", edge_id);
        }
        removed
    }

    // =========================================================================
    // Bulk replace and the JSON document format
    // =========================================================================

    /// Atomically replace the whole workflow.
    ///
    /// Both id counters advance past any `-<digits>` suffix occurring in the
    /// new ids, so nodes and edges added afterwards still get unique ids.
    pub fn replace_all(&mut self, nodes: Vec<WorkflowNode>, edges: Vec<WorkflowEdge>) {
        if let Some(n) = highest_numeric_suffix(nodes.iter().map(|n| n.id.as_str())) {
            self.next_node_id = self.next_node_id.max(n.saturating_add(1));
        }
        if let Some(n) = highest_numeric_suffix(edges.iter().map(|e| e.id.as_str())) {
            self.next_edge_id = self.next_edge_id.max(n.saturating_add(1));
        }
        log::info!(
            "Replaced workflow: {} nodes, {} edges",
            nodes.len(),
            edges.len()
        );
        self.workflow = Workflow { nodes, edges };
    }

    /// Import a workflow document, replacing the current workflow.
    ///
    /// The input must be a JSON object with `nodes` and `edges` arrays.
    /// Shape checking and record parsing complete before any mutation, so on
    /// error the current workflow is left untouched.
    pub fn import_json(&mut self, json: &str) -> std::result::Result<(), ImportError> {
        let value: Value = serde_json::from_str(json)?;
        let Some(object) = value.as_object() else {
            return Err(ImportError::shape("top-level value is not an object"));
        };
        for key in ["nodes", "edges"] {
            match object.get(key) {
                Some(Value::Array(_)) => {}
                Some(_) => {
                    return Err(ImportError::shape(format!("`{}` is not an array", key)));
                }
                None => return Err(ImportError::shape(format!("missing `{}` array", key))),
            }
        }
        let workflow: Workflow = serde_json::from_value(value)?;
        self.replace_all(workflow.nodes, workflow.edges);
        Ok(())
    }

    /// Export the workflow as a pretty-printed JSON document.
    ///
    /// The top-level shape is exactly `{ "nodes": [...], "edges": [...] }`
    /// with two-space indentation.
    pub fn export_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(&self.workflow)?;
        Ok(json)
    }
}

impl Default for WorkflowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest `-<digits>` suffix among the given ids, if any
fn highest_numeric_suffix<'a>(ids: impl Iterator<Item = &'a str>) -> Option<u64> {
    ids.filter_map(|id| id.rsplit_once('-').and_then(|(_, n)| n.parse().ok()))
        .max()
}
