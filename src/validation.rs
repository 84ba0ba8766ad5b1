//! Workflow validation
//!
//! `validate` performs exactly the checks the designer has always run before
//! simulation or export: non-empty, has a Start, has an End. Findings are
//! collected into a list (never returned as `Err`), and every check runs
//! independently so the caller sees all problems at once.
//!
//! `validate_extended` is the opt-in strict superset: node id uniqueness,
//! edge integrity, self-loops, duplicate connections, required task titles,
//! automation resolution, reachability and cycle detection. Callers choose it
//! explicitly; `validate` itself never grows new checks.

use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;

use crate::catalog::AutomationCatalog;
use crate::config::NodeConfig;
use crate::types::{NodeKind, Workflow};

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The workflow has no nodes
    #[error("Workflow is empty")]
    EmptyWorkflow,

    /// No node of kind Start exists
    #[error("Workflow must have a Start node")]
    MissingStart,

    /// No node of kind End exists
    #[error("Workflow must have an End node")]
    MissingEnd,

    /// A node id occurs more than once (extended check)
    #[error("Node id '{node_id}' is used by more than one node")]
    DuplicateNodeId { node_id: String },

    /// An edge endpoint references no node (extended check)
    #[error("Edge '{edge_id}' references unknown node '{node_id}'")]
    DanglingEdge { edge_id: String, node_id: String },

    /// An edge connects a node to itself (extended check)
    #[error("Edge '{edge_id}' connects node '{node_id}' to itself")]
    SelfLoop { edge_id: String, node_id: String },

    /// A second edge covers an already-connected pair (extended check)
    #[error("Edge '{edge_id}' duplicates the connection '{source_id}' -> '{target_id}'")]
    DuplicateEdge {
        edge_id: String,
        source_id: String,
        target_id: String,
    },

    /// A Task node has no title (extended check)
    #[error("Task node '{node_id}' has no title")]
    MissingTaskTitle { node_id: String },

    /// An Automated node references an action the catalog does not know
    /// (extended check)
    #[error("Node '{node_id}' references unknown automation '{action_id}'")]
    UnknownAutomation { node_id: String, action_id: String },

    /// A node cannot be reached from any Start node (extended check)
    #[error("Node '{node_id}' is not reachable from a Start node")]
    UnreachableNode { node_id: String },

    /// The edges admit no topological order (extended check)
    #[error("Workflow contains a cycle")]
    CycleDetected,
}

/// Validate a workflow before simulation or export.
///
/// Returns all findings, not just the first; an empty vector means valid.
/// Exactly three checks run: empty workflow, missing Start, missing End.
/// Anything stricter lives in [`validate_extended`] only.
pub fn validate(workflow: &Workflow) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if workflow.nodes.is_empty() {
        errors.push(ValidationError::EmptyWorkflow);
    }
    if !workflow.has_kind(NodeKind::Start) {
        errors.push(ValidationError::MissingStart);
    }
    if !workflow.has_kind(NodeKind::End) {
        errors.push(ValidationError::MissingEnd);
    }

    log::debug!("Validation produced {} finding(s)", errors.len());
    errors
}

/// Validate with the strict extension checks enabled.
///
/// Pass a catalog to resolve the action ids of Automated nodes; with `None`
/// that check is skipped. Core findings come first in the returned list.
pub fn validate_extended(
    workflow: &Workflow,
    catalog: Option<&dyn AutomationCatalog>,
) -> Vec<ValidationError> {
    let mut errors = validate(workflow);

    check_node_identity(workflow, &mut errors);
    check_edge_integrity(workflow, &mut errors);
    check_required_titles(workflow, &mut errors);
    if let Some(catalog) = catalog {
        check_automation_references(workflow, catalog, &mut errors);
    }
    check_reachability(workflow, &mut errors);
    detect_cycles(workflow, &mut errors);

    errors
}

/// Node ids must be unique across the workflow; duplicates can only arrive
/// through import (the registry's counters never reuse an id)
fn check_node_identity(workflow: &Workflow, errors: &mut Vec<ValidationError>) {
    let mut seen: HashSet<&str> = HashSet::new();
    for node in &workflow.nodes {
        if !seen.insert(node.id.as_str()) {
            errors.push(ValidationError::DuplicateNodeId {
                node_id: node.id.clone(),
            });
        }
    }
}

/// Dangling endpoints, self-loops and duplicate connections
fn check_edge_integrity(workflow: &Workflow, errors: &mut Vec<ValidationError>) {
    let node_ids: HashSet<&str> = workflow.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut seen_pairs: HashSet<(&str, &str)> = HashSet::new();

    for edge in &workflow.edges {
        for endpoint in [&edge.source_node_id, &edge.target_node_id] {
            if !node_ids.contains(endpoint.as_str()) {
                errors.push(ValidationError::DanglingEdge {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
        if edge.source_node_id == edge.target_node_id {
            errors.push(ValidationError::SelfLoop {
                edge_id: edge.id.clone(),
                node_id: edge.source_node_id.clone(),
            });
        }
        if !seen_pairs.insert((edge.source_node_id.as_str(), edge.target_node_id.as_str())) {
            errors.push(ValidationError::DuplicateEdge {
                edge_id: edge.id.clone(),
                source_id: edge.source_node_id.clone(),
                target_id: edge.target_node_id.clone(),
            });
        }
    }
}

/// Task nodes must carry a non-empty title
fn check_required_titles(workflow: &Workflow, errors: &mut Vec<ValidationError>) {
    for node in &workflow.nodes {
        if node.kind == NodeKind::Task && node.config.title().is_none() {
            errors.push(ValidationError::MissingTaskTitle {
                node_id: node.id.clone(),
            });
        }
    }
}

/// Automated nodes with an action id must reference a catalog entry.
/// An unset action id is not a finding; the step simply isn't configured yet.
fn check_automation_references(
    workflow: &Workflow,
    catalog: &dyn AutomationCatalog,
    errors: &mut Vec<ValidationError>,
) {
    for node in &workflow.nodes {
        let NodeConfig::Automated(config) = &node.config else {
            continue;
        };
        let Some(action_id) = config.action_id.as_deref() else {
            continue;
        };
        if catalog.find(action_id).is_none() {
            errors.push(ValidationError::UnknownAutomation {
                node_id: node.id.clone(),
                action_id: action_id.to_string(),
            });
        }
    }
}

/// Every node must be reachable from some Start node along edges
fn check_reachability(workflow: &Workflow, errors: &mut Vec<ValidationError>) {
    if workflow.nodes.is_empty() {
        return;
    }

    let mut reachable: HashSet<&str> = workflow
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Start)
        .map(|n| n.id.as_str())
        .collect();
    let mut queue: VecDeque<&str> = reachable.iter().copied().collect();

    while let Some(node_id) = queue.pop_front() {
        for edge in workflow.outgoing_edges(node_id) {
            let target = edge.target_node_id.as_str();
            // dangling targets are reported by the edge integrity check
            if workflow.contains_node(target) && reachable.insert(target) {
                queue.push_back(target);
            }
        }
    }

    for node in &workflow.nodes {
        if !reachable.contains(node.id.as_str()) {
            errors.push(ValidationError::UnreachableNode {
                node_id: node.id.clone(),
            });
        }
    }
}

/// Detect cycles using Kahn's algorithm (topological sort)
fn detect_cycles(workflow: &Workflow, errors: &mut Vec<ValidationError>) {
    let node_ids: HashSet<&str> = workflow.nodes.iter().map(|n| n.id.as_str()).collect();

    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    for &id in &node_ids {
        in_degree.insert(id, 0);
    }
    for edge in &workflow.edges {
        let source = edge.source_node_id.as_str();
        let target = edge.target_node_id.as_str();
        // dangling edges don't participate in the ordering
        if !node_ids.contains(source) || !node_ids.contains(target) {
            continue;
        }
        successors.entry(source).or_default().push(target);
        *in_degree.entry(target).or_insert(0) += 1;
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&id, _)| id)
        .collect();

    let mut visited = 0;
    while let Some(node_id) = queue.pop_front() {
        visited += 1;
        for &target in successors.get(node_id).into_iter().flatten() {
            if let Some(deg) = in_degree.get_mut(target) {
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(target);
                }
            }
        }
    }

    if visited < node_ids.len() {
        errors.push(ValidationError::CycleDetected);
    }
}
