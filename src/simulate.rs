//! Deterministic workflow simulation
//!
//! Simulation walks the nodes of a workflow snapshot in document order (the
//! order they sit in the `nodes` list), NOT along edges. Edges express
//! intent on the canvas; the preview executor has never consulted them for
//! ordering, and callers rely on that. One step with status `completed` is
//! produced per node, with logical timestamps one second apart.
//!
//! The backend boundary is async: a simulation may be served in-process or
//! by a remote service, and callers cancel by dropping the future. No
//! partial trace survives a failure or a cancellation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::types::{NodeId, NodeKind, Workflow};

/// Completion status of one simulated step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// The step ran to completion
    Completed,
    /// The step failed
    Failed,
    /// The step was skipped
    Skipped,
}

/// One entry in the execution trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStep {
    /// Id of the node this step executed
    pub node_id: NodeId,
    /// Kind of that node
    pub node_kind: NodeKind,
    /// Node label at snapshot time
    pub title: String,
    /// Completion status
    pub status: StepStatus,
    /// Logical timestamp; strictly increasing across the trace
    pub timestamp: DateTime<Utc>,
    /// Human-readable description of what ran
    pub details: String,
}

/// Result of a completed simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Whether the backend completed the run
    pub success: bool,
    /// One step per node, in document order
    pub steps: Vec<ExecutionStep>,
}

impl SimulationResult {
    /// A successful result carrying a trace
    pub fn completed(steps: Vec<ExecutionStep>) -> Self {
        Self {
            success: true,
            steps,
        }
    }
}

/// A simulation backend: the executor a workflow snapshot is submitted to.
///
/// Implementations may run in-process or across a transport. The returned
/// future is the cancellation handle: dropping it abandons the run, no
/// result is produced, and the caller's workflow is unaffected (the
/// snapshot was an owned copy).
#[async_trait]
pub trait SimulationBackend: Send + Sync {
    /// Run a simulation over a workflow snapshot.
    ///
    /// Backends do not validate the snapshot; callers run validation first
    /// and withhold simulation while it reports findings.
    async fn run(&self, workflow: Workflow) -> Result<SimulationResult, SimulationError>;
}

/// In-process simulation backend.
///
/// Walks the snapshot's nodes in document order and emits one `completed`
/// step per node. It performs no validation: submitted an empty workflow it
/// returns an empty successful trace, and a workflow that would fail
/// `validate` still gets every node executed. Callers gate on validation
/// before submitting.
///
/// A fixed latency models the remote executor other deployments talk to
/// (500 ms by default, the delay the designer's preview service has always
/// shown). `instant()` disables it.
#[derive(Debug, Clone)]
pub struct LocalSimulator {
    /// Modeled backend latency applied once per run, before any step.
    latency: Duration,
}

impl LocalSimulator {
    /// Create a simulator with the default 500 ms latency
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(500),
        }
    }

    /// Create a simulator that responds immediately
    pub fn instant() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }

    /// Override the modeled backend latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for LocalSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SimulationBackend for LocalSimulator {
    async fn run(&self, workflow: Workflow) -> Result<SimulationResult, SimulationError> {
        let run_id = format!("sim-{}", uuid::Uuid::new_v4());
        log::debug!(
            "Simulation '{}' started over {} node(s)",
            run_id,
            workflow.nodes.len()
        );

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let base = Utc::now();
        let steps = workflow
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| ExecutionStep {
                node_id: node.id.clone(),
                node_kind: node.kind,
                title: node.label.clone(),
                status: StepStatus::Completed,
                timestamp: base + chrono::Duration::seconds(index as i64),
                details: format!("Executed {}", node.label),
            })
            .collect();

        log::debug!("Simulation '{}' completed", run_id);
        Ok(SimulationResult::completed(steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WorkflowBuilder;
    use crate::config::{NodeConfig, TaskConfig};
    use crate::registry::WorkflowRegistry;
    use crate::validation::validate;
    use serde_json::json;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_one_completed_step_per_node_in_document_order() {
        let workflow = WorkflowBuilder::new()
            .add_node("start-1", NodeKind::Start)
            .add_node("task-2", NodeKind::Task)
            .add_node("end-3", NodeKind::End)
            .build();

        let result = assert_ok!(LocalSimulator::instant().run(workflow).await);
        assert!(result.success);
        assert_eq!(result.steps.len(), 3);

        let ids: Vec<&str> = result.steps.iter().map(|s| s.node_id.as_str()).collect();
        assert_eq!(ids, vec!["start-1", "task-2", "end-3"]);
        assert!(result
            .steps
            .iter()
            .all(|s| s.status == StepStatus::Completed));
    }

    #[tokio::test]
    async fn test_timestamps_strictly_increase_one_second_apart() {
        let workflow = WorkflowBuilder::new()
            .add_node("start-1", NodeKind::Start)
            .add_node("task-2", NodeKind::Task)
            .add_node("approval-3", NodeKind::Approval)
            .add_node("end-4", NodeKind::End)
            .build();

        let result = assert_ok!(LocalSimulator::instant().run(workflow).await);
        for pair in result.steps.windows(2) {
            assert!(pair[1].timestamp > pair[0].timestamp);
            assert_eq!(
                pair[1].timestamp - pair[0].timestamp,
                chrono::Duration::seconds(1)
            );
        }
    }

    #[tokio::test]
    async fn test_details_and_titles_come_from_labels() {
        let mut registry = WorkflowRegistry::new();
        let id = registry.add_node(NodeKind::Task).id.clone();
        registry.update_node_config(
            &id,
            NodeConfig::Task(TaskConfig {
                title: Some("Order laptop".to_string()),
                ..TaskConfig::default()
            }),
        );

        let result = assert_ok!(LocalSimulator::instant().run(registry.snapshot()).await);
        assert_eq!(result.steps[0].title, "Order laptop");
        assert_eq!(result.steps[0].details, "Executed Order laptop");
        assert_eq!(result.steps[0].node_kind, NodeKind::Task);
    }

    #[tokio::test]
    async fn test_document_order_ignores_edges() {
        // the edge points from the later node to the earlier one; the trace
        // still follows the node list
        let workflow = WorkflowBuilder::new()
            .add_node("end-1", NodeKind::End)
            .add_node("start-2", NodeKind::Start)
            .add_edge("start-2", "end-1")
            .build();

        let result = assert_ok!(LocalSimulator::instant().run(workflow).await);
        let ids: Vec<&str> = result.steps.iter().map(|s| s.node_id.as_str()).collect();
        assert_eq!(ids, vec!["end-1", "start-2"]);
    }

    #[tokio::test]
    async fn test_empty_workflow_yields_empty_successful_trace() {
        let result = assert_ok!(LocalSimulator::instant().run(Workflow::new()).await);
        assert!(result.success);
        assert!(result.steps.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_isolation_from_later_mutations() {
        let mut registry = WorkflowRegistry::new();
        registry.add_node(NodeKind::Start);
        registry.add_node(NodeKind::End);

        let snapshot = registry.snapshot();
        registry.add_node(NodeKind::Task);

        let result = assert_ok!(LocalSimulator::instant().run(snapshot).await);
        assert_eq!(result.steps.len(), 2);
        assert_eq!(registry.workflow().nodes.len(), 3);
    }

    #[tokio::test]
    async fn test_abandoning_the_wait_produces_no_result_and_no_mutation() {
        let mut registry = WorkflowRegistry::new();
        registry.add_node(NodeKind::Start);
        registry.add_node(NodeKind::End);
        let before = registry.export_json().unwrap();

        // the deadline elapses well before the modeled latency, so the run
        // future is dropped mid-wait; the caller maps that to Cancelled
        let simulator = LocalSimulator::new().with_latency(Duration::from_secs(2));
        let outcome = match tokio::time::timeout(
            Duration::from_millis(20),
            simulator.run(registry.snapshot()),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(SimulationError::Cancelled),
        };

        assert!(matches!(outcome, Err(SimulationError::Cancelled)));
        // the workflow is unaffected and stays re-simulatable
        assert_eq!(registry.export_json().unwrap(), before);
        let result = assert_ok!(LocalSimulator::instant().run(registry.snapshot()).await);
        assert_eq!(result.steps.len(), 2);
    }

    #[tokio::test]
    async fn test_failing_backend_produces_no_trace() {
        /// Mock backend whose transport always fails.
        struct UnreachableBackend;

        #[async_trait]
        impl SimulationBackend for UnreachableBackend {
            async fn run(&self, _workflow: Workflow) -> Result<SimulationResult, SimulationError> {
                Err(SimulationError::backend("connection refused"))
            }
        }

        let err = UnreachableBackend.run(Workflow::new()).await.unwrap_err();
        assert!(matches!(err, SimulationError::Backend(_)));
        assert_eq!(
            err.to_string(),
            "Simulation backend error: connection refused"
        );
        assert_eq!(SimulationError::Cancelled.to_string(), "Simulation cancelled");
    }

    #[tokio::test]
    async fn test_validate_then_simulate_happy_path() {
        let mut registry = WorkflowRegistry::new();
        let start = registry.add_node(NodeKind::Start).id.clone();
        let task = registry.add_node(NodeKind::Task).id.clone();
        let end = registry.add_node(NodeKind::End).id.clone();
        registry.connect(&start, &task);
        registry.connect(&task, &end);

        assert!(validate(registry.workflow()).is_empty());

        let result = assert_ok!(LocalSimulator::instant().run(registry.snapshot()).await);
        let titles: Vec<&str> = result.steps.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Start", "Task", "End"]);
        assert!(result
            .steps
            .iter()
            .all(|s| s.status == StepStatus::Completed));
    }

    #[test]
    fn test_trace_serializes_camel_case_with_rfc3339_timestamps() {
        let step = ExecutionStep {
            node_id: "task-2".to_string(),
            node_kind: NodeKind::Task,
            title: "Task".to_string(),
            status: StepStatus::Completed,
            timestamp: Utc::now(),
            details: "Executed Task".to_string(),
        };

        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value["nodeId"], json!("task-2"));
        assert_eq!(value["nodeKind"], json!("task"));
        assert_eq!(value["status"], json!("completed"));
        assert!(value["timestamp"].as_str().unwrap().contains('T'));
    }
}
