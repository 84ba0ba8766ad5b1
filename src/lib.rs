//! Workflow Designer - graph model, validation and simulation for HR processes
//!
//! This crate is the core behind a visual HR-process designer. It owns the
//! workflow graph (Start / Task / Approval / Automated / End nodes plus the
//! edges between them), per-kind node configuration, validation, and a
//! deterministic simulation engine that turns a workflow snapshot into an
//! ordered execution trace. UI concerns (canvas, palette, forms) live in
//! external collaborators that mutate the graph through [`WorkflowRegistry`]
//! and render what the core emits.
//!
//! # Architecture
//!
//! - `WorkflowRegistry`: owning store and the only mutation surface; also the
//!   JSON import/export boundary
//! - `validate` / `validate_extended`: list-returning checks run before
//!   simulation or export
//! - `SimulationBackend`: async executor boundary; `LocalSimulator` is the
//!   in-process implementation
//! - `AutomationCatalog`: external source of selectable automated actions
//!
//! Note that simulation walks nodes in document order, not along edges — see
//! the `simulate` module docs before filing a bug about it.
//!
//! # Example
//!
//! ```ignore
//! use workflow_designer::{
//!     LocalSimulator, NodeKind, SimulationBackend, WorkflowRegistry, validate,
//! };
//!
//! let mut registry = WorkflowRegistry::new();
//! let start = registry.add_node(NodeKind::Start).id.clone();
//! let end = registry.add_node(NodeKind::End).id.clone();
//! registry.connect(&start, &end);
//!
//! assert!(validate(registry.workflow()).is_empty());
//! let result = LocalSimulator::new().run(registry.snapshot()).await?;
//! ```

pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod registry;
pub mod simulate;
pub mod types;
pub mod validation;

// Re-export key types
pub use builder::WorkflowBuilder;
pub use catalog::{Automation, AutomationCatalog, BuiltinAutomations};
pub use config::{
    ApprovalConfig, ApproverRole, AutomatedConfig, CustomField, EndConfig, NodeConfig, StartConfig,
    TaskConfig,
};
pub use error::{DesignerError, ImportError, Result, SimulationError};
pub use registry::WorkflowRegistry;
pub use simulate::{ExecutionStep, LocalSimulator, SimulationBackend, SimulationResult, StepStatus};
pub use types::{EdgeId, NodeId, NodeKind, Workflow, WorkflowEdge, WorkflowNode};
pub use validation::{validate, validate_extended, ValidationError};
