//! Automation catalog for Automated nodes
//!
//! Automated nodes reference actions by id; the catalog is the external
//! collaborator that supplies the selectable actions and their parameter
//! names. The core only reads descriptors to resolve an `actionId` into a
//! display label and parameter list. It never runs the underlying action.

use serde::{Deserialize, Serialize};

/// Descriptor of a selectable automated action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Automation {
    /// Stable identifier referenced by `AutomatedConfig::action_id`
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Ordered parameter names the action expects
    pub params: Vec<String>,
}

impl Automation {
    /// Create an automation descriptor
    pub fn new(id: impl Into<String>, label: impl Into<String>, params: &[&str]) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Source of automation descriptors.
///
/// Read once to populate the Automated-node configuration choices. A source
/// that cannot reach its backing store returns an empty list (the form simply
/// offers no action choices, which is not fatal) rather than failing.
pub trait AutomationCatalog: Send + Sync {
    /// All selectable automations, in display order
    fn list(&self) -> Vec<Automation>;

    /// Resolve one automation by id
    fn find(&self, id: &str) -> Option<Automation> {
        self.list().into_iter().find(|a| a.id == id)
    }
}

/// The built-in catalog of HR automations.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinAutomations;

impl AutomationCatalog for BuiltinAutomations {
    fn list(&self) -> Vec<Automation> {
        vec![
            Automation::new("send_email", "Send Email", &["to", "subject", "body"]),
            Automation::new(
                "generate_doc",
                "Generate Document",
                &["template", "recipient"],
            ),
            Automation::new("send_slack", "Send Slack Message", &["channel", "message"]),
            Automation::new("create_ticket", "Create Ticket", &["title", "priority"]),
        ]
    }
}
