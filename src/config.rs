//! Per-kind node configuration model
//!
//! Every node kind carries its own configuration variant, modeled as the
//! `NodeConfig` tagged union. The discriminant is the owning node's `kind`
//! field, so the serialized form is the bare variant object and parsing is
//! always driven by the record's kind.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::types::NodeKind;

/// A free-form key/value pair attached to Start and Task configurations.
///
/// Custom fields are order-preserving and duplicate keys are permitted; the
/// model never deduplicates. Callers needing a real mapping dedupe themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    /// Field name
    #[serde(default)]
    pub key: String,
    /// Field value
    #[serde(default)]
    pub value: String,
}

impl CustomField {
    /// Create a custom field
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Role an approval step is routed to.
///
/// Serialized as the exact display strings the approval form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApproverRole {
    /// Direct manager
    Manager,
    /// HR business partner
    #[serde(rename = "HRBP")]
    Hrbp,
    /// Department director
    Director,
    /// Vice president
    #[serde(rename = "VP")]
    Vp,
    /// C-level executive
    #[serde(rename = "C-Level")]
    CLevel,
}

impl ApproverRole {
    /// Display string, as rendered in approval subtitles
    pub fn as_str(&self) -> &'static str {
        match self {
            ApproverRole::Manager => "Manager",
            ApproverRole::Hrbp => "HRBP",
            ApproverRole::Director => "Director",
            ApproverRole::Vp => "VP",
            ApproverRole::CLevel => "C-Level",
        }
    }
}

/// Configuration for a Start node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConfig {
    /// Step title shown as the node label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-form key/value pairs.
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

/// Configuration for a Task node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    /// Step title; required for semantic completeness, enforced only by the
    /// extended validator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Longer description of the work item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Person the task is assigned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Due date (calendar date, no time component).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Free-form key/value pairs.
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

/// Configuration for an Approval node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalConfig {
    /// Step title shown as the node label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Role the approval is routed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_role: Option<ApproverRole>,
    /// Requests at or below this amount approve without review.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_approve_threshold: Option<f64>,
}

/// Configuration for an Automated node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomatedConfig {
    /// Step title shown as the node label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Id of the catalog automation to run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
    /// Parameter values keyed by the automation's parameter names.
    #[serde(default)]
    pub action_params: HashMap<String, String>,
}

/// Configuration for an End node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndConfig {
    /// Message displayed when the process completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_message: Option<String>,
    /// Whether to show a run summary at the end.
    #[serde(default)]
    pub show_summary: bool,
}

/// Kind-specific node configuration.
///
/// Exhaustive over the five node kinds; matching on it is how every config
/// consumer stays in sync with the schema at compile time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeConfig {
    /// Start node configuration
    Start(StartConfig),
    /// Task node configuration
    Task(TaskConfig),
    /// Approval node configuration
    Approval(ApprovalConfig),
    /// Automated node configuration
    Automated(AutomatedConfig),
    /// End node configuration
    End(EndConfig),
}

impl NodeConfig {
    /// Create the empty configuration variant matching a kind
    pub fn empty(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Start => NodeConfig::Start(StartConfig::default()),
            NodeKind::Task => NodeConfig::Task(TaskConfig::default()),
            NodeKind::Approval => NodeConfig::Approval(ApprovalConfig::default()),
            NodeKind::Automated => NodeConfig::Automated(AutomatedConfig::default()),
            NodeKind::End => NodeConfig::End(EndConfig::default()),
        }
    }

    /// Parse a raw JSON config against a node kind
    pub fn from_value(kind: NodeKind, value: Value) -> serde_json::Result<Self> {
        Ok(match kind {
            NodeKind::Start => NodeConfig::Start(serde_json::from_value(value)?),
            NodeKind::Task => NodeConfig::Task(serde_json::from_value(value)?),
            NodeKind::Approval => NodeConfig::Approval(serde_json::from_value(value)?),
            NodeKind::Automated => NodeConfig::Automated(serde_json::from_value(value)?),
            NodeKind::End => NodeConfig::End(serde_json::from_value(value)?),
        })
    }

    /// The node kind this configuration variant belongs to
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeConfig::Start(_) => NodeKind::Start,
            NodeConfig::Task(_) => NodeKind::Task,
            NodeConfig::Approval(_) => NodeKind::Approval,
            NodeConfig::Automated(_) => NodeKind::Automated,
            NodeConfig::End(_) => NodeKind::End,
        }
    }

    /// The configured title, if present and non-empty.
    ///
    /// End configs carry no title; their nodes keep the default label.
    pub fn title(&self) -> Option<&str> {
        let title = match self {
            NodeConfig::Start(c) => c.title.as_deref(),
            NodeConfig::Task(c) => c.title.as_deref(),
            NodeConfig::Approval(c) => c.title.as_deref(),
            NodeConfig::Automated(c) => c.title.as_deref(),
            NodeConfig::End(_) => None,
        };
        title.filter(|t| !t.is_empty())
    }

    /// Derived subtitle display hint: assignee, then approver role, else empty
    pub fn subtitle_hint(&self) -> String {
        match self {
            NodeConfig::Task(c) => c
                .assignee
                .clone()
                .filter(|a| !a.is_empty())
                .unwrap_or_default(),
            NodeConfig::Approval(c) => c
                .approver_role
                .map(|r| r.as_str().to_string())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Custom fields, for the variants that carry them (Start and Task)
    pub fn custom_fields(&self) -> Option<&[CustomField]> {
        match self {
            NodeConfig::Start(c) => Some(&c.custom_fields),
            NodeConfig::Task(c) => Some(&c.custom_fields),
            _ => None,
        }
    }

    /// Custom fields (mutable), for the variants that carry them
    pub fn custom_fields_mut(&mut self) -> Option<&mut Vec<CustomField>> {
        match self {
            NodeConfig::Start(c) => Some(&mut c.custom_fields),
            NodeConfig::Task(c) => Some(&mut c.custom_fields),
            _ => None,
        }
    }

    /// Append an empty custom field, to be edited subsequently.
    ///
    /// Returns false when this variant carries no custom fields.
    pub fn append_custom_field(&mut self) -> bool {
        match self.custom_fields_mut() {
            Some(fields) => {
                fields.push(CustomField::default());
                true
            }
            None => false,
        }
    }

    /// Overwrite the custom field at `index`, leaving every other entry and
    /// the sequence length unchanged.
    ///
    /// Returns false when this variant carries no custom fields or the index
    /// is out of range.
    pub fn set_custom_field(
        &mut self,
        index: usize,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        match self.custom_fields_mut().and_then(|f| f.get_mut(index)) {
            Some(field) => {
                field.key = key.into();
                field.value = value.into();
                true
            }
            None => false,
        }
    }
}
