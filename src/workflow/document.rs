use super::conversion::IntoWorkflow;
use super::definition::{ConnectionDefinition, NodeDefinition, WorkflowDefinition};
use crate::error::{BuildError, WorkflowConversionError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// `source id -> output slot -> [output index] -> [targets]`
pub type ConnectionMap = BTreeMap<String, BTreeMap<String, Vec<Vec<ConnectionTarget>>>>;

// --- JSON Shapes (Host Platform Export Format) ---
// These mirror the workflow export format and are converted into the
// canonical `WorkflowDefinition` before any analysis runs.

/// A workflow as exported by the automation platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub connections: ConnectionMap,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeDocument {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(rename = "typeVersion", default = "default_type_version")]
    pub type_version: f64,
    #[serde(default)]
    pub position: Vec<f64>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One entry of a slot list: where a connection lands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionTarget {
    pub node: String,
    #[serde(rename = "type", default = "default_slot")]
    pub input_slot: String,
    #[serde(default)]
    pub index: u32,
}

fn default_type_version() -> f64 {
    1.0
}

fn default_slot() -> String {
    "main".to_string()
}

impl WorkflowDocument {
    /// Counts every connection entry in the nested map.
    pub fn connection_count(&self) -> usize {
        self.connections
            .values()
            .flat_map(|outputs| outputs.values())
            .flatten()
            .map(Vec::len)
            .sum()
    }

    /// Writes the document as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BuildError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BuildError::Serialization(e.to_string()))?;
        fs::write(path, json).map_err(|e| BuildError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::info!(path = %path.display(), "Workflow saved");
        Ok(())
    }
}

// --- Converter Implementation ---
// Flattens the slot-indexed nested connection lists into one edge per entry.

impl IntoWorkflow for WorkflowDocument {
    fn into_workflow(self) -> Result<WorkflowDefinition, WorkflowConversionError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|raw_node| NodeDefinition {
                id: raw_node.id,
                node_type: raw_node.node_type,
                name: raw_node.name,
                parameters: raw_node.parameters,
                credentials: raw_node.credentials,
                position: match raw_node.position.as_slice() {
                    [x, y, ..] => (*x, *y),
                    _ => (0.0, 0.0),
                },
            })
            .collect();

        let mut connections = Vec::new();
        for (source, outputs) in self.connections {
            for (output_slot, slot_lists) in outputs {
                for (output_index, targets) in slot_lists.into_iter().enumerate() {
                    for target in targets {
                        connections.push(ConnectionDefinition {
                            source: source.clone(),
                            target: target.node,
                            output_slot: output_slot.clone(),
                            input_slot: target.input_slot,
                            output_index: output_index as u32,
                            input_index: target.index,
                        });
                    }
                }
            }
        }

        let workflow = WorkflowDefinition {
            name: self.name,
            active: self.active,
            nodes,
            connections,
        };
        workflow.ensure_unique_ids()?;
        Ok(workflow)
    }
}
