use crate::error::{LoadError, WorkflowConversionError};
use crate::workflow::{IntoWorkflow, WorkflowDocument};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// The canonical, normalized form of a workflow, ready for analysis.
/// This is the target structure for any custom document conversion.
#[derive(Debug, Clone, Default)]
pub struct WorkflowDefinition {
    pub name: String,
    pub active: bool,
    pub nodes: Vec<NodeDefinition>,
    pub connections: Vec<ConnectionDefinition>,
}

/// A single step of the workflow.
#[derive(Debug, Clone, Default)]
pub struct NodeDefinition {
    pub id: String,
    pub node_type: String,
    pub name: String,
    pub parameters: Map<String, Value>,
    pub credentials: Option<Value>,
    /// Layout only; never used by the analysis passes.
    pub position: (f64, f64),
}

/// A directed link from one node's output slot to another node's input slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDefinition {
    pub source: String,
    pub target: String,
    pub output_slot: String,
    pub input_slot: String,
    pub output_index: u32,
    pub input_index: u32,
}

impl ConnectionDefinition {
    /// A `main` to `main` connection on slot 0, the common case.
    pub fn main(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            output_slot: "main".to_string(),
            input_slot: "main".to_string(),
            output_index: 0,
            input_index: 0,
        }
    }
}

impl NodeDefinition {
    pub fn new(id: &str, node_type: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            node_type: node_type.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// The last dotted segment of the type, e.g. `httpRequest` for
    /// `n8n-nodes-base.httpRequest`.
    pub fn base_type(&self) -> &str {
        self.node_type.rsplit('.').next().unwrap_or(&self.node_type)
    }

    /// Returns a string parameter by key, if present.
    pub fn string_parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(Value::as_str)
    }
}

impl WorkflowDefinition {
    /// Parses a workflow document from JSON text and normalizes it.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let document: WorkflowDocument =
            serde_json::from_str(json).map_err(|e| LoadError::JsonParseError(e.to_string()))?;
        let workflow = document.into_workflow()?;
        Ok(workflow)
    }

    /// Reads and normalizes a workflow document from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let workflow = Self::from_json_str(&content)?;
        tracing::info!(
            name = %workflow.name,
            nodes = workflow.nodes.len(),
            connections = workflow.connections.len(),
            "Loaded workflow"
        );
        Ok(workflow)
    }

    pub fn find_node(&self, id: &str) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Checks that node ids are present and unique.
    pub(crate) fn ensure_unique_ids(&self) -> Result<(), WorkflowConversionError> {
        let mut seen = ahash::AHashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if node.id.is_empty() {
                return Err(WorkflowConversionError::ValidationError(format!(
                    "node '{}' has an empty id",
                    node.name
                )));
            }
            if !seen.insert(node.id.as_str()) {
                return Err(WorkflowConversionError::DuplicateNodeId(node.id.clone()));
            }
        }
        Ok(())
    }
}
