use thiserror::Error;

/// Errors that can occur while loading a workflow document.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    #[error("Failed to read workflow file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse workflow JSON: {0}")]
    JsonParseError(String),

    #[error(transparent)]
    Conversion(#[from] WorkflowConversionError),
}

/// Errors that can occur when converting a custom document into a `WorkflowDefinition`.
#[derive(Error, Debug, Clone)]
pub enum WorkflowConversionError {
    #[error("Node id '{0}' is declared more than once")]
    DuplicateNodeId(String),

    #[error("Invalid workflow data: {0}")]
    ValidationError(String),
}

/// Errors raised inside a single analysis pass.
///
/// These never abort a whole analysis run; the analyzer degrades the
/// failing pass to its default result.
#[derive(Error, Debug, Clone)]
pub enum AnalysisError {
    #[error("Workflow graph contains a cycle through node '{0}'")]
    CyclicGraph(String),

    #[error("Parameters of node '{node_id}' could not be serialized: {message}")]
    ParameterSerialization { node_id: String, message: String },
}

/// Errors that can occur while loading a heuristic table.
#[derive(Error, Debug, Clone)]
pub enum HeuristicsError {
    #[error("Failed to read heuristics file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse heuristics TOML: {0}")]
    TomlParseError(String),
}

/// Errors produced by the programmatic workflow builder.
#[derive(Error, Debug, Clone)]
pub enum BuildError {
    #[error("Node '{0}' not found in the workflow under construction")]
    NodeNotFound(String),

    #[error("At least two nodes are needed to build a chain, got {0}")]
    ChainTooShort(usize),

    #[error("Failed to write workflow to '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to serialize workflow: {0}")]
    Serialization(String),
}
