use super::definition::WorkflowDefinition;
use crate::error::WorkflowConversionError;

/// A trait for custom document formats that can be converted into a `WorkflowDefinition`.
///
/// The analyzer only ever sees the normalized definition: a node list plus a
/// flat edge list. Implementing this trait on your own structs is how another
/// automation platform's export format gets analyzed.
///
/// # Example
///
/// ```rust,no_run
/// use shindan::prelude::*;
/// use shindan::error::WorkflowConversionError;
///
/// struct Step { key: String, kind: String, next: Option<String> }
/// struct Pipeline { steps: Vec<Step> }
///
/// impl IntoWorkflow for Pipeline {
///     fn into_workflow(self) -> std::result::Result<WorkflowDefinition, WorkflowConversionError> {
///         let mut workflow = WorkflowDefinition::default();
///         for step in self.steps {
///             if let Some(next) = &step.next {
///                 workflow.connections.push(ConnectionDefinition::main(&step.key, next));
///             }
///             workflow.nodes.push(NodeDefinition::new(&step.key, &step.kind, &step.key));
///         }
///         Ok(workflow)
///     }
/// }
/// ```
pub trait IntoWorkflow {
    /// Consumes the object and converts it into an analyzable workflow.
    fn into_workflow(self) -> Result<WorkflowDefinition, WorkflowConversionError>;
}
