use crate::error::{AnalysisError, LoadError};
use crate::graph::WorkflowGraph;
use crate::heuristics::{HeuristicTable, NodeTraits};
use crate::report::AnalysisReport;
use crate::workflow::{NodeDefinition, WorkflowDefinition};
use serde_json::json;
use std::path::Path;

mod complexity;
mod performance;
mod security;
mod structure;
mod validation;

/// Runs every analysis pass over a workflow and aggregates the results.
///
/// An `Analyzer` holds no per-run state and can be reused for any number
/// of workflows.
pub struct Analyzer {
    heuristics: HeuristicTable,
}

pub struct AnalyzerBuilder {
    heuristics: HeuristicTable,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            heuristics: HeuristicTable::default(),
        }
    }

    pub fn with_heuristics(mut self, heuristics: HeuristicTable) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Adds a keyword to the slow-operation list used for critical-path bottlenecks.
    pub fn with_slow_keyword(mut self, keyword: &str) -> Self {
        self.heuristics
            .bottleneck
            .slow_keywords
            .push(keyword.to_lowercase());
        self
    }

    pub fn build(self) -> Analyzer {
        Analyzer {
            heuristics: self.heuristics,
        }
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        AnalyzerBuilder::new().build()
    }
}

impl Analyzer {
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    pub fn heuristics(&self) -> &HeuristicTable {
        &self.heuristics
    }

    /// Loads a workflow file and analyzes it.
    ///
    /// Load failures are logged and handed back to the caller; nothing is
    /// analyzed in that case.
    pub fn analyze_file(&self, path: impl AsRef<Path>) -> Result<AnalysisReport, LoadError> {
        let workflow = WorkflowDefinition::from_file(path).inspect_err(|e| {
            tracing::error!(error = %e, "Failed to load workflow");
        })?;
        Ok(self.analyze(&workflow))
    }

    /// Builds the graph and runs every pass. Passes are independent: a
    /// failing pass is logged and replaced by its empty result.
    pub fn analyze(&self, workflow: &WorkflowDefinition) -> AnalysisReport {
        tracing::info!(name = %workflow.name, "Starting workflow analysis");
        let ctx = AnalysisContext::new(workflow, &self.heuristics);

        let structure = structure::analyze_structure(&ctx);
        let report = AnalysisReport {
            basic_info: structure::basic_info(&ctx),
            complexity: complexity::analyze_complexity(&ctx, &structure),
            performance: guarded("performance", performance::analyze_performance(&ctx)),
            bottlenecks: performance::find_bottlenecks(&ctx),
            optimizations: performance::suggest_optimizations(&ctx),
            validation: validation::validate_connections(&ctx),
            security: guarded("security", security::analyze_security(&ctx)),
            best_practices: security::check_best_practices(&ctx),
            structure,
        };

        tracing::debug!(
            errors = report.validation.errors.len(),
            warnings = report.validation.warnings.len(),
            "Workflow analysis finished"
        );
        report
    }
}

/// Degrades a failed pass to its default result.
fn guarded<T: Default>(pass: &str, result: Result<T, AnalysisError>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(pass, error = %e, "Analysis pass skipped");
        T::default()
    })
}

/// Shared, read-only inputs for one analysis run.
pub(crate) struct AnalysisContext<'a> {
    pub workflow: &'a WorkflowDefinition,
    pub graph: WorkflowGraph,
    pub heuristics: &'a HeuristicTable,
    /// Parallel to `workflow.nodes`.
    pub traits: Vec<NodeTraits>,
    pub longest_path: Result<Vec<String>, AnalysisError>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(workflow: &'a WorkflowDefinition, heuristics: &'a HeuristicTable) -> Self {
        let graph = WorkflowGraph::build(workflow);
        let traits = workflow
            .nodes
            .iter()
            .map(|node| heuristics.classify(node))
            .collect();
        let longest_path = graph.longest_path();
        Self {
            workflow,
            graph,
            heuristics,
            traits,
            longest_path,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&'a NodeDefinition, NodeTraits)> + '_ {
        self.workflow.nodes.iter().zip(self.traits.iter().copied())
    }

    pub fn any(&self, predicate: impl Fn(&NodeTraits) -> bool) -> bool {
        self.traits.iter().any(predicate)
    }

    /// Nodes with more than one distinct successor. Parallel duplicate
    /// edges to the same target do not make a branch.
    pub fn branch_points(&self) -> Vec<String> {
        self.graph
            .node_ids()
            .filter(|id| self.graph.successors(id).len() > 1)
            .map(str::to_string)
            .collect()
    }

    /// Distinct successor groups of every branch point, first occurrence wins.
    pub fn parallel_groups(&self) -> Vec<Vec<String>> {
        let mut groups: Vec<Vec<String>> = Vec::new();
        for id in self.branch_points() {
            let successors: Vec<String> = self
                .graph
                .successors(&id)
                .into_iter()
                .map(str::to_string)
                .collect();
            if !groups.contains(&successors) {
                groups.push(successors);
            }
        }
        groups
    }
}

/// Lowercased JSON text of a node, used by the substring heuristics.
pub(crate) fn node_blob(node: &NodeDefinition) -> Result<String, AnalysisError> {
    let value = json!({
        "id": node.id,
        "name": node.name,
        "type": node.node_type,
        "parameters": node.parameters,
        "credentials": node.credentials,
    });
    serde_json::to_string(&value)
        .map(|text| text.to_lowercase())
        .map_err(|e| AnalysisError::ParameterSerialization {
            node_id: node.id.clone(),
            message: e.to_string(),
        })
}

/// Lowercased JSON text of a node's parameter bag only.
pub(crate) fn parameter_blob(node: &NodeDefinition) -> Result<String, AnalysisError> {
    serde_json::to_string(&node.parameters)
        .map(|text| text.to_lowercase())
        .map_err(|e| AnalysisError::ParameterSerialization {
            node_id: node.id.clone(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guarded_substitutes_default_on_error() {
        let value: Vec<String> = guarded("test", Err(AnalysisError::CyclicGraph("a".to_string())));
        assert!(value.is_empty());
        let kept: Vec<u8> = guarded("test", Ok(vec![1]));
        assert_eq!(kept, vec![1]);
    }

    #[test]
    fn builder_extends_slow_keywords() {
        let analyzer = Analyzer::builder().with_slow_keyword("Slack").build();
        assert!(
            analyzer
                .heuristics()
                .bottleneck
                .slow_keywords
                .contains(&"slack".to_string())
        );
    }
}
