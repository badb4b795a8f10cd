use super::AnalysisContext;
use crate::report::{ValidationIssue, ValidationIssueKind, ValidationReport};

/// Referential integrity, trigger presence, isolated nodes, terminal
/// inputs, required parameters and cycles. Only dangling references and
/// input-less terminal nodes are errors.
pub(super) fn validate_connections(ctx: &AnalysisContext) -> ValidationReport {
    let graph = &ctx.graph;
    let mut report = ValidationReport::default();

    for connection in graph.dangling_connections() {
        if !graph.contains(&connection.source) {
            report.error(ValidationIssue::new(
                ValidationIssueKind::DanglingSource,
                vec![connection.source.clone()],
                format!("Connection from non-existent node: {}", connection.source),
            ));
        }
        if !graph.contains(&connection.target) {
            report.error(ValidationIssue::new(
                ValidationIssueKind::DanglingTarget,
                vec![connection.target.clone()],
                format!("Connection to non-existent node: {}", connection.target),
            ));
        }
    }

    if !ctx.any(|t| t.trigger) {
        report.warning(ValidationIssue::new(
            ValidationIssueKind::MissingTrigger,
            Vec::new(),
            "No trigger node found",
        ));
    }

    let isolated: Vec<String> = graph
        .node_ids()
        .filter(|id| graph.degree(id) == 0)
        .map(str::to_string)
        .collect();
    if !isolated.is_empty() {
        report.warning(ValidationIssue::new(
            ValidationIssueKind::IsolatedNodes,
            isolated,
            "These nodes are not connected to the workflow",
        ));
    }

    for (node, traits) in ctx.nodes() {
        if traits.terminal && graph.in_degree(&node.id) == 0 {
            report.error(ValidationIssue::new(
                ValidationIssueKind::MissingInput,
                vec![node.id.clone()],
                format!("Response node '{}' needs an incoming connection", node.name),
            ));
        }

        let is_webhook = traits.trigger && node.base_type().to_lowercase().contains("webhook");
        if is_webhook && !node.parameters.contains_key("path") {
            report.warning(ValidationIssue::new(
                ValidationIssueKind::MissingParameter,
                vec![node.id.clone()],
                "Webhook node missing 'path' parameter",
            ));
        }
        if traits.network && !node.parameters.contains_key("url") {
            report.warning(ValidationIssue::new(
                ValidationIssueKind::MissingParameter,
                vec![node.id.clone()],
                "HTTP Request node missing 'url' parameter",
            ));
        }
    }

    if graph.is_cyclic() {
        let cycles = graph.cycles();
        report.warning(ValidationIssue {
            kind: ValidationIssueKind::Cycles,
            nodes: Vec::new(),
            cycles,
            message: "Workflow contains cycles".to_string(),
        });
    }

    report
}
