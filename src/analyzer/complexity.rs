use super::AnalysisContext;
use crate::report::{ComplexityReport, StructureReport};

/// McCabe's `E - N + 2P` over the workflow graph, plus the weighted
/// cognitive score.
pub(super) fn analyze_complexity(ctx: &AnalysisContext, structure: &StructureReport) -> ComplexityReport {
    let edge_count = ctx.workflow.connections.len();
    let node_count = ctx.workflow.nodes.len();
    let components = structure.components.len();

    let cyclomatic = edge_count as i64 - node_count as i64 + 2 * components as i64;

    let max_node_connections = ctx
        .graph
        .node_ids()
        .map(|id| ctx.graph.degree(id))
        .max()
        .unwrap_or(0);

    ComplexityReport {
        cyclomatic_complexity: cyclomatic,
        cognitive_complexity: cognitive_complexity(ctx, structure.branch_points.len()),
        complexity_level: ctx.heuristics.complexity_level(cyclomatic),
        edge_count,
        node_count,
        average_connections: if node_count > 0 {
            edge_count as f64 / node_count as f64
        } else {
            0.0
        },
        max_node_connections,
    }
}

fn cognitive_complexity(ctx: &AnalysisContext, branch_points: usize) -> u32 {
    let weights = &ctx.heuristics.cognitive;
    let mut score = 0;

    for (_, traits) in ctx.nodes() {
        // Control-flow categories are exclusive, first match wins.
        if traits.conditional {
            score += weights.conditional;
        } else if traits.switch {
            score += weights.switch;
        } else if traits.looping {
            score += weights.looping;
        }
        if traits.error_handling {
            score += weights.error_handling;
        }
        if traits.code {
            score += weights.code;
        }
    }

    score + branch_points as u32 * weights.branch_point
}
