use super::AnalysisContext;
use crate::graph::WorkflowGraph;
use crate::report::{BasicInfo, StructureReport};
use std::collections::BTreeMap;

pub(super) fn basic_info(ctx: &AnalysisContext) -> BasicInfo {
    let workflow = ctx.workflow;
    let mut node_types: BTreeMap<String, usize> = BTreeMap::new();
    for node in &workflow.nodes {
        let base = if node.node_type.is_empty() {
            "unknown"
        } else {
            node.base_type()
        };
        *node_types.entry(base.to_string()).or_default() += 1;
    }

    BasicInfo {
        name: workflow.name.clone(),
        node_count: workflow.nodes.len(),
        connection_count: workflow.connections.len(),
        node_types,
        is_active: workflow.active,
        has_trigger: ctx.any(|t| t.trigger),
        has_error_handling: ctx.any(|t| t.error_handling),
    }
}

pub(super) fn analyze_structure(ctx: &AnalysisContext) -> StructureReport {
    let graph = &ctx.graph;
    let longest_path = match &ctx.longest_path {
        Ok(path) => path.clone(),
        Err(e) => {
            tracing::debug!(reason = %e, "Longest path undefined");
            Vec::new()
        }
    };
    let components = graph.weakly_connected_components();

    StructureReport {
        entry_nodes: ids_where(graph, |id| graph.in_degree(id) == 0),
        exit_nodes: ids_where(graph, |id| graph.out_degree(id) == 0),
        has_cycles: graph.is_cyclic(),
        longest_path_length: longest_path.len(),
        longest_path,
        branch_points: ctx.branch_points(),
        merge_points: ids_where(graph, |id| graph.predecessors(id).len() > 1),
        is_connected: components.len() == 1,
        components,
    }
}

fn ids_where(graph: &WorkflowGraph, predicate: impl Fn(&str) -> bool) -> Vec<String> {
    graph
        .node_ids()
        .filter(|id| predicate(*id))
        .map(str::to_string)
        .collect()
}
