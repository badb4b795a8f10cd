use super::{AnalysisContext, node_blob};
use crate::error::AnalysisError;
use crate::report::{
    Bottleneck, BottleneckKind, Finding, Optimization, OptimizationKind, PerformanceReport,
    ReportFormatter, Severity,
};
use crate::workflow::NodeDefinition;
use serde_json::Value;
use std::collections::BTreeMap;

/// Sums fixed per-category time estimates. This is an order-of-magnitude
/// signal, not a timing model.
pub(super) fn analyze_performance(ctx: &AnalysisContext) -> Result<PerformanceReport, AnalysisError> {
    let estimates = &ctx.heuristics.performance;
    let mut issues = Vec::new();
    let mut estimated = 0.0;

    for (node, traits) in ctx.nodes() {
        let (issue, severity, secs) = if traits.network {
            (
                "External API call - potential latency".to_string(),
                Severity::Medium,
                estimates.network_secs,
            )
        } else if traits.datastore {
            (
                "Database operation - check query optimization".to_string(),
                Severity::Medium,
                estimates.datastore_secs,
            )
        } else if traits.looping {
            (
                "Loop operation - potential performance bottleneck".to_string(),
                Severity::High,
                estimates.loop_secs,
            )
        } else if traits.delay {
            let secs = delay_seconds(node, &estimates.delay_parameter)
                .unwrap_or(estimates.default_delay_secs);
            (
                format!("Wait operation - {} delay", ReportFormatter::format_seconds(secs)),
                Severity::Low,
                secs,
            )
        } else {
            continue;
        };

        estimated += secs;
        issues.push(Finding {
            node: node.id.clone(),
            issue,
            severity,
            suggestion: None,
        });
    }

    let cache_keyword = ctx.heuristics.security.cache_keyword.to_lowercase();
    let mut has_caching = false;
    for node in &ctx.workflow.nodes {
        if node_blob(node)?.contains(&cache_keyword) {
            has_caching = true;
            break;
        }
    }

    Ok(PerformanceReport {
        estimated_execution_secs: estimated,
        estimated_execution_time: ReportFormatter::format_seconds(estimated),
        performance_issues: issues,
        parallelization_opportunities: ctx.parallel_groups(),
        has_batch_processing: ctx.any(|t| t.batch),
        has_caching,
    })
}

/// Reads a delay amount given either as a number or a numeric string.
/// Negative and non-finite amounts are treated as missing.
fn delay_seconds(node: &NodeDefinition, key: &str) -> Option<f64> {
    let secs = match node.parameters.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (secs.is_finite() && secs >= 0.0).then_some(secs)
}

pub(super) fn find_bottlenecks(ctx: &AnalysisContext) -> Vec<Bottleneck> {
    let mut bottlenecks = Vec::new();

    match &ctx.longest_path {
        Ok(critical_path) => {
            for node_id in critical_path {
                let Some(node) = ctx.workflow.find_node(node_id) else {
                    continue;
                };
                if ctx.heuristics.is_slow(node) {
                    bottlenecks.push(Bottleneck {
                        node_id: node_id.clone(),
                        node_name: Some(node.name.clone()),
                        kind: BottleneckKind::Performance,
                        reason: "Slow operation on critical path".to_string(),
                    });
                }
            }
        }
        Err(e) => tracing::debug!(reason = %e, "Critical-path bottlenecks skipped"),
    }

    let max_degree = ctx.heuristics.bottleneck.max_degree;
    for id in ctx.graph.node_ids() {
        let degree = ctx.graph.degree(id);
        if degree > max_degree {
            bottlenecks.push(Bottleneck {
                node_id: id.to_string(),
                node_name: None,
                kind: BottleneckKind::Structural,
                reason: format!("High connectivity ({} connections)", degree),
            });
        }
    }

    bottlenecks
}

pub(super) fn suggest_optimizations(ctx: &AnalysisContext) -> Vec<Optimization> {
    let mut optimizations = Vec::new();

    if !ctx.any(|t| t.batch) {
        let loop_nodes: Vec<String> = ctx
            .nodes()
            .filter(|(_, t)| t.looping)
            .map(|(n, _)| n.id.clone())
            .collect();
        if !loop_nodes.is_empty() {
            optimizations.push(Optimization {
                kind: OptimizationKind::BatchProcessing,
                suggestion: "Consider using Split In Batches node for better performance"
                    .to_string(),
                nodes: loop_nodes,
                groups: Vec::new(),
                priority: None,
            });
        }
    }

    let groups = ctx.parallel_groups();
    if !groups.is_empty() {
        optimizations.push(Optimization {
            kind: OptimizationKind::Parallelization,
            suggestion: "These operations can run in parallel".to_string(),
            nodes: Vec::new(),
            groups,
            priority: None,
        });
    }

    if !ctx.any(|t| t.error_handling) {
        optimizations.push(Optimization {
            kind: OptimizationKind::ErrorHandling,
            suggestion: "Add error handling nodes for better reliability".to_string(),
            nodes: Vec::new(),
            groups: Vec::new(),
            priority: Some(Severity::High),
        });
    }

    let repeated = repeated_requests(ctx);
    if !repeated.is_empty() {
        optimizations.push(Optimization {
            kind: OptimizationKind::Caching,
            suggestion: "Consider caching results for repeated operations".to_string(),
            nodes: repeated,
            groups: Vec::new(),
            priority: None,
        });
    }

    optimizations
}

/// Network nodes that call a URL some other network node also calls.
fn repeated_requests(ctx: &AnalysisContext) -> Vec<String> {
    let mut by_url: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (node, traits) in ctx.nodes() {
        if !traits.network {
            continue;
        }
        if let Some(url) = node.string_parameter("url").filter(|u| !u.is_empty()) {
            by_url.entry(url).or_default().push(node.id.clone());
        }
    }

    by_url
        .into_values()
        .filter(|ids| ids.len() > 1)
        .flatten()
        .collect()
}
