use super::{AnalysisContext, node_blob, parameter_blob};
use crate::error::AnalysisError;
use crate::heuristics::contains_any;
use crate::report::{Finding, Recommendation, SecurityReport, Severity};

/// Substring heuristics over parameter content. False positives and
/// negatives are expected.
pub(super) fn analyze_security(ctx: &AnalysisContext) -> Result<SecurityReport, AnalysisError> {
    let rules = &ctx.heuristics.security;
    let mut issues = Vec::new();
    let mut has_authentication = false;

    for (node, traits) in ctx.nodes() {
        if contains_any(&parameter_blob(node)?, &rules.credential_keywords) {
            issues.push(Finding {
                node: node.id.clone(),
                issue: "Possible hardcoded credentials".to_string(),
                severity: Severity::High,
                suggestion: None,
            });
        }

        if traits.datastore {
            let query = node.string_parameter("query").unwrap_or_default();
            let prepared = node
                .parameters
                .keys()
                .any(|key| key.to_lowercase().contains(&rules.prepared_marker.to_lowercase()));
            if query.contains(&rules.template_marker) && !prepared {
                issues.push(Finding {
                    node: node.id.clone(),
                    issue: "Potential SQL injection risk".to_string(),
                    severity: Severity::High,
                    suggestion: Some("Use prepared statements".to_string()),
                });
            }
        }

        if traits.network {
            let url = node.string_parameter("url").unwrap_or_default();
            if url.to_lowercase().starts_with(&rules.insecure_scheme.to_lowercase()) {
                issues.push(Finding {
                    node: node.id.clone(),
                    issue: "Using insecure HTTP".to_string(),
                    severity: Severity::Medium,
                    suggestion: Some("Use HTTPS".to_string()),
                });
            }
        }

        if !has_authentication && node_blob(node)?.contains(&rules.auth_keyword.to_lowercase()) {
            has_authentication = true;
        }
    }

    Ok(SecurityReport {
        issues,
        has_authentication,
        uses_credentials: ctx.workflow.nodes.iter().any(|n| n.credentials.is_some()),
    })
}

pub(super) fn check_best_practices(ctx: &AnalysisContext) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    for node in &ctx.workflow.nodes {
        if !node.node_type.is_empty() && normalized(&node.name) == normalized(node.base_type()) {
            recommendations.push(Recommendation {
                node: Some(node.id.clone()),
                issue: "Node using default name".to_string(),
                suggestion: "Give descriptive names to nodes".to_string(),
            });
        }
    }

    if ctx.workflow.name.trim().is_empty() {
        recommendations.push(Recommendation {
            node: None,
            issue: "Workflow has no name".to_string(),
            suggestion: "Give a descriptive name to the workflow".to_string(),
        });
    }

    if !ctx.any(|t| t.error_handling) {
        recommendations.push(Recommendation {
            node: None,
            issue: "No error handling".to_string(),
            suggestion: "Add error handling for reliability".to_string(),
        });
    }

    if !ctx.any(|t| t.logging) {
        recommendations.push(Recommendation {
            node: None,
            issue: "No logging".to_string(),
            suggestion: "Consider adding logging for debugging".to_string(),
        });
    }

    recommendations
}

/// `HTTP Request` and `httpRequest` compare equal.
fn normalized(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
