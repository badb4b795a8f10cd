use super::model::{AnalysisReport, ValidationIssue};
use chrono::{DateTime, Local};

/// Renders analysis reports as Markdown-like text or JSON.
pub struct ReportFormatter;

impl ReportFormatter {
    /// Renders the text report, stamped with the current local time.
    pub fn markdown(report: &AnalysisReport) -> String {
        Self::markdown_at(report, Local::now())
    }

    /// Renders the text report with an explicit generation time.
    pub fn markdown_at(report: &AnalysisReport, generated: DateTime<Local>) -> String {
        let mut out = String::new();
        out.push_str("# Workflow Analysis Report\n\n");
        out.push_str(&format!("Generated: {}\n\n", generated.to_rfc3339()));

        let info = &report.basic_info;
        out.push_str("## Basic Information\n");
        out.push_str(&format!("- **Name**: {}\n", Self::or_unnamed(&info.name)));
        out.push_str(&format!("- **Nodes**: {}\n", info.node_count));
        out.push_str(&format!("- **Connections**: {}\n", info.connection_count));
        out.push_str(&format!("- **Active**: {}\n", info.is_active));

        let structure = &report.structure;
        out.push_str("\n## Structure\n");
        out.push_str(&format!("- **Entry Nodes**: {}\n", Self::list(&structure.entry_nodes)));
        out.push_str(&format!("- **Exit Nodes**: {}\n", Self::list(&structure.exit_nodes)));
        out.push_str(&format!("- **Has Cycles**: {}\n", structure.has_cycles));
        out.push_str(&format!(
            "- **Longest Path** ({}): {}\n",
            structure.longest_path_length,
            if structure.longest_path.is_empty() {
                "-".to_string()
            } else {
                structure.longest_path.join(" -> ")
            }
        ));
        out.push_str(&format!("- **Components**: {}\n", structure.components.len()));

        let complexity = &report.complexity;
        out.push_str("\n## Complexity Analysis\n");
        out.push_str(&format!(
            "- **Cyclomatic Complexity**: {}\n",
            complexity.cyclomatic_complexity
        ));
        out.push_str(&format!(
            "- **Cognitive Complexity**: {}\n",
            complexity.cognitive_complexity
        ));
        out.push_str(&format!("- **Level**: {}\n", complexity.complexity_level));

        let performance = &report.performance;
        out.push_str("\n## Performance Analysis\n");
        out.push_str(&format!(
            "- **Estimated Execution Time**: {}\n",
            performance.estimated_execution_time
        ));
        out.push_str(&format!(
            "- **Performance Issues**: {}\n",
            performance.performance_issues.len()
        ));

        out.push_str("\n## Bottlenecks\n");
        for bottleneck in &report.bottlenecks {
            out.push_str(&format!("- {}: {}\n", bottleneck.node_id, bottleneck.reason));
        }

        out.push_str("\n## Optimization Suggestions\n");
        for optimization in &report.optimizations {
            out.push_str(&format!(
                "- **{}**: {}\n",
                optimization.kind, optimization.suggestion
            ));
        }

        let validation = &report.validation;
        out.push_str("\n## Validation\n");
        out.push_str(&format!("- **Valid**: {}\n", validation.valid));
        for issue in &validation.errors {
            out.push_str(&Self::issue_line("error", issue));
        }
        for issue in &validation.warnings {
            out.push_str(&Self::issue_line("warning", issue));
        }

        out.push_str("\n## Security Analysis\n");
        for issue in &report.security.issues {
            out.push_str(&format!(
                "- **{}**: {} (Node: {})\n",
                issue.severity, issue.issue, issue.node
            ));
        }

        out.push_str("\n## Best Practices\n");
        for recommendation in &report.best_practices {
            match &recommendation.node {
                Some(node) => out.push_str(&format!(
                    "- {} (Node: {}): {}\n",
                    recommendation.issue, node, recommendation.suggestion
                )),
                None => out.push_str(&format!(
                    "- {}: {}\n",
                    recommendation.issue, recommendation.suggestion
                )),
            }
        }

        out
    }

    /// Renders the structured report as pretty-printed JSON.
    pub fn json(report: &AnalysisReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }

    fn issue_line(bucket: &str, issue: &ValidationIssue) -> String {
        if issue.nodes.is_empty() {
            format!("- **{}**: {}\n", bucket, issue.message)
        } else {
            format!(
                "- **{}**: {} ({})\n",
                bucket,
                issue.message,
                issue.nodes.join(", ")
            )
        }
    }

    fn list(items: &[String]) -> String {
        if items.is_empty() {
            "-".to_string()
        } else {
            items.join(", ")
        }
    }

    fn or_unnamed(name: &str) -> &str {
        if name.is_empty() { "Unnamed" } else { name }
    }

    /// Formats seconds the way the report shows them: `7s`, `2.5s`.
    pub fn format_seconds(secs: f64) -> String {
        if secs.fract() == 0.0 {
            format!("{}s", secs as i64)
        } else {
            format!("{}s", secs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Bottleneck, BottleneckKind, Finding, Severity};

    #[test]
    fn seconds_drop_trailing_zero_fraction() {
        assert_eq!(ReportFormatter::format_seconds(7.0), "7s");
        assert_eq!(ReportFormatter::format_seconds(2.5), "2.5s");
    }

    #[test]
    fn markdown_lists_sections_and_findings() {
        let mut report = AnalysisReport::default();
        report.basic_info.name = "Demo".to_string();
        report.bottlenecks.push(Bottleneck {
            node_id: "hub".to_string(),
            node_name: None,
            kind: BottleneckKind::Structural,
            reason: "High connectivity (6 connections)".to_string(),
        });
        report.security.issues.push(Finding {
            node: "fetch".to_string(),
            issue: "Using insecure HTTP".to_string(),
            severity: Severity::Medium,
            suggestion: Some("Use HTTPS".to_string()),
        });

        let text = ReportFormatter::markdown(&report);
        assert!(text.starts_with("# Workflow Analysis Report"));
        assert!(text.contains("- **Name**: Demo"));
        assert!(text.contains("- hub: High connectivity (6 connections)"));
        assert!(text.contains("- **medium**: Using insecure HTTP (Node: fetch)"));
        assert!(text.contains("## Best Practices"));
    }

    #[test]
    fn json_has_fixed_top_level_keys() {
        let json = ReportFormatter::json(&AnalysisReport::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let mut expected = vec![
            "basic_info",
            "structure",
            "complexity",
            "performance",
            "bottlenecks",
            "optimizations",
            "validation",
            "security",
            "best_practices",
        ];
        expected.sort();
        let mut actual = keys.clone();
        actual.sort();
        assert_eq!(actual, expected);
    }
}
