//! Validation tests
//!
//! Referential integrity, trigger presence and required-parameter checks.
//!
mod common;
use common::*;
use serde_json::json;
use shindan::prelude::*;

fn kinds(issues: &[shindan::report::ValidationIssue]) -> Vec<ValidationIssueKind> {
    issues.iter().map(|i| i.kind).collect()
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_terminal_without_input_is_the_only_error() {
        let workflow = workflow(
            "Detached Reply",
            vec![
                node_with("hook", "webhook", "Incoming", json!({ "path": "in" })),
                node("reply", "respondToWebhook", "Reply"),
            ],
            &[],
        );

        let report = Analyzer::default().analyze(&workflow);

        assert!(!report.validation.valid);
        assert_eq!(report.validation.errors.len(), 1);
        let error = &report.validation.errors[0];
        assert_eq!(error.kind, ValidationIssueKind::MissingInput);
        assert_eq!(error.nodes, vec!["reply"]);
        // Both nodes are also unconnected.
        assert!(kinds(&report.validation.warnings).contains(&ValidationIssueKind::IsolatedNodes));
    }

    #[test]
    fn test_response_node_is_not_a_trigger() {
        let workflow = workflow(
            "Reply Only",
            vec![
                node("shape", "set", "Shape"),
                node("reply", "respondToWebhook", "Reply"),
            ],
            &[("shape", "reply")],
        );

        let report = Analyzer::default().analyze(&workflow);
        assert!(!report.basic_info.has_trigger);
        assert!(kinds(&report.validation.warnings).contains(&ValidationIssueKind::MissingTrigger));
        assert!(report.validation.valid);
    }

    #[test]
    fn test_dangling_references_are_errors() {
        let mut workflow = chain_workflow();
        workflow
            .connections
            .push(ConnectionDefinition::main("ghost_source", "process"));
        workflow
            .connections
            .push(ConnectionDefinition::main("respond", "ghost_target"));

        let report = Analyzer::default().analyze(&workflow);

        assert!(!report.validation.valid);
        assert_eq!(
            kinds(&report.validation.errors),
            vec![
                ValidationIssueKind::DanglingSource,
                ValidationIssueKind::DanglingTarget
            ]
        );
        assert_eq!(report.validation.errors[0].nodes, vec!["ghost_source"]);
        assert_eq!(report.validation.errors[1].nodes, vec!["ghost_target"]);
    }

    #[test]
    fn test_missing_required_parameters_are_warnings() {
        let workflow = workflow(
            "Half Configured",
            vec![
                node("hook", "webhook", "Incoming"),
                node("call", "httpRequest", "Call Service"),
            ],
            &[("hook", "call")],
        );

        let report = Analyzer::default().analyze(&workflow);
        let missing: Vec<_> = report
            .validation
            .warnings
            .iter()
            .filter(|w| w.kind == ValidationIssueKind::MissingParameter)
            .flat_map(|w| w.nodes.clone())
            .collect();

        assert_eq!(missing, vec!["hook", "call"]);
        assert!(report.validation.valid);
    }

    #[test]
    fn test_self_loop_is_reported_as_cycle() {
        let mut workflow = chain_workflow();
        workflow
            .connections
            .push(ConnectionDefinition::main("process", "process"));

        let report = Analyzer::default().analyze(&workflow);
        assert!(report.structure.has_cycles);
        let cycles: Vec<_> = report.validation.cycles().cloned().collect();
        assert_eq!(cycles, vec![vec!["process".to_string()]]);
    }

    #[test]
    fn test_cycles_sharing_a_node_are_reported_separately() {
        let workflow = workflow(
            "Two Retries",
            vec![
                node_with("hook", "webhook", "Incoming", json!({ "path": "retry" })),
                node("a", "set", "Dispatch"),
                node("b", "set", "Retry Upstream"),
                node("c", "set", "Retry Downstream"),
            ],
            &[("hook", "a"), ("a", "b"), ("b", "a"), ("a", "c"), ("c", "a")],
        );

        let report = Analyzer::default().analyze(&workflow);
        let cycles: Vec<_> = report.validation.cycles().cloned().collect();
        assert_eq!(
            cycles,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["a".to_string(), "c".to_string()],
            ]
        );
    }

    #[test]
    fn test_well_formed_workflow_has_no_warnings() {
        let mut workflow = chain_workflow();
        workflow.nodes[1] = node("process", "stopAndError", "Reject Invalid");

        let report = Analyzer::default().analyze(&workflow);
        assert!(report.validation.valid);
        assert!(report.validation.errors.is_empty());
        assert!(report.validation.warnings.is_empty());
    }
}
