//! Integration tests for Shindan
//!
//! End-to-end tests that load workflow exports, analyze them and render reports.
//!
mod common;
use common::*;
use serde_json::Value;
use shindan::error::WorkflowConversionError;
use shindan::prelude::*;
use std::fs;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_sample_export_end_to_end() {
        let workflow =
            WorkflowDefinition::from_json_str(SAMPLE_WORKFLOW_JSON).expect("Failed to load sample");
        let report = Analyzer::default().analyze(&workflow);

        let info = &report.basic_info;
        assert_eq!(info.name, "YouTube to Post");
        assert_eq!(info.node_count, 7);
        assert_eq!(info.connection_count, 6);
        assert_eq!(info.node_types.get("httpRequest"), Some(&2));
        assert!(info.is_active);
        assert!(info.has_trigger);
        assert!(info.has_error_handling);

        assert_eq!(
            report.structure.longest_path,
            vec!["wh", "dl", "ok", "llm", "save", "reply"]
        );
        assert_eq!(report.structure.exit_nodes, vec!["fail", "reply"]);
        assert_eq!(report.complexity.cyclomatic_complexity, 1);
        // if (2) + stopAndError (1) + one branch point (1)
        assert_eq!(report.complexity.cognitive_complexity, 4);

        assert_eq!(report.performance.estimated_execution_time, "5s");
        let slow: Vec<_> = report.bottlenecks.iter().map(|b| b.node_id.as_str()).collect();
        assert_eq!(slow, vec!["dl", "llm", "save"]);

        let security: Vec<_> = report
            .security
            .issues
            .iter()
            .map(|f| (f.node.as_str(), f.issue.as_str()))
            .collect();
        assert_eq!(
            security,
            vec![
                ("dl", "Using insecure HTTP"),
                ("save", "Potential SQL injection risk"),
            ]
        );
        assert!(report.security.has_authentication);
        assert!(report.security.uses_credentials);

        assert!(report.validation.valid);
        assert_eq!(report.best_practices.len(), 1);
        assert_eq!(report.best_practices[0].issue, "No logging");
    }

    #[test]
    fn test_json_report_has_nine_sections() {
        let workflow =
            WorkflowDefinition::from_json_str(SAMPLE_WORKFLOW_JSON).expect("Failed to load sample");
        let report = Analyzer::default().analyze(&workflow);

        let rendered = ReportFormatter::json(&report).expect("Failed to serialize report");
        let value: Value = serde_json::from_str(&rendered).expect("Report is not valid JSON");
        let object = value.as_object().expect("Report is not an object");

        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "basic_info",
                "best_practices",
                "bottlenecks",
                "complexity",
                "optimizations",
                "performance",
                "security",
                "structure",
                "validation",
            ]
        );
        assert_eq!(value["complexity"]["complexity_level"], "Simple");
        assert_eq!(value["security"]["issues"][0]["severity"], "medium");
        assert_eq!(value["bottlenecks"][0]["type"], "performance");
    }

    #[test]
    fn test_markdown_report_sections() {
        let report = Analyzer::default().analyze(&cyclic_workflow());
        let text = ReportFormatter::markdown(&report);

        assert!(text.starts_with("# Workflow Analysis Report"));
        for heading in [
            "## Basic Information",
            "## Structure",
            "## Complexity Analysis",
            "## Performance Analysis",
            "## Validation",
        ] {
            assert!(text.contains(heading), "missing {}", heading);
        }
        assert!(text.contains("- **Has Cycles**: true"));
    }

    #[test]
    fn test_analyze_file_and_load_errors() {
        let dir = tempfile::tempdir().expect("temp dir");
        let analyzer = Analyzer::default();

        let path = dir.path().join("workflow.json");
        fs::write(&path, SAMPLE_WORKFLOW_JSON).expect("write workflow");
        let report = analyzer.analyze_file(&path).expect("Failed to analyze file");
        assert_eq!(report.basic_info.node_count, 7);

        let missing = analyzer.analyze_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(LoadError::Io { .. })));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ \"nodes\": [").expect("write workflow");
        assert!(matches!(
            analyzer.analyze_file(&broken),
            Err(LoadError::JsonParseError(_))
        ));
    }

    #[test]
    fn test_duplicate_node_ids_fail_to_load() {
        let json = r#"{
            "name": "Twins",
            "nodes": [
                {"id": "x", "name": "One", "type": "n8n-nodes-base.set"},
                {"id": "x", "name": "Two", "type": "n8n-nodes-base.set"}
            ],
            "connections": {}
        }"#;
        let result = WorkflowDefinition::from_json_str(json);
        assert!(matches!(
            result,
            Err(LoadError::Conversion(WorkflowConversionError::DuplicateNodeId(ref id))) if id == "x"
        ));
    }

    #[test]
    fn test_minimal_document_defaults() {
        let json = r#"{"nodes": [{"id": "only", "type": "n8n-nodes-base.manualTrigger"}]}"#;
        let workflow = WorkflowDefinition::from_json_str(json).expect("Failed to load");
        let report = Analyzer::default().analyze(&workflow);

        assert_eq!(report.basic_info.name, "");
        assert!(report.basic_info.has_trigger);
        assert_eq!(report.basic_info.connection_count, 0);
        assert_eq!(report.structure.longest_path, vec!["only"]);
        assert_eq!(report.complexity.cyclomatic_complexity, 1);
    }

    #[test]
    fn test_builder_document_round_trip() {
        let mut builder = WorkflowBuilder::new();
        let hook = builder.webhook("/test", "POST");
        let code = builder.code("return items;", "Process Data");
        let respond = builder.respond("json");
        builder
            .chain(&[&hook, &code, &respond])
            .expect("Failed to chain nodes");
        let document = builder.build(Some("Sample Workflow"));

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("built.json");
        document.save(&path).expect("Failed to save workflow");

        let report = Analyzer::default()
            .analyze_file(&path)
            .expect("Failed to analyze built workflow");
        assert_eq!(report.basic_info.name, "Sample Workflow");
        assert_eq!(report.structure.longest_path, vec![hook, code, respond.clone()]);
        assert_eq!(report.complexity.cognitive_complexity, 2);
        assert!(report.validation.valid);

        // "Respond to Webhook" is the platform's default label.
        assert!(
            report
                .best_practices
                .iter()
                .any(|r| r.node.as_deref() == Some(respond.as_str()))
        );
    }

    #[test]
    fn test_custom_format_via_into_workflow() {
        struct Step {
            key: &'static str,
            kind: &'static str,
            next: Option<&'static str>,
        }

        struct Pipeline {
            steps: Vec<Step>,
        }

        impl IntoWorkflow for Pipeline {
            fn into_workflow(self) -> std::result::Result<WorkflowDefinition, WorkflowConversionError> {
                let mut workflow = WorkflowDefinition {
                    name: "Pipeline".to_string(),
                    ..Default::default()
                };
                for step in self.steps {
                    if let Some(next) = step.next {
                        workflow
                            .connections
                            .push(ConnectionDefinition::main(step.key, next));
                    }
                    workflow
                        .nodes
                        .push(NodeDefinition::new(step.key, step.kind, step.key));
                }
                Ok(workflow)
            }
        }

        let pipeline = Pipeline {
            steps: vec![
                Step { key: "start", kind: "acme.cronTrigger", next: Some("fetch") },
                Step { key: "fetch", kind: "acme.httpCall", next: None },
            ],
        };
        let workflow = pipeline.into_workflow().expect("Failed to convert");
        let report = Analyzer::default().analyze(&workflow);

        assert!(report.basic_info.has_trigger);
        assert_eq!(report.structure.longest_path, vec!["start", "fetch"]);
        assert_eq!(report.performance.estimated_execution_time, "2s");
    }
}
