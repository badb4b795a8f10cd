//! Common test utilities for building workflow definitions.
use serde_json::{Value, json};
use shindan::prelude::*;

#[allow(dead_code)]
pub fn node(id: &str, node_type: &str, name: &str) -> NodeDefinition {
    NodeDefinition::new(id, &format!("n8n-nodes-base.{}", node_type), name)
}

#[allow(dead_code)]
pub fn node_with(id: &str, node_type: &str, name: &str, parameters: Value) -> NodeDefinition {
    let mut node = node(id, node_type, name);
    if let Value::Object(map) = parameters {
        node.parameters = map;
    }
    node
}

#[allow(dead_code)]
pub fn workflow(name: &str, nodes: Vec<NodeDefinition>, edges: &[(&str, &str)]) -> WorkflowDefinition {
    WorkflowDefinition {
        name: name.to_string(),
        active: false,
        nodes,
        connections: edges
            .iter()
            .map(|(source, target)| ConnectionDefinition::main(source, target))
            .collect(),
    }
}

/// `trigger -> process -> respond`
#[allow(dead_code)]
pub fn chain_workflow() -> WorkflowDefinition {
    workflow(
        "Order Intake",
        vec![
            node_with("trigger", "webhook", "Incoming Order", json!({ "path": "orders" })),
            node("process", "set", "Normalize Order"),
            node("respond", "respondToWebhook", "Reply"),
        ],
        &[("trigger", "process"), ("process", "respond")],
    )
}

/// `hook -> check -> {fetch, store} -> merge -> reply`
#[allow(dead_code)]
pub fn branching_workflow() -> WorkflowDefinition {
    workflow(
        "Enrichment",
        vec![
            node_with("hook", "webhook", "Incoming Lead", json!({ "path": "leads" })),
            node("check", "if", "Known Customer?"),
            node_with(
                "fetch",
                "httpRequest",
                "Fetch Profile",
                json!({ "url": "https://crm.example.com/profile", "method": "GET" }),
            ),
            node_with(
                "store",
                "postgres",
                "Store Lead",
                json!({ "operation": "insert", "table": "leads" }),
            ),
            node("merge", "merge", "Join Branches"),
            node("reply", "respondToWebhook", "Reply"),
        ],
        &[
            ("hook", "check"),
            ("check", "fetch"),
            ("check", "store"),
            ("fetch", "merge"),
            ("store", "merge"),
            ("merge", "reply"),
        ],
    )
}

/// `start -> a -> b -> a`
#[allow(dead_code)]
pub fn cyclic_workflow() -> WorkflowDefinition {
    workflow(
        "Retry Loop",
        vec![
            node_with("start", "webhook", "Incoming", json!({ "path": "retry" })),
            node("a", "set", "Prepare"),
            node("b", "set", "Attempt"),
        ],
        &[("start", "a"), ("a", "b"), ("b", "a")],
    )
}

/// `count` unconnected nodes; cyclomatic complexity equals `count`.
#[allow(dead_code)]
pub fn isolated_nodes(count: usize) -> WorkflowDefinition {
    let nodes = (0..count)
        .map(|i| node(&format!("n{}", i), "set", &format!("Step {}", i)))
        .collect();
    workflow("Scattered", nodes, &[])
}

/// Asserts `E - N + 2C` against the report's own counts.
#[allow(dead_code)]
pub fn assert_cyclomatic_formula(report: &AnalysisReport) {
    let e = report.complexity.edge_count as i64;
    let n = report.complexity.node_count as i64;
    let c = report.structure.components.len() as i64;
    assert_eq!(report.complexity.cyclomatic_complexity, e - n + 2 * c);
}

#[allow(dead_code)]
pub const SAMPLE_WORKFLOW_JSON: &str = r#"{
    "name": "YouTube to Post",
    "active": true,
    "nodes": [
        {"id": "wh", "name": "Video Submitted", "type": "n8n-nodes-base.webhook", "typeVersion": 1,
         "position": [250, 300], "parameters": {"path": "youtube2post", "method": "POST"}},
        {"id": "dl", "name": "Download Transcript", "type": "n8n-nodes-base.httpRequest", "typeVersion": 4,
         "position": [450, 300], "parameters": {"url": "http://localhost:5000/transcript", "method": "POST"}},
        {"id": "ok", "name": "Transcript Found?", "type": "n8n-nodes-base.if",
         "position": [650, 300], "parameters": {}},
        {"id": "llm", "name": "Extract Quotes", "type": "n8n-nodes-base.httpRequest",
         "position": [850, 200], "parameters": {"url": "https://api.example.com/v1/chat", "authentication": "headerAuth"},
         "credentials": {"httpHeaderAuth": {"id": "1", "name": "LLM key"}}},
        {"id": "fail", "name": "Report Failure", "type": "n8n-nodes-base.stopAndError",
         "position": [850, 400], "parameters": {"errorMessage": "No transcript"}},
        {"id": "save", "name": "Save Quotes", "type": "n8n-nodes-base.postgres",
         "position": [1050, 200], "parameters": {"operation": "executeQuery",
         "query": "INSERT INTO quotes VALUES ('{{$json.quote}}')"}},
        {"id": "reply", "name": "Reply", "type": "n8n-nodes-base.respondToWebhook",
         "position": [1250, 200], "parameters": {"respondWith": "json"}}
    ],
    "connections": {
        "wh": {"main": [[{"node": "dl", "type": "main", "index": 0}]]},
        "dl": {"main": [[{"node": "ok", "type": "main", "index": 0}]]},
        "ok": {"main": [
            [{"node": "llm", "type": "main", "index": 0}],
            [{"node": "fail", "type": "main", "index": 0}]
        ]},
        "llm": {"main": [[{"node": "save", "type": "main", "index": 0}]]},
        "save": {"main": [[{"node": "reply", "type": "main", "index": 0}]]}
    }
}"#;
