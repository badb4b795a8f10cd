use super::document::{ConnectionMap, ConnectionTarget, NodeDocument, WorkflowDocument};
use crate::error::BuildError;
use serde_json::{Map, Value, json};

/// Defines the alias table and the lookup function in one place.
macro_rules! define_node_catalog {
    ( $( ($alias:expr, $node_type:expr) ),* $(,)? ) => {
        /// Every short alias the builder understands, with its platform type.
        pub const NODE_CATALOG: &[(&str, &str)] = &[ $( ($alias, $node_type), )* ];

        /// Resolves a short alias such as `http` to its fully-qualified type.
        /// Unknown aliases are assumed to already be full type names.
        pub fn resolve_node_type(alias: &str) -> &str {
            match alias {
                $( $alias => $node_type, )*
                other => other,
            }
        }
    };
}

define_node_catalog! {
    // Triggers
    ("webhook", "n8n-nodes-base.webhook"),
    ("schedule", "n8n-nodes-base.scheduleTrigger"),
    ("form", "n8n-nodes-base.formTrigger"),
    ("email_trigger", "n8n-nodes-base.emailTriggerImap"),
    ("file_trigger", "n8n-nodes-base.localFileTrigger"),
    // Data stores
    ("postgres", "n8n-nodes-base.postgres"),
    ("mysql", "n8n-nodes-base.mySql"),
    ("mongodb", "n8n-nodes-base.mongoDb"),
    ("redis", "n8n-nodes-base.redis"),
    // Files
    ("read_file", "n8n-nodes-base.readBinaryFile"),
    ("write_file", "n8n-nodes-base.writeBinaryFile"),
    ("spreadsheet", "n8n-nodes-base.spreadsheetFile"),
    // Data processing
    ("code", "n8n-nodes-base.code"),
    ("set", "n8n-nodes-base.set"),
    ("merge", "n8n-nodes-base.merge"),
    ("filter", "n8n-nodes-base.filter"),
    ("split_batch", "n8n-nodes-base.splitInBatches"),
    // Control flow
    ("if", "n8n-nodes-base.if"),
    ("switch", "n8n-nodes-base.switch"),
    ("wait", "n8n-nodes-base.wait"),
    ("loop", "n8n-nodes-base.loopOverItems"),
    ("stop_error", "n8n-nodes-base.stopAndError"),
    // Integrations
    ("http", "n8n-nodes-base.httpRequest"),
    ("email", "n8n-nodes-base.emailSend"),
    ("slack", "n8n-nodes-base.slack"),
    ("github", "n8n-nodes-base.github"),
    // Responses
    ("respond", "n8n-nodes-base.respondToWebhook"),
}

const START_X: f64 = 250.0;
const START_Y: f64 = 300.0;
const STEP_X: f64 = 200.0;

/// Optional overrides for a node created by `WorkflowBuilder::add_node`.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    pub id: Option<String>,
    pub name: Option<String>,
    pub parameters: Map<String, Value>,
    pub credentials: Option<Value>,
    pub notes: Option<String>,
    pub position: Option<(f64, f64)>,
}

impl NodeConfig {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Replaces the parameter bag. Non-object values are ignored.
    pub fn with_parameters(mut self, parameters: Value) -> Self {
        if let Value::Object(map) = parameters {
            self.parameters = map;
        }
        self
    }

    pub fn with_credentials(mut self, credentials: Value) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

/// Builds workflow documents node by node.
///
/// ```rust
/// use shindan::workflow::WorkflowBuilder;
///
/// let mut builder = WorkflowBuilder::new();
/// let hook = builder.webhook("/test", "POST");
/// let code = builder.code("return items;", "Process Data");
/// let respond = builder.respond("json");
/// builder.chain(&[&hook, &code, &respond]).unwrap();
///
/// let document = builder.build(Some("Sample Workflow"));
/// assert_eq!(document.nodes.len(), 3);
/// assert_eq!(document.connection_count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct WorkflowBuilder {
    nodes: Vec<NodeDocument>,
    connections: ConnectionMap,
    node_counter: usize,
    next_x: Option<f64>,
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id. Only generated ids advance the
    /// `node_N` counter.
    pub fn add_node(&mut self, alias: &str, config: NodeConfig) -> String {
        let id = config.id.unwrap_or_else(|| {
            self.node_counter += 1;
            format!("node_{}", self.node_counter)
        });
        let name = config.name.unwrap_or_else(|| title_case(alias));

        let x = self.next_x.unwrap_or(START_X);
        let position = config.position.unwrap_or((x, START_Y));
        self.next_x = Some(x + STEP_X);

        self.nodes.push(NodeDocument {
            id: id.clone(),
            name,
            node_type: resolve_node_type(alias).to_string(),
            type_version: 1.0,
            position: vec![position.0, position.1],
            parameters: config.parameters,
            credentials: config.credentials,
            notes: config.notes,
        });
        tracing::debug!(node_id = %id, alias, "Created node");
        id
    }

    /// Connects `main` output 0 of `source` to `main` input 0 of `target`.
    pub fn connect(&mut self, source: &str, target: &str) {
        self.connect_slots(source, target, "main", "main", 0, 0);
    }

    /// Connects two nodes through explicit slots, padding the slot list as needed.
    pub fn connect_slots(
        &mut self,
        source: &str,
        target: &str,
        output_slot: &str,
        input_slot: &str,
        output_index: usize,
        input_index: u32,
    ) {
        let slot_lists = self
            .connections
            .entry(source.to_string())
            .or_default()
            .entry(output_slot.to_string())
            .or_default();
        if slot_lists.len() <= output_index {
            slot_lists.resize_with(output_index + 1, Vec::new);
        }
        slot_lists[output_index].push(ConnectionTarget {
            node: target.to_string(),
            input_slot: input_slot.to_string(),
            index: input_index,
        });
        tracing::debug!(source, target, "Connected nodes");
    }

    /// Connects each node to the next one in order.
    pub fn chain(&mut self, node_ids: &[&str]) -> Result<(), BuildError> {
        if node_ids.len() < 2 {
            return Err(BuildError::ChainTooShort(node_ids.len()));
        }
        for pair in node_ids.windows(2) {
            self.connect(pair[0], pair[1]);
        }
        Ok(())
    }

    /// Merges `parameters` into an existing node's parameter bag.
    pub fn configure(&mut self, node_id: &str, parameters: Map<String, Value>) -> Result<(), BuildError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == node_id)
            .ok_or_else(|| BuildError::NodeNotFound(node_id.to_string()))?;
        node.parameters.extend(parameters);
        Ok(())
    }

    pub fn webhook(&mut self, path: &str, method: &str) -> String {
        self.add_node(
            "webhook",
            NodeConfig::named("Webhook Trigger").with_parameters(json!({
                "path": path,
                "method": method,
                "responseMode": "responseNode",
                "options": {}
            })),
        )
    }

    /// A schedule trigger; without a cron expression it fires daily at 09:00.
    pub fn schedule(&mut self, cron: Option<&str>) -> String {
        let rule = match cron {
            Some(expression) => json!({ "cronExpression": expression }),
            None => json!({ "interval": [{ "triggerAtHour": 9, "triggerAtMinute": 0 }] }),
        };
        self.add_node(
            "schedule",
            NodeConfig::named("Schedule Trigger").with_parameters(json!({ "rule": rule })),
        )
    }

    pub fn code(&mut self, js_code: &str, name: &str) -> String {
        self.add_node(
            "code",
            NodeConfig::named(name).with_parameters(json!({ "jsCode": js_code })),
        )
    }

    pub fn http(&mut self, url: &str, method: &str, headers: &[(&str, &str)]) -> String {
        let mut parameters = json!({ "method": method, "url": url, "options": {} });
        if !headers.is_empty() {
            let header_list: Vec<Value> = headers
                .iter()
                .map(|(name, value)| json!({ "name": name, "value": value }))
                .collect();
            parameters["sendHeaders"] = json!(true);
            parameters["headerParameters"] = json!({ "parameters": header_list });
        }
        self.add_node(
            "http",
            NodeConfig::named("HTTP Request").with_parameters(parameters),
        )
    }

    pub fn database(&mut self, db_alias: &str, operation: &str, query: Option<&str>) -> String {
        let mut parameters = json!({ "operation": operation });
        if let Some(query) = query {
            parameters["query"] = json!(query);
        }
        let name = format!("{} Database", title_case(db_alias));
        self.add_node(db_alias, NodeConfig::named(&name).with_parameters(parameters))
    }

    pub fn if_condition(&mut self, conditions: Vec<Value>) -> String {
        self.add_node(
            "if",
            NodeConfig::named("IF Condition").with_parameters(json!({
                "conditions": { "boolean": [], "string": conditions, "number": [] },
                "combineConditions": "all"
            })),
        )
    }

    pub fn email(&mut self, to: &str, subject: &str, body: &str, from: Option<&str>) -> String {
        let mut parameters = json!({
            "toEmail": to,
            "subject": subject,
            "emailType": "html",
            "htmlBody": body
        });
        if let Some(from) = from {
            parameters["fromEmail"] = json!(from);
        }
        self.add_node("email", NodeConfig::named("Send Email").with_parameters(parameters))
    }

    pub fn respond(&mut self, response_type: &str) -> String {
        let body = if response_type == "json" { "={{$json}}" } else { "" };
        self.add_node(
            "respond",
            NodeConfig::named("Respond to Webhook").with_parameters(json!({
                "respondWith": response_type,
                "responseBody": body,
                "options": {}
            })),
        )
    }

    /// Finishes the document. Without a name, a timestamped one is generated.
    pub fn build(self, name: Option<&str>) -> WorkflowDocument {
        let name = name.map(str::to_string).unwrap_or_else(|| {
            format!("Workflow_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"))
        });
        WorkflowDocument {
            name,
            nodes: self.nodes,
            connections: self.connections,
            active: false,
            settings: Some(json!({
                "executionOrder": "v1",
                "saveManualExecutions": true,
                "callerPolicy": "workflowsFromSameOwner"
            })),
            tags: Vec::new(),
            description: None,
        }
    }
}

fn title_case(alias: &str) -> String {
    alias
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
