//! Tunable constants behind every heuristic pass.
//!
//! The weights and keyword lists are design choices rather than derived
//! values, so they live in one table that can be overridden from TOML:
//!
//! ```toml
//! [cognitive]
//! switch = 4
//!
//! [bottleneck]
//! max_degree = 8
//! ```
//!
//! Any field left out keeps its default.

use crate::error::HeuristicsError;
use crate::report::ComplexityLevel;
use crate::workflow::NodeDefinition;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicTable {
    pub keywords: KeywordTable,
    pub cognitive: CognitiveWeights,
    pub performance: PerformanceEstimates,
    pub bottleneck: BottleneckRules,
    pub complexity: ComplexityThresholds,
    pub security: SecurityRules,
}

/// Lowercase substrings that place a node type into a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordTable {
    pub trigger: Vec<String>,
    pub terminal: Vec<String>,
    pub conditional: Vec<String>,
    pub switch: Vec<String>,
    #[serde(rename = "loop")]
    pub looping: Vec<String>,
    pub error_handling: Vec<String>,
    pub code: Vec<String>,
    pub network: Vec<String>,
    pub datastore: Vec<String>,
    pub delay: Vec<String>,
    pub batch: Vec<String>,
    pub logging: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CognitiveWeights {
    pub conditional: u32,
    pub switch: u32,
    #[serde(rename = "loop")]
    pub looping: u32,
    pub error_handling: u32,
    pub code: u32,
    pub branch_point: u32,
}

/// Fixed per-node time contributions, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceEstimates {
    pub network_secs: f64,
    pub datastore_secs: f64,
    pub loop_secs: f64,
    /// Used when a delay node has no readable amount.
    pub default_delay_secs: f64,
    pub delay_parameter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BottleneckRules {
    /// Extra slow types beyond the network, datastore, loop and delay categories.
    pub slow_keywords: Vec<String>,
    /// Total degree strictly above this marks a structural bottleneck.
    pub max_degree: usize,
}

/// Inclusive upper bounds on cyclomatic complexity for each level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityThresholds {
    pub simple_max: i64,
    pub moderate_max: i64,
    pub complex_max: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityRules {
    pub credential_keywords: Vec<String>,
    pub insecure_scheme: String,
    pub template_marker: String,
    pub prepared_marker: String,
    pub auth_keyword: String,
    pub cache_keyword: String,
}

/// Categories a single node falls into. A node may match several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeTraits {
    pub trigger: bool,
    pub terminal: bool,
    pub conditional: bool,
    pub switch: bool,
    pub looping: bool,
    pub error_handling: bool,
    pub code: bool,
    pub network: bool,
    pub datastore: bool,
    pub delay: bool,
    pub batch: bool,
    pub logging: bool,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            trigger: words(&["trigger", "webhook", "cron"]),
            terminal: words(&["respondtowebhook"]),
            conditional: words(&["if"]),
            switch: words(&["switch"]),
            looping: words(&["loop"]),
            error_handling: words(&["error"]),
            code: words(&["code", "function"]),
            network: words(&["http"]),
            datastore: words(&["database", "postgres", "mysql", "mongodb", "redis", "sqlite", "mssql"]),
            delay: words(&["wait"]),
            batch: words(&["batch"]),
            logging: words(&["log"]),
        }
    }
}

impl Default for CognitiveWeights {
    fn default() -> Self {
        Self {
            conditional: 2,
            switch: 3,
            looping: 3,
            error_handling: 1,
            code: 2,
            branch_point: 1,
        }
    }
}

impl Default for PerformanceEstimates {
    fn default() -> Self {
        Self {
            network_secs: 2.0,
            datastore_secs: 1.0,
            loop_secs: 5.0,
            default_delay_secs: 1.0,
            delay_parameter: "amount".to_string(),
        }
    }
}

impl Default for BottleneckRules {
    fn default() -> Self {
        Self {
            slow_keywords: words(&["http", "database", "loop", "wait"]),
            max_degree: 5,
        }
    }
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self {
            simple_max: 5,
            moderate_max: 10,
            complex_max: 20,
        }
    }
}

impl Default for SecurityRules {
    fn default() -> Self {
        Self {
            credential_keywords: words(&["password", "api_key", "secret", "token"]),
            insecure_scheme: "http://".to_string(),
            template_marker: "{{".to_string(),
            prepared_marker: "prepare".to_string(),
            auth_keyword: "auth".to_string(),
            cache_keyword: "cache".to_string(),
        }
    }
}

/// Case-insensitive "contains any of" check.
pub(crate) fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    keywords
        .iter()
        .any(|k| !k.is_empty() && haystack.contains(&k.to_lowercase()))
}

impl HeuristicTable {
    /// Parses a (possibly partial) table from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, HeuristicsError> {
        toml::from_str(content).map_err(|e| HeuristicsError::TomlParseError(e.to_string()))
    }

    /// Loads a table from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HeuristicsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| HeuristicsError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let table = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "Loaded heuristic table");
        Ok(table)
    }

    /// Classifies a node by substring matches on its base type.
    ///
    /// Logging also looks at the display name, since logging is usually a
    /// generic node that has been renamed.
    pub fn classify(&self, node: &NodeDefinition) -> NodeTraits {
        let k = &self.keywords;
        let base = node.base_type();
        let terminal = contains_any(base, &k.terminal);
        NodeTraits {
            trigger: !terminal && contains_any(base, &k.trigger),
            terminal,
            conditional: contains_any(base, &k.conditional),
            switch: contains_any(base, &k.switch),
            looping: contains_any(base, &k.looping),
            error_handling: contains_any(base, &k.error_handling),
            code: contains_any(base, &k.code),
            network: contains_any(base, &k.network),
            datastore: contains_any(base, &k.datastore),
            delay: contains_any(base, &k.delay),
            batch: contains_any(base, &k.batch),
            logging: contains_any(base, &k.logging) || contains_any(&node.name, &k.logging),
        }
    }

    /// Maps a cyclomatic complexity value onto its level.
    pub fn complexity_level(&self, cyclomatic: i64) -> ComplexityLevel {
        let t = &self.complexity;
        if cyclomatic <= t.simple_max {
            ComplexityLevel::Simple
        } else if cyclomatic <= t.moderate_max {
            ComplexityLevel::Moderate
        } else if cyclomatic <= t.complex_max {
            ComplexityLevel::Complex
        } else {
            ComplexityLevel::VeryComplex
        }
    }

    /// Network, datastore, loop and delay nodes are always slow; the
    /// keyword list adds further types on top of those.
    pub fn is_slow(&self, node: &NodeDefinition) -> bool {
        let traits = self.classify(node);
        traits.network
            || traits.datastore
            || traits.looping
            || traits.delay
            || contains_any(node.base_type(), &self.bottleneck.slow_keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respond_node_is_terminal_not_trigger() {
        let table = HeuristicTable::default();
        let node = NodeDefinition::new("r", "n8n-nodes-base.respondToWebhook", "Respond");
        let traits = table.classify(&node);
        assert!(traits.terminal);
        assert!(!traits.trigger);

        let hook = NodeDefinition::new("w", "n8n-nodes-base.webhook", "Hook");
        assert!(table.classify(&hook).trigger);
    }

    #[test]
    fn datastore_engines_are_slow() {
        let table = HeuristicTable::default();
        for node_type in ["postgres", "mySql", "mongoDb", "redis"] {
            let node = NodeDefinition::new("d", &format!("n8n-nodes-base.{}", node_type), "Store");
            assert!(table.is_slow(&node), "{} should be slow", node_type);
        }
        let set = NodeDefinition::new("s", "n8n-nodes-base.set", "Shape");
        assert!(!table.is_slow(&set));
    }

    #[test]
    fn classification_ignores_package_prefix() {
        let table = HeuristicTable::default();
        let node = NodeDefinition::new("p", "n8n-nodes-base.postgres", "Insert rows");
        let traits = table.classify(&node);
        assert!(traits.datastore);
        assert!(!traits.code);
        assert!(!traits.network);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let table = HeuristicTable::from_toml_str(
            r#"
            [cognitive]
            switch = 7

            [keywords]
            loop = ["loop", "iterate"]
            "#,
        )
        .unwrap();
        assert_eq!(table.cognitive.switch, 7);
        assert_eq!(table.cognitive.conditional, 2);
        assert_eq!(table.keywords.looping.len(), 2);
        assert_eq!(table.bottleneck.max_degree, 5);
    }

    #[test]
    fn malformed_toml_is_reported() {
        let result = HeuristicTable::from_toml_str("[cognitive\nswitch = ");
        assert!(matches!(result, Err(HeuristicsError::TomlParseError(_))));
    }
}
