use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The aggregate result of one analysis run.
///
/// Serializes with exactly nine top-level keys, one per pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisReport {
    pub basic_info: BasicInfo,
    pub structure: StructureReport,
    pub complexity: ComplexityReport,
    pub performance: PerformanceReport,
    pub bottlenecks: Vec<Bottleneck>,
    pub optimizations: Vec<Optimization>,
    pub validation: ValidationReport,
    pub security: SecurityReport,
    pub best_practices: Vec<Recommendation>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BasicInfo {
    pub name: String,
    pub node_count: usize,
    pub connection_count: usize,
    /// Histogram keyed by base type (the segment after the last dot).
    pub node_types: BTreeMap<String, usize>,
    pub is_active: bool,
    pub has_trigger: bool,
    pub has_error_handling: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StructureReport {
    pub entry_nodes: Vec<String>,
    pub exit_nodes: Vec<String>,
    pub has_cycles: bool,
    pub longest_path_length: usize,
    /// Empty when the graph has cycles.
    pub longest_path: Vec<String>,
    pub branch_points: Vec<String>,
    pub merge_points: Vec<String>,
    pub is_connected: bool,
    pub components: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplexityReport {
    pub cyclomatic_complexity: i64,
    pub cognitive_complexity: u32,
    pub complexity_level: ComplexityLevel,
    pub edge_count: usize,
    pub node_count: usize,
    pub average_connections: f64,
    pub max_node_connections: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ComplexityLevel {
    #[default]
    Simple,
    Moderate,
    Complex,
    #[serde(rename = "Very Complex")]
    VeryComplex,
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComplexityLevel::Simple => "Simple",
            ComplexityLevel::Moderate => "Moderate",
            ComplexityLevel::Complex => "Complex",
            ComplexityLevel::VeryComplex => "Very Complex",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        f.write_str(label)
    }
}

/// A per-node performance or security observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub node: String,
    pub issue: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PerformanceReport {
    pub estimated_execution_secs: f64,
    /// Human-readable form of `estimated_execution_secs`, e.g. `"7s"`.
    pub estimated_execution_time: String,
    pub performance_issues: Vec<Finding>,
    pub parallelization_opportunities: Vec<Vec<String>>,
    pub has_batch_processing: bool,
    pub has_caching: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleneckKind {
    Performance,
    Structural,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bottleneck {
    pub node_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: BottleneckKind,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationKind {
    BatchProcessing,
    Parallelization,
    ErrorHandling,
    Caching,
}

impl fmt::Display for OptimizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OptimizationKind::BatchProcessing => "batch_processing",
            OptimizationKind::Parallelization => "parallelization",
            OptimizationKind::ErrorHandling => "error_handling",
            OptimizationKind::Caching => "caching",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Optimization {
    #[serde(rename = "type")]
    pub kind: OptimizationKind,
    pub suggestion: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Severity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssueKind {
    DanglingSource,
    DanglingTarget,
    MissingTrigger,
    IsolatedNodes,
    MissingInput,
    MissingParameter,
    Cycles,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub kind: ValidationIssueKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cycles: Vec<Vec<String>>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(kind: ValidationIssueKind, nodes: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            nodes,
            cycles: Vec::new(),
            message: message.into(),
        }
    }
}

/// Two buckets only: errors make the workflow invalid, warnings do not.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ValidationReport {
    pub fn error(&mut self, issue: ValidationIssue) {
        self.valid = false;
        self.errors.push(issue);
    }

    pub fn warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// Every cycle listed by a `cycles` warning.
    pub fn cycles(&self) -> impl Iterator<Item = &Vec<String>> {
        self.warnings
            .iter()
            .filter(|w| w.kind == ValidationIssueKind::Cycles)
            .flat_map(|w| w.cycles.iter())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SecurityReport {
    pub issues: Vec<Finding>,
    pub has_authentication: bool,
    pub uses_credentials: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    pub issue: String,
    pub suggestion: String,
}
