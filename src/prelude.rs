//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the shindan crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use shindan::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let analyzer = Analyzer::builder()
//!     .with_heuristics(HeuristicTable::load("heuristics.toml")?)
//!     .build();
//! let report = analyzer.analyze_file("path/to/workflow.json")?;
//! println!("{}", ReportFormatter::json(&report)?);
//! # Ok(())
//! # }
//! ```

// Analysis
pub use crate::analyzer::{Analyzer, AnalyzerBuilder};
pub use crate::graph::WorkflowGraph;
pub use crate::heuristics::{HeuristicTable, NodeTraits};

// Workflow model
pub use crate::workflow::{
    ConnectionDefinition, IntoWorkflow, NodeConfig, NodeDefinition, WorkflowBuilder,
    WorkflowDefinition, WorkflowDocument,
};

// Reports
pub use crate::report::{
    AnalysisReport, ComplexityLevel, ReportFormatter, Severity, ValidationIssueKind,
};

// Error types
pub use crate::error::{AnalysisError, BuildError, HeuristicsError, LoadError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
