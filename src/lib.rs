//! # Shindan - Workflow Graph Diagnostics
//!
//! **Shindan** inspects node-based automation workflows (n8n-style exports)
//! and produces a structural, complexity, performance and security report.
//! Every pass is a single, synchronous sweep over the workflow graph; nothing
//! is persisted between runs.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Parse a workflow export into a `WorkflowDocument`, or bring
//!     your own format and implement `IntoWorkflow` for it.
//! 2.  **Normalize**: Conversion flattens the slot-indexed connection map into
//!     a flat edge list, giving a `WorkflowDefinition`.
//! 3.  **Analyze**: An `Analyzer` builds the graph and runs the structure,
//!     complexity, performance, validation, security and best-practice passes.
//! 4.  **Render**: Print the `AnalysisReport` as Markdown-like text or JSON with
//!     `ReportFormatter`.
//!
//! ## Quick Start
//!
//! ```rust
//! use shindan::prelude::*;
//!
//! let json = r#"{
//!     "name": "Echo",
//!     "nodes": [
//!         {"id": "1", "name": "Incoming", "type": "n8n-nodes-base.webhook", "parameters": {"path": "echo"}},
//!         {"id": "2", "name": "Shape", "type": "n8n-nodes-base.set"},
//!         {"id": "3", "name": "Reply", "type": "n8n-nodes-base.respondToWebhook"}
//!     ],
//!     "connections": {
//!         "1": {"main": [[{"node": "2", "type": "main", "index": 0}]]},
//!         "2": {"main": [[{"node": "3", "type": "main", "index": 0}]]}
//!     }
//! }"#;
//!
//! let workflow = WorkflowDefinition::from_json_str(json).unwrap();
//! let report = Analyzer::default().analyze(&workflow);
//!
//! assert_eq!(report.complexity.cyclomatic_complexity, 1);
//! assert_eq!(report.complexity.complexity_level, ComplexityLevel::Simple);
//! assert!(report.validation.valid);
//!
//! println!("{}", ReportFormatter::markdown(&report));
//! ```
//!
//! ## Tuning
//!
//! The scoring weights and keyword lists are not derived from any formal
//! model. They live in a `HeuristicTable` that can be loaded from TOML and
//! handed to `Analyzer::builder().with_heuristics(..)`.

pub mod analyzer;
pub mod error;
pub mod graph;
pub mod heuristics;
pub mod prelude;
pub mod report;
pub mod workflow;
