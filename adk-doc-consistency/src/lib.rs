//! # adk-doc-consistency
//!
//! Documentation-to-source consistency checking for ADK guides.
//!
//! Documentation makes claims about a reference implementation: that
//! `LiveRequest` has a `blob` field, that `RunConfig.max_llm_calls` defaults to
//! `500`, that `LiveRequestQueue.send_realtime` takes a `Blob`. This crate
//! compares such claims with facts extracted from the reference source tree and
//! reports each one as confirmed, contradicted or unverifiable.
//!
//! ## Features
//!
//! - **Deterministic checking**: one finding per claim, in input order
//! - **Fail-fast validation**: malformed claims and ambiguous ground truth abort the run
//! - **Naming drift hints**: `proactive_audio` vs `proactiveAudio` is reported, never masked
//! - **Rust source scanning**: build reference facts straight from `.rs` files
//! - **Parallel batches**: evaluate many documents against one shared table
//! - **CI integration**: exit code 1 when any claim is contradicted
//!
//! ## Quick Start
//!
//! ```rust
//! use adk_doc_consistency::{Claim, ConsistencyChecker, FactKind, ReferenceTable, SymbolFact, Verdict};
//!
//! let table = ReferenceTable::from_facts(vec![
//!     SymbolFact::new("LiveRequest.close", FactKind::FieldType, "bool"),
//! ]);
//! let claims = vec![
//!     Claim::new("c1", "LiveRequest.close", FactKind::FieldType, "bool"),
//!     Claim::new("c2", "LiveRequest.toolResponse", FactKind::FieldExists, true),
//! ];
//!
//! let findings = ConsistencyChecker::new().evaluate(&claims, &table).unwrap();
//! assert_eq!(findings[0].verdict, Verdict::Confirmed);
//! assert_eq!(findings[1].verdict, Verdict::Unverifiable);
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Check claims against a fact file
//! adk-doc-consistency check --claims part2.claims.json --facts adk.facts.json
//!
//! # Check claims against facts extracted from Rust sources
//! adk-doc-consistency check --claims part2.claims.json --source ../adk-core/src --format json
//!
//! # Dump extracted facts for later runs
//! adk-doc-consistency scan --source ../adk-core/src --output adk.facts.json
//! ```

pub mod batch;
pub mod builder;
pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod reference;
pub mod report;

// Re-export commonly used types
pub use batch::{BatchChecker, DocumentClaims, DocumentFindings, flatten_findings};
pub use builder::{ReferenceTableBuilder, facts_from_source, resolve_collisions};
pub use checker::{ConsistencyChecker, evaluate};
pub use cli::{CliCommand, CliOutputFormat, ConsistencyCli};
pub use config::{CheckConfig, CheckConfigBuilder, OutputFormat};
pub use error::{CheckError, Result};
pub use model::{Claim, FactKind, FactValue, Finding, Severity, SourceLocation, SymbolFact, Verdict};
pub use reference::{ReferenceIndex, ReferenceTable};
pub use report::{CheckReport, CheckSummary};

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the crate.
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
