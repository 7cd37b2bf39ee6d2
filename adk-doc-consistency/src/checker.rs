//! The consistency checker.
//!
//! [`ConsistencyChecker::evaluate`] compares every claim against the reference
//! table and produces exactly one [`Finding`] per claim, in input order. It
//! performs no I/O and keeps no state between calls, so identical inputs always
//! produce identical findings.
//!
//! ```rust
//! use adk_doc_consistency::{Claim, FactKind, ReferenceTable, SymbolFact, Verdict, evaluate};
//!
//! let claims = vec![Claim::new("c1", "LiveRequest.blob", FactKind::FieldExists, true)];
//! let table = ReferenceTable::from_facts(vec![SymbolFact::new(
//!     "LiveRequest.blob",
//!     FactKind::FieldExists,
//!     true,
//! )]);
//!
//! let findings = evaluate(&claims, &table).unwrap();
//! assert_eq!(findings[0].verdict, Verdict::Confirmed);
//! ```

use crate::config::CheckConfig;
use crate::error::{CheckError, Result};
use crate::model::{Claim, FactKind, Finding, Severity, Verdict};
use crate::reference::{ReferenceIndex, ReferenceTable};
use tracing::debug;

/// Evaluate claims with the default checker settings.
pub fn evaluate(claims: &[Claim], table: &ReferenceTable) -> Result<Vec<Finding>> {
    ConsistencyChecker::default().evaluate(claims, table)
}

/// Compares documentation claims with reference facts.
#[derive(Debug, Clone)]
pub struct ConsistencyChecker {
    suggest_naming_drift: bool,
}

impl Default for ConsistencyChecker {
    fn default() -> Self {
        Self { suggest_naming_drift: true }
    }
}

impl ConsistencyChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &CheckConfig) -> Self {
        Self { suggest_naming_drift: config.suggest_naming_drift }
    }

    /// Validate the reference table, then evaluate every claim against it.
    ///
    /// Fails with [`CheckError::InvalidReferenceTable`] if the table holds
    /// conflicting facts, whether or not any claim refers to them.
    pub fn evaluate(&self, claims: &[Claim], table: &ReferenceTable) -> Result<Vec<Finding>> {
        let index = table.index()?;
        self.evaluate_indexed(claims, &index)
    }

    /// Evaluate claims against an already validated index.
    ///
    /// All claims are checked for well-formedness before any finding is
    /// produced; one malformed claim fails the whole call with
    /// [`CheckError::InvalidClaim`].
    pub fn evaluate_indexed(
        &self,
        claims: &[Claim],
        index: &ReferenceIndex,
    ) -> Result<Vec<Finding>> {
        let kinds = claims.iter().map(validate_claim).collect::<Result<Vec<_>>>()?;

        let findings: Vec<Finding> = claims
            .iter()
            .zip(kinds)
            .map(|(claim, kind)| self.evaluate_claim(claim, kind, index))
            .collect();

        debug!(
            claims = claims.len(),
            contradicted = findings.iter().filter(|f| f.is_contradicted()).count(),
            "Evaluated claims"
        );
        Ok(findings)
    }

    fn evaluate_claim(&self, claim: &Claim, kind: FactKind, index: &ReferenceIndex) -> Finding {
        let path = claim.subject_path.as_str();

        let Some(fact) = index.lookup(path, kind) else {
            return Finding {
                claim_id: claim.id.clone(),
                verdict: Verdict::Unverifiable,
                severity: Severity::Suggestion,
                explanation: format!("No {} fact is recorded for '{}'", kind, path),
                suggested_correction: self.unverifiable_hint(path, kind, index),
            };
        };

        if claim.value.matches(&fact.value, kind) {
            return Finding {
                claim_id: claim.id.clone(),
                verdict: Verdict::Confirmed,
                severity: Severity::Suggestion,
                explanation: format!(
                    "{} of '{}' matches the reference ('{}')",
                    kind, path, fact.value
                ),
                suggested_correction: None,
            };
        }

        let mut explanation = format!(
            "Documentation states {} of '{}' is '{}', but the reference has '{}'",
            kind, path, claim.value, fact.value
        );
        if let Some(origin) = &fact.origin {
            explanation.push_str(&format!(" (defined at {})", origin));
        }

        Finding {
            claim_id: claim.id.clone(),
            verdict: Verdict::Contradicted,
            severity: kind.contradiction_severity(),
            explanation,
            suggested_correction: Some(format!("Update documentation to use: {}", fact.value)),
        }
    }

    /// Hint for a claim with no matching fact. Lookup itself stays exact.
    fn unverifiable_hint(
        &self,
        path: &str,
        kind: FactKind,
        index: &ReferenceIndex,
    ) -> Option<String> {
        if self.suggest_naming_drift {
            let candidates: Vec<&str> = index
                .naming_variants(path)
                .filter(|candidate| index.lookup(candidate, kind).is_some())
                .collect();
            if !candidates.is_empty() {
                return Some(format!("Did you mean: {}?", candidates.join(", ")));
            }
        }

        let known = index.kinds_for(path);
        if known.is_empty() {
            None
        } else {
            let known: Vec<&str> = known.iter().map(|k| k.as_str()).collect();
            Some(format!("Reference only records {} for '{}'", known.join(", "), path))
        }
    }
}

fn validate_claim(claim: &Claim) -> Result<FactKind> {
    if claim.subject_path.trim().is_empty() {
        return Err(CheckError::invalid_claim(&claim.id, "missing subject path"));
    }
    claim.kind.ok_or_else(|| CheckError::invalid_claim(&claim.id, "missing fact kind"))
}
