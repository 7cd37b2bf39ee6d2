//! Check run reporting
//!
//! Structures for carrying the findings of a run to whatever renders them.

use crate::batch::DocumentFindings;
use crate::model::{Finding, Severity, Verdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete report for one checking run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// Unique identifier for this run
    pub run_id: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run completed
    pub completed_at: DateTime<Utc>,
    /// Findings grouped by document
    pub documents: Vec<DocumentFindings>,
    /// Summary statistics
    pub summary: CheckSummary,
}

impl CheckReport {
    /// Create a report; the run id is generated.
    pub fn new(documents: Vec<DocumentFindings>, started_at: DateTime<Utc>) -> Self {
        let summary = CheckSummary::from_documents(&documents);
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at,
            completed_at: Utc::now(),
            documents,
            summary,
        }
    }

    pub fn has_contradictions(&self) -> bool {
        self.summary.contradicted > 0
    }

    /// Whether the run is clean. Strict mode also rejects unverifiable claims.
    pub fn passed(&self, strict: bool) -> bool {
        !self.has_contradictions() && (!strict || self.summary.unverifiable == 0)
    }

    /// Process exit code for CI: 0 when the run passed, 1 otherwise.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if self.passed(strict) { 0 } else { 1 }
    }

    /// Findings that need attention, with their document
    pub fn issues(&self) -> Vec<(&str, &Finding)> {
        self.documents
            .iter()
            .flat_map(|doc| {
                doc.findings
                    .iter()
                    .filter(|f| f.verdict != Verdict::Confirmed)
                    .map(move |f| (doc.document.as_str(), f))
            })
            .collect()
    }

    /// Format as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Consistency Report: {}\n", self.run_id));
        output.push_str(&format!(
            "Duration: {}ms\n",
            (self.completed_at - self.started_at).num_milliseconds()
        ));
        output.push_str("\nSummary:\n");
        output.push_str(&format!("  Documents: {}\n", self.documents.len()));
        output.push_str(&format!("  Claims: {}\n", self.summary.total));
        output.push_str(&format!("  Confirmed: {}\n", self.summary.confirmed));
        output.push_str(&format!("  Contradicted: {}\n", self.summary.contradicted));
        output.push_str(&format!("  Unverifiable: {}\n", self.summary.unverifiable));

        let issues = self.issues();
        if !issues.is_empty() {
            output.push_str("\nIssues:\n");
            for (document, finding) in issues {
                output.push_str(&format!(
                    "  [{}] {} {} ({}): {}\n",
                    finding.severity,
                    finding.verdict,
                    finding.claim_id,
                    document,
                    finding.explanation
                ));
                if let Some(fix) = &finding.suggested_correction {
                    output.push_str(&format!("      {}\n", fix));
                }
            }
        }

        output
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Summary statistics for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub total: usize,
    pub confirmed: usize,
    pub contradicted: usize,
    pub unverifiable: usize,
    /// Count of non-confirmed findings per severity
    pub by_severity: BTreeMap<Severity, usize>,
}

impl CheckSummary {
    pub fn from_documents(documents: &[DocumentFindings]) -> Self {
        Self::from_findings(documents.iter().flat_map(|doc| doc.findings.iter()))
    }

    pub fn from_findings<'a>(findings: impl IntoIterator<Item = &'a Finding>) -> Self {
        let mut summary = CheckSummary::default();
        for finding in findings {
            summary.total += 1;
            match finding.verdict {
                Verdict::Confirmed => summary.confirmed += 1,
                Verdict::Contradicted => summary.contradicted += 1,
                Verdict::Unverifiable => summary.unverifiable += 1,
            }
            if finding.verdict != Verdict::Confirmed {
                *summary.by_severity.entry(finding.severity).or_insert(0) += 1;
            }
        }
        summary
    }
}
