//! Parallel evaluation of many documents against one reference table.

use crate::checker::ConsistencyChecker;
use crate::error::{CheckError, Result};
use crate::model::{Claim, Finding};
use crate::reference::{ReferenceIndex, ReferenceTable};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Claims extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentClaims {
    /// Document name, usually the path it was loaded from
    pub document: String,
    pub claims: Vec<Claim>,
}

impl DocumentClaims {
    pub fn new(document: impl Into<String>, claims: Vec<Claim>) -> Self {
        Self { document: document.into(), claims }
    }
}

/// Findings for one document, in claim order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFindings {
    pub document: String,
    pub findings: Vec<Finding>,
}

/// Runs one independent evaluation per document.
#[derive(Debug, Clone)]
pub struct BatchChecker {
    checker: ConsistencyChecker,
    concurrency: usize,
}

impl BatchChecker {
    pub fn new(checker: ConsistencyChecker, concurrency: usize) -> Self {
        Self { checker, concurrency: concurrency.max(1) }
    }

    /// Evaluate every document against `table`.
    ///
    /// The table is validated once and shared read-only across workers. Results
    /// come back in document order; the first fatal error aborts the batch.
    #[instrument(skip_all, fields(documents = documents.len(), facts = table.len()))]
    pub async fn evaluate_documents(
        &self,
        documents: Vec<DocumentClaims>,
        table: &ReferenceTable,
    ) -> Result<Vec<DocumentFindings>> {
        let index = Arc::new(table.index()?);

        let results: Vec<DocumentFindings> = stream::iter(documents)
            .map(|doc| self.spawn_document(doc, Arc::clone(&index)))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        info!(
            documents = results.len(),
            findings = results.iter().map(|d| d.findings.len()).sum::<usize>(),
            "Batch evaluation complete"
        );
        Ok(results)
    }

    async fn spawn_document(
        &self,
        doc: DocumentClaims,
        index: Arc<ReferenceIndex>,
    ) -> Result<DocumentFindings> {
        let checker = self.checker.clone();
        let handle = tokio::task::spawn_blocking(move || {
            checker
                .evaluate_indexed(&doc.claims, &index)
                .map(|findings| DocumentFindings { document: doc.document, findings })
        });
        handle.await.map_err(|e| CheckError::Task(e.to_string()))?
    }
}

/// Concatenate per-document findings in document order.
pub fn flatten_findings(documents: &[DocumentFindings]) -> Vec<&Finding> {
    documents.iter().flat_map(|doc| doc.findings.iter()).collect()
}
