//! Claims, reference facts and findings.
//!
//! A [`Claim`] is what the documentation says about the reference
//! implementation, a [`SymbolFact`] is what the reference implementation
//! actually looks like, and a [`Finding`] is the outcome of comparing the two.
//! All three are plain immutable records keyed by a dotted subject path such as
//! `LiveRequest.blob`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex is valid"));
static SPACED_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([^\w\s])\s*").expect("static regex is valid"));

/// The kind of fact a claim asserts or a reference fact records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FactKind {
    /// The subject (usually `Type.field`) exists.
    FieldExists,
    /// The declared type of a field.
    FieldType,
    /// The signature of a method or function.
    MethodSignature,
    /// The default value of a field or constant.
    DefaultValue,
    /// The name a concept goes by.
    Terminology,
}

impl FactKind {
    /// All fact kinds, in declaration order.
    pub const ALL: [FactKind; 5] = [
        FactKind::FieldExists,
        FactKind::FieldType,
        FactKind::MethodSignature,
        FactKind::DefaultValue,
        FactKind::Terminology,
    ];

    /// Severity of a contradicted claim of this kind.
    ///
    /// Missing fields and wrong signatures break copied code, so they are
    /// critical. Terminology differences are only worth a note.
    pub fn contradiction_severity(self) -> Severity {
        match self {
            FactKind::FieldExists | FactKind::MethodSignature => Severity::Critical,
            FactKind::FieldType | FactKind::DefaultValue => Severity::Warning,
            FactKind::Terminology => Severity::Suggestion,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FactKind::FieldExists => "field-exists",
            FactKind::FieldType => "field-type",
            FactKind::MethodSignature => "method-signature",
            FactKind::DefaultValue => "default-value",
            FactKind::Terminology => "terminology",
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value carried by a claim or a reference fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Bool(bool),
    Text(String),
}

impl FactValue {
    /// Canonical form used for comparison under the given fact kind.
    ///
    /// Identifiers keep their case for every kind except terminology:
    /// `proactive_audio` and `proactiveAudio` must stay different.
    pub fn normalized(&self, kind: FactKind) -> String {
        match (self, kind) {
            (FactValue::Bool(b), _) => b.to_string(),
            (FactValue::Text(text), FactKind::FieldExists) => {
                let trimmed = text.trim();
                if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
                    trimmed.to_ascii_lowercase()
                } else {
                    trimmed.to_string()
                }
            }
            (FactValue::Text(text), FactKind::FieldType | FactKind::MethodSignature) => {
                canonical_code(text)
            }
            (FactValue::Text(text), FactKind::DefaultValue) => text.trim().to_string(),
            (FactValue::Text(text), FactKind::Terminology) => {
                WHITESPACE_RUN.replace_all(text.trim(), " ").to_lowercase()
            }
        }
    }

    /// Whether two values are equal once normalized for `kind`.
    pub fn matches(&self, other: &FactValue, kind: FactKind) -> bool {
        self.normalized(kind) == other.normalized(kind)
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Bool(b) => write!(f, "{}", b),
            FactValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        FactValue::Bool(value)
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::Text(value.to_string())
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        FactValue::Text(value)
    }
}

/// Collapse whitespace in a code fragment and drop it around punctuation.
pub(crate) fn canonical_code(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text.trim(), " ");
    SPACED_PUNCTUATION.replace_all(&collapsed, "$1").into_owned()
}

/// Where a claim or fact came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Document or source file path.
    pub document: String,
    /// First line (1-based).
    pub start_line: usize,
    /// Last line (inclusive).
    pub end_line: usize,
}

impl SourceLocation {
    pub fn new(document: impl Into<String>, start_line: usize, end_line: usize) -> Self {
        Self { document: document.into(), start_line, end_line }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start_line == self.end_line {
            write!(f, "{}:{}", self.document, self.start_line)
        } else {
            write!(f, "{}:{}-{}", self.document, self.start_line, self.end_line)
        }
    }
}

/// A single assertion extracted from documentation.
///
/// `subject_path` and `kind` default to empty when absent from the input file;
/// evaluation rejects such claims with [`CheckError::InvalidClaim`].
///
/// [`CheckError::InvalidClaim`]: crate::error::CheckError::InvalidClaim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: String,
    /// Dotted path of the subject, e.g. `LiveRequest.blob`
    #[serde(default)]
    pub subject_path: String,
    /// Kind of fact being asserted
    #[serde(default)]
    pub kind: Option<FactKind>,
    /// Asserted value
    pub value: FactValue,
    /// Where the claim was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl Claim {
    pub fn new(
        id: impl Into<String>,
        subject_path: impl Into<String>,
        kind: FactKind,
        value: impl Into<FactValue>,
    ) -> Self {
        Self {
            id: id.into(),
            subject_path: subject_path.into(),
            kind: Some(kind),
            value: value.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

/// A ground-truth fact about the reference implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolFact {
    pub subject_path: String,
    pub kind: FactKind,
    pub value: FactValue,
    /// Where in the reference tree the fact was read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<SourceLocation>,
}

impl SymbolFact {
    pub fn new(
        subject_path: impl Into<String>,
        kind: FactKind,
        value: impl Into<FactValue>,
    ) -> Self {
        Self { subject_path: subject_path.into(), kind, value: value.into(), origin: None }
    }

    pub fn with_origin(mut self, origin: SourceLocation) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// Outcome of comparing one claim against the reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Confirmed,
    Contradicted,
    Unverifiable,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Confirmed => "CONFIRMED",
            Verdict::Contradicted => "CONTRADICTED",
            Verdict::Unverifiable => "UNVERIFIABLE",
        };
        f.write_str(s)
    }
}

/// How urgently a finding needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Suggestion,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Suggestion => "SUGGESTION",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// Result of evaluating a single claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub claim_id: String,
    pub verdict: Verdict,
    pub severity: Severity,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_correction: Option<String>,
}

impl Finding {
    pub fn is_contradicted(&self) -> bool {
        self.verdict == Verdict::Contradicted
    }
}
