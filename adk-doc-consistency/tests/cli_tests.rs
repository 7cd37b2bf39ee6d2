//! End-to-end tests for the `check` and `scan` commands.

use adk_doc_consistency::cli::{CheckArgs, ScanArgs, run_check, run_scan};
use adk_doc_consistency::{CheckError, ConsistencyCli, OutputFormat, Verdict, loader};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const REFERENCE_SOURCE: &str = r#"
pub struct LiveRequest {
    pub content: Option<Content>,
    pub blob: Option<Blob>,
    pub close: bool,
}

pub struct RunConfig {
    pub max_llm_calls: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { max_llm_calls: 500 }
    }
}

pub struct LiveRequestQueue;

impl LiveRequestQueue {
    pub fn send_realtime(&self, blob: Blob) {}
}
"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn check_args(claims: Vec<PathBuf>) -> CheckArgs {
    CheckArgs {
        claims,
        facts: vec![],
        source: vec![],
        config: None,
        format: None,
        strict: false,
        concurrency: None,
        no_naming_hints: false,
    }
}

#[tokio::test]
async fn test_check_against_rust_sources() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "reference/src/live.rs", REFERENCE_SOURCE);
    // Build output is never scanned.
    write(temp_dir.path(), "reference/target/junk.rs", "this is not rust");

    let part2 = write(
        temp_dir.path(),
        "part2.json",
        r#"[
            {"id": "p2-1", "subject_path": "LiveRequest.blob", "kind": "field-exists", "value": true},
            {"id": "p2-2", "subject_path": "LiveRequest.close", "kind": "field-type", "value": "bool"},
            {"id": "p2-3", "subject_path": "RunConfig.max_llm_calls", "kind": "default-value", "value": "1000"}
        ]"#,
    );
    let part3 = write(
        temp_dir.path(),
        "part3.toml",
        r#"
[[claims]]
id = "p3-1"
subject_path = "LiveRequestQueue.send_realtime"
kind = "method-signature"
value = "fn send_realtime(&self, blob: Blob)"

[[claims]]
id = "p3-2"
subject_path = "LiveRequest.toolResponse"
kind = "field-exists"
value = true
"#,
    );

    let mut args = check_args(vec![part2.clone(), part3.clone()]);
    args.source = vec![temp_dir.path().join("reference")];

    let (report, config) = run_check(&args).await.unwrap();
    assert_eq!(config.output_format, OutputFormat::Console);
    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.documents[0].document, part2.display().to_string());
    assert_eq!(report.documents[1].document, part3.display().to_string());

    let verdicts: Vec<Verdict> =
        report.documents.iter().flat_map(|d| d.findings.iter().map(|f| f.verdict)).collect();
    assert_eq!(
        verdicts,
        vec![
            Verdict::Confirmed,
            Verdict::Confirmed,
            Verdict::Contradicted,
            Verdict::Confirmed,
            Verdict::Unverifiable,
        ]
    );
    assert_eq!(report.summary.contradicted, 1);
    assert_eq!(report.exit_code(false), 1);
}

#[tokio::test]
async fn test_clean_run_exits_zero_unless_strict() {
    let temp_dir = TempDir::new().unwrap();
    let facts = write(
        temp_dir.path(),
        "facts.json",
        r#"{"facts": [{"subject_path": "LiveRequest.blob", "kind": "field-exists", "value": true}]}"#,
    );
    let claims = write(
        temp_dir.path(),
        "claims.json",
        r#"{"claims": [
            {"id": "c1", "subject_path": "LiveRequest.blob", "kind": "field-exists", "value": true},
            {"id": "c2", "subject_path": "LiveRequest.toolResponse", "kind": "field-exists", "value": true}
        ]}"#,
    );

    let mut args = check_args(vec![claims]);
    args.facts = vec![facts];
    let (report, config) = run_check(&args).await.unwrap();
    assert_eq!(report.exit_code(config.strict), 0);

    args.strict = true;
    let (report, config) = run_check(&args).await.unwrap();
    assert_eq!(report.exit_code(config.strict), 1);
}

#[tokio::test]
async fn test_malformed_claim_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let facts = write(temp_dir.path(), "facts.json", "[]");
    let claims = write(temp_dir.path(), "claims.json", r#"[{"id": "no-path", "kind": "field-exists", "value": true}]"#);

    let mut args = check_args(vec![claims]);
    args.facts = vec![facts];
    let err = run_check(&args).await.unwrap_err();
    assert!(matches!(err, CheckError::InvalidClaim { ref claim_id, .. } if claim_id == "no-path"));
    assert!(err.is_fatal_input());
}

#[tokio::test]
async fn test_conflicting_fact_files_are_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let a = write(
        temp_dir.path(),
        "a.json",
        r#"[{"subject_path": "RunConfig.max_llm_calls", "kind": "default-value", "value": "500"}]"#,
    );
    let b = write(
        temp_dir.path(),
        "b.json",
        r#"[{"subject_path": "RunConfig.max_llm_calls", "kind": "default-value", "value": "1000"}]"#,
    );
    let claims = write(temp_dir.path(), "claims.json", "[]");

    let mut args = check_args(vec![claims]);
    args.facts = vec![a, b];
    let err = run_check(&args).await.unwrap_err();
    assert!(matches!(err, CheckError::InvalidReferenceTable { .. }));
}

#[tokio::test]
async fn test_config_file_and_flags() {
    let temp_dir = TempDir::new().unwrap();
    let config = write(temp_dir.path(), "doc-consistency.toml", "strict = true\nconcurrency = 1\n");
    let facts = write(temp_dir.path(), "facts.json", "[]");
    let claims = write(temp_dir.path(), "claims.json", "[]");

    let cli = ConsistencyCli::try_parse_from([
        "adk-doc-consistency".to_string(),
        "check".to_string(),
        "--claims".to_string(),
        claims.display().to_string(),
        "--facts".to_string(),
        facts.display().to_string(),
        "--config".to_string(),
        config.display().to_string(),
        "--format".to_string(),
        "json".to_string(),
    ])
    .unwrap();
    let adk_doc_consistency::CliCommand::Check(args) = cli.command else {
        panic!("expected check command");
    };

    let (report, config) = run_check(&args).await.unwrap();
    assert!(config.strict);
    assert_eq!(config.concurrency, 1);
    assert_eq!(config.output_format, OutputFormat::Json);
    assert_eq!(report.summary.total, 0);
    assert_eq!(report.exit_code(config.strict), 0);
}

#[test]
fn test_scan_output_loads_as_facts() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "src/live.rs", REFERENCE_SOURCE);
    let output = temp_dir.path().join("facts.json");

    let json = run_scan(&ScanArgs {
        source: vec![temp_dir.path().join("src")],
        output: Some(output.clone()),
        skip_unparseable: false,
    })
    .unwrap();
    fs::write(&output, json).unwrap();

    let facts = loader::load_facts(&output).unwrap();
    assert!(facts.iter().any(|f| f.subject_path == "LiveRequest.blob"));
    assert!(facts.iter().any(|f| f.subject_path == "LiveRequestQueue.send_realtime"));

    let mut sorted = facts.clone();
    sorted.sort_by(|a, b| a.subject_path.cmp(&b.subject_path).then(a.kind.cmp(&b.kind)));
    assert_eq!(facts, sorted);
}

#[test]
fn test_scan_unparseable_files() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "src/live.rs", REFERENCE_SOURCE);
    write(temp_dir.path(), "src/broken.rs", "pub struct {");

    let mut args = ScanArgs {
        source: vec![temp_dir.path().join("src")],
        output: None,
        skip_unparseable: false,
    };
    let err = run_scan(&args).unwrap_err();
    assert!(matches!(err, CheckError::SourceParse { ref path, .. } if path.ends_with("broken.rs")));

    args.skip_unparseable = true;
    let json = run_scan(&args).unwrap();
    assert!(json.contains("LiveRequest.close"));
}

#[tokio::test]
async fn test_check_with_same_named_types_across_files() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "reference/src/http.rs",
        "pub struct Config { pub timeout: u64 }\nimpl From<u64> for Config { fn from(t: u64) -> Self { todo!() } }",
    );
    write(
        temp_dir.path(),
        "reference/src/grpc.rs",
        "pub struct Config { pub timeout: Duration }\nimpl From<Duration> for Config { fn from(t: Duration) -> Self { todo!() } }",
    );
    let claims = write(
        temp_dir.path(),
        "guide.json",
        r#"[
            {"id": "g-1", "subject_path": "Config.timeout", "kind": "field-exists", "value": true},
            {"id": "g-2", "subject_path": "Config.timeout", "kind": "field-type", "value": "u64"}
        ]"#,
    );

    let mut args = check_args(vec![claims]);
    args.source = vec![temp_dir.path().join("reference")];
    let (report, _) = run_check(&args).await.unwrap();

    let verdicts: Vec<Verdict> =
        report.documents[0].findings.iter().map(|f| f.verdict).collect();
    assert_eq!(verdicts, vec![Verdict::Confirmed, Verdict::Unverifiable]);
    assert_eq!(report.exit_code(false), 0);
}
