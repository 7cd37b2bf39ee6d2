//! Command-line interface.
//!
//! Exit codes follow the CI contract: `0` when no claim is contradicted, `1`
//! when at least one is (or, in strict mode, when any claim is unverifiable),
//! and `2` when the inputs themselves are broken.

use crate::batch::BatchChecker;
use crate::builder::ReferenceTableBuilder;
use crate::checker::ConsistencyChecker;
use crate::config::{CheckConfig, OutputFormat};
use crate::error::Result;
use crate::loader;
use crate::reference::ReferenceTable;
use crate::report::CheckReport;
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{info, instrument};

/// Exit code when every claim passed.
pub const EXIT_CLEAN: i32 = 0;
/// Exit code when the report contains failing findings.
pub const EXIT_FINDINGS: i32 = 1;
/// Exit code for malformed input or I/O failures.
pub const EXIT_FATAL: i32 = 2;

/// Check documentation claims against facts from a reference implementation
#[derive(Parser, Debug)]
#[command(name = "adk-doc-consistency")]
#[command(author, version, about, long_about = None)]
pub struct ConsistencyCli {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Evaluate claim files against reference facts
    Check(CheckArgs),
    /// Extract reference facts from Rust sources and print them as JSON
    Scan(ScanArgs),
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("reference").required(true).multiple(true).args(["facts", "source"])))]
pub struct CheckArgs {
    /// Claim files (.json or .toml), one per document
    #[arg(short, long, required = true, num_args = 1..)]
    pub claims: Vec<PathBuf>,

    /// Reference fact files (.json or .toml)
    #[arg(short, long, num_args = 1..)]
    pub facts: Vec<PathBuf>,

    /// Rust source roots to extract reference facts from. Paths have no
    /// module prefix; facts that same-named types disagree on are dropped.
    #[arg(short, long, num_args = 1..)]
    pub source: Vec<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, env = "DOC_CONSISTENCY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, env = "DOC_CONSISTENCY_FORMAT")]
    pub format: Option<CliOutputFormat>,

    /// Fail on unverifiable claims too
    #[arg(long)]
    pub strict: bool,

    /// Maximum number of documents evaluated in parallel
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Do not suggest paths that differ only in naming convention
    #[arg(long)]
    pub no_naming_hints: bool,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Rust source roots
    #[arg(short, long, required = true, num_args = 1..)]
    pub source: Vec<PathBuf>,

    /// Write facts here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip files that fail to parse
    #[arg(long)]
    pub skip_unparseable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliOutputFormat {
    Console,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(format: CliOutputFormat) -> Self {
        match format {
            CliOutputFormat::Console => OutputFormat::Console,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

impl CheckArgs {
    /// Resolve the effective configuration: file first, then flags.
    pub fn resolve_config(&self) -> Result<CheckConfig> {
        let base = match &self.config {
            Some(path) => CheckConfig::load(path)?,
            None => CheckConfig::default(),
        };

        let mut builder = CheckConfig::builder().base(base);
        if self.strict {
            builder = builder.strict(true);
        }
        if self.no_naming_hints {
            builder = builder.suggest_naming_drift(false);
        }
        if let Some(concurrency) = self.concurrency {
            builder = builder.concurrency(concurrency);
        }
        if let Some(format) = self.format {
            builder = builder.output_format(format.into());
        }
        builder.build()
    }
}

/// Run a parsed command and return the process exit code.
pub async fn run(cli: ConsistencyCli) -> Result<i32> {
    match cli.command {
        CliCommand::Check(args) => {
            let (report, config) = run_check(&args).await?;
            match config.output_format {
                OutputFormat::Console => print!("{}", report.format_summary()),
                OutputFormat::Json => println!("{}", report.to_json()?),
            }
            Ok(report.exit_code(config.strict))
        }
        CliCommand::Scan(args) => {
            let json = run_scan(&args)?;
            match &args.output {
                Some(path) => std::fs::write(path, json)?,
                None => println!("{}", json),
            }
            Ok(EXIT_CLEAN)
        }
    }
}

/// Load inputs, evaluate every document and assemble the report.
#[instrument(skip_all, fields(documents = args.claims.len()))]
pub async fn run_check(args: &CheckArgs) -> Result<(CheckReport, CheckConfig)> {
    let started_at = chrono::Utc::now();
    let config = args.resolve_config()?;

    let mut table = loader::load_reference_table(&args.facts)?;
    if !args.source.is_empty() {
        let builder = args.source.iter().fold(ReferenceTableBuilder::new(), |b, root| b.root(root));
        table.extend(builder.build()?.facts);
    }
    info!("Reference table holds {} facts", table.len());

    let documents =
        args.claims.iter().map(|path| loader::load_document(path)).collect::<Result<Vec<_>>>()?;

    let batch = BatchChecker::new(ConsistencyChecker::with_config(&config), config.concurrency);
    let results = batch.evaluate_documents(documents, &table).await?;

    let report = CheckReport::new(results, started_at);
    info!(
        contradicted = report.summary.contradicted,
        unverifiable = report.summary.unverifiable,
        "Check complete"
    );
    Ok((report, config))
}

/// Extract facts and render them as JSON accepted by `check --facts`.
pub fn run_scan(args: &ScanArgs) -> Result<String> {
    let builder = args
        .source
        .iter()
        .fold(ReferenceTableBuilder::new(), |b, root| b.root(root))
        .skip_unparseable(args.skip_unparseable);
    let table: ReferenceTable = builder.build()?;
    Ok(serde_json::to_string_pretty(&table)?)
}
