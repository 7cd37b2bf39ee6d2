//! Command-line entry point for adk-doc-consistency.

use adk_doc_consistency::cli::{self, EXIT_FATAL};
use adk_doc_consistency::{CheckError, ConsistencyCli};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Prefix for a fatal error: malformed claims or facts are reported as
/// input problems, everything else as a plain error.
fn fatal_label(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<CheckError>() {
        Some(check_err) if check_err.is_fatal_input() => "invalid input",
        _ => "error",
    }
}

async fn run(cli: ConsistencyCli) -> Result<i32> {
    let command = match &cli.command {
        cli::CliCommand::Check(_) => "check",
        cli::CliCommand::Scan(_) => "scan",
    };
    cli::run(cli).await.with_context(|| format!("{} failed", command))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ConsistencyCli::parse();
    init_logging(cli.verbose);

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", fatal_label(&e), e);
            EXIT_FATAL
        }
    };
    std::process::exit(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adk_doc_consistency::FactKind;

    #[test]
    fn test_fatal_label_sees_through_context() {
        let err = anyhow::Error::new(CheckError::InvalidReferenceTable {
            subject_path: "RunConfig.max_llm_calls".to_string(),
            kind: FactKind::DefaultValue,
            first: "500".to_string(),
            second: "1000".to_string(),
        })
        .context("check failed");
        assert_eq!(fatal_label(&err), "invalid input");

        let err = anyhow::Error::new(CheckError::Config("concurrency must be at least 1".into()))
            .context("check failed");
        assert_eq!(fatal_label(&err), "error");

        assert_eq!(fatal_label(&anyhow::anyhow!("boom")), "error");
    }
}
