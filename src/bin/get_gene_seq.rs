use std::process::ExitCode;

use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use gene_seq_fetch::cli::Cli;
use gene_seq_fetch::config::{Credentials, Endpoints};
use gene_seq_fetch::domain::{AnnotationBreadth, Query};
use gene_seq_fetch::error::GeneSeqError;
use gene_seq_fetch::extract::extraction_dir;
use gene_seq_fetch::ncbi::NcbiHttpClient;
use gene_seq_fetch::output::{HumanOutput, JsonOutput, OutputMode};
use gene_seq_fetch::pipeline::{FetchOptions, POLITENESS_PAUSE, Pipeline};

fn main() -> ExitCode {
    if let Err(report) = run() {
        if let Some(GeneSeqError::MissingCredentials) = report.downcast_ref::<GeneSeqError>() {
            eprintln!("{}", GeneSeqError::MissingCredentials);
            return ExitCode::from(1);
        }
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<GeneSeqError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &GeneSeqError) -> u8 {
    match error {
        GeneSeqError::NcbiHttp(_)
        | GeneSeqError::NcbiStatus { .. }
        | GeneSeqError::NcbiResponse(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args(std::env::args_os());
    let credentials = Credentials::from_env()?;
    let endpoints = Endpoints::from_env();

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let query = Query::new(cli.genes, Some(cli.organism), cli.database);
    let extract_to = cli
        .extract
        .then(|| extraction_dir(cli.ext_dir.as_deref(), query.symbol.as_str()));
    let options = FetchOptions {
        breadth: AnnotationBreadth::from_flag(cli.all_annotation),
        output: cli.output,
        extract_to,
        pause: POLITENESS_PAUSE,
    };

    let ncbi = NcbiHttpClient::new(&credentials, endpoints)?;
    let pipeline = Pipeline::new(ncbi);

    match output_mode {
        OutputMode::Human => {
            pipeline.run(&query, &options, &HumanOutput)?;
        }
        OutputMode::Json => {
            let report = pipeline.run(&query, &options, &JsonOutput)?;
            JsonOutput::print_report(&report).into_diagnostic()?;
        }
    }
    Ok(())
}
