use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GeneSeqError {
    #[error("You must set NCBI_EMAIL and NCBI_API_KEY environment variables.")]
    #[diagnostic(help("export NCBI_EMAIL=<you@example.org> NCBI_API_KEY=<key>"))]
    MissingCredentials,

    #[error("Output filename must end with .zip: {0}")]
    InvalidOutputPath(String),

    #[error("invalid gene symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("NCBI request failed: {0}")]
    NcbiHttp(String),

    #[error("NCBI returned status {status}: {message}")]
    NcbiStatus { status: u16, message: String },

    #[error("unexpected NCBI response: {0}")]
    NcbiResponse(String),

    #[error("archive error: {0}")]
    Archive(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
