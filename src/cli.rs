use std::ffi::OsString;

use camino::Utf8PathBuf;
use clap::Parser;

use crate::domain::{DEFAULT_ORGANISM, DEFAULT_OUTPUT, Database, GeneSymbol, OutputArchive};

#[derive(Debug, Parser)]
#[command(name = "get-gene-seq")]
#[command(about = "Resolve a gene symbol to an NCBI ID and download its sequence archive")]
#[command(version)]
pub struct Cli {
    /// Gene or protein symbol (e.g., BRCA1)
    #[arg(long)]
    pub genes: GeneSymbol,

    /// Organism used to scope the symbol search
    #[arg(long, default_value = DEFAULT_ORGANISM)]
    pub organism: String,

    /// Request gene, RNA and protein FASTA instead of a single type
    #[arg(long)]
    pub all_annotation: bool,

    /// NCBI database to search (also accepted as -db)
    #[arg(short = 'd', long = "database", visible_alias = "db")]
    #[arg(value_enum, default_value_t = Database::Gene)]
    pub database: Database,

    /// Output ZIP filename (must end in .zip)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: OutputArchive,

    /// Extract sequence files from the downloaded ZIP
    #[arg(long)]
    pub extract: bool,

    /// Base directory for extracted files; defaults to the current directory
    #[arg(long)]
    pub ext_dir: Option<Utf8PathBuf>,

    /// Print a JSON report instead of progress lines
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn parse_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(normalize_args(args))
    }

    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }
}

/// Rewrites the two-letter `-db` flag to `--db`, which clap would otherwise
/// read as `-d` with the value `b`. Arguments after `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let rewritten = match arg.to_str() {
                Some("--") => {
                    passthrough = true;
                    None
                }
                Some("-db") => Some(OsString::from("--db")),
                Some(value) => value
                    .strip_prefix("-db=")
                    .map(|rest| OsString::from(format!("--db={rest}"))),
                None => None,
            };
            rewritten.unwrap_or(arg)
        })
        .collect()
}
