use std::fmt;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::GeneSeqError;

pub const DEFAULT_ORGANISM: &str = "Homo sapiens";
pub const DEFAULT_OUTPUT: &str = "ncbi_genes.zip";
pub const ARCHIVE_SUFFIX: &str = ".zip";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Gene,
    Protein,
}

impl Database {
    pub fn as_str(&self) -> &'static str {
        match self {
            Database::Gene => "gene",
            Database::Protein => "protein",
        }
    }

    pub fn profile(&self) -> &'static DatabaseProfile {
        match self {
            Database::Gene => &GENE_PROFILE,
            Database::Protein => &PROTEIN_PROFILE,
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnnotationType {
    #[serde(rename = "FASTA_GENE")]
    FastaGene,
    #[serde(rename = "FASTA_RNA")]
    FastaRna,
    #[serde(rename = "FASTA_PROTEIN")]
    FastaProtein,
}

impl AnnotationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationType::FastaGene => "FASTA_GENE",
            AnnotationType::FastaRna => "FASTA_RNA",
            AnnotationType::FastaProtein => "FASTA_PROTEIN",
        }
    }
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnotationBreadth {
    #[default]
    Narrow,
    Broad,
}

impl AnnotationBreadth {
    pub fn from_flag(all_annotation: bool) -> Self {
        if all_annotation {
            AnnotationBreadth::Broad
        } else {
            AnnotationBreadth::Narrow
        }
    }
}

/// Everything that differs between the gene and protein databases.
///
/// Both the resolved path and the fallback path read from this table, so
/// endpoint selection and annotation sets cannot drift apart.
#[derive(Debug)]
pub struct DatabaseProfile {
    pub database: Database,
    /// Datasets v2 path prefix placed before `/<id>/download`.
    pub download_path: &'static str,
    pub narrow_annotations: &'static [AnnotationType],
    /// ESummary field carrying the human-readable label.
    pub summary_field: &'static str,
}

const BROAD_ANNOTATIONS: &[AnnotationType] = &[
    AnnotationType::FastaGene,
    AnnotationType::FastaRna,
    AnnotationType::FastaProtein,
];

static GENE_PROFILE: DatabaseProfile = DatabaseProfile {
    database: Database::Gene,
    download_path: "gene/id",
    narrow_annotations: &[AnnotationType::FastaGene],
    summary_field: "name",
};

static PROTEIN_PROFILE: DatabaseProfile = DatabaseProfile {
    database: Database::Protein,
    download_path: "protein/accession",
    narrow_annotations: &[AnnotationType::FastaProtein],
    summary_field: "caption",
};

impl DatabaseProfile {
    pub fn annotation_types(&self, breadth: AnnotationBreadth) -> &'static [AnnotationType] {
        match breadth {
            AnnotationBreadth::Narrow => self.narrow_annotations,
            AnnotationBreadth::Broad => BROAD_ANNOTATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneSymbol(String);

impl GeneSymbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GeneSymbol {
    type Err = GeneSeqError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        // The symbol ends up as a URL path segment and a directory name.
        if trimmed.is_empty() || trimmed.contains(['/', '\\']) {
            return Err(GeneSeqError::InvalidSymbol(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Token returned by ESearch: a Gene ID or a protein accession.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&GeneSymbol> for Identifier {
    fn from(symbol: &GeneSymbol) -> Self {
        Self(symbol.as_str().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub symbol: GeneSymbol,
    pub organism: String,
    pub database: Database,
}

impl Query {
    pub fn new(symbol: GeneSymbol, organism: Option<String>, database: Database) -> Self {
        let organism = organism
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ORGANISM.to_string());
        Self {
            symbol,
            organism,
            database,
        }
    }

    pub fn search_term(&self) -> String {
        format!("{}[Gene Name] AND {}[Organism]", self.symbol, self.organism)
    }
}

/// Destination of the downloaded archive; always ends in `.zip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArchive(Utf8PathBuf);

impl OutputArchive {
    pub fn as_path(&self) -> &Utf8Path {
        &self.0
    }
}

impl Default for OutputArchive {
    fn default() -> Self {
        Self(Utf8PathBuf::from(DEFAULT_OUTPUT))
    }
}

impl fmt::Display for OutputArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OutputArchive {
    type Err = GeneSeqError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if !value.to_ascii_lowercase().ends_with(ARCHIVE_SUFFIX) {
            return Err(GeneSeqError::InvalidOutputPath(value.to_string()));
        }
        Ok(Self(Utf8PathBuf::from(value)))
    }
}
