use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use serde::Serialize;
use zip::ZipArchive;

use crate::error::GeneSeqError;

// .fa, .faa, .fna, .fasta
static SEQUENCE_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.f(ast|n|a)?a$").expect("valid sequence file regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedFile {
    pub name: String,
    pub path: Utf8PathBuf,
    pub bytes: u64,
}

pub fn is_sequence_file(name: &str) -> bool {
    SEQUENCE_FILE_RE.is_match(name)
}

/// Final path component of an archive member name; empty for directory markers.
pub fn member_basename(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or("")
}

/// Directory that `--extract` writes into: `<base or cwd>/<symbol>_data`.
pub fn extraction_dir(base: Option<&Utf8Path>, symbol: &str) -> Utf8PathBuf {
    let leaf = format!("{symbol}_data");
    match base {
        Some(base) => base.join(leaf),
        None => Utf8PathBuf::from(leaf),
    }
}

/// Copies every FASTA-family member of the archive into `target_dir`,
/// flattening the archive's directory layout. When two members share a
/// basename the later one overwrites the earlier.
pub fn extract_sequence_files(
    zip_path: &Path,
    target_dir: &Utf8Path,
) -> Result<Vec<ExtractedFile>, GeneSeqError> {
    let file = fs::File::open(zip_path).map_err(|err| {
        GeneSeqError::Filesystem(format!("open zip {}: {err}", zip_path.display()))
    })?;
    let mut archive =
        ZipArchive::new(file).map_err(|err| GeneSeqError::Archive(err.to_string()))?;

    fs::create_dir_all(target_dir.as_std_path())
        .map_err(|err| GeneSeqError::Filesystem(err.to_string()))?;

    let mut extracted = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|err| GeneSeqError::Archive(err.to_string()))?;
        let member = entry.name().to_string();
        if entry.is_dir() || !is_sequence_file(&member) {
            continue;
        }
        let name = member_basename(&member);
        if name.is_empty() {
            continue;
        }

        let out_path = target_dir.join(name);
        let mut outfile = fs::File::create(out_path.as_std_path())
            .map_err(|err| GeneSeqError::Filesystem(err.to_string()))?;
        let bytes = io::copy(&mut entry, &mut outfile)
            .map_err(|err| GeneSeqError::Filesystem(err.to_string()))?;
        tracing::debug!(%member, path = %out_path, bytes, "extracted");
        extracted.push(ExtractedFile {
            name: name.to_string(),
            path: out_path,
            bytes,
        });
    }
    Ok(extracted)
}
