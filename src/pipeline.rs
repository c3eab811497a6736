use std::time::Duration;

use camino::Utf8PathBuf;
use serde::Serialize;
use tracing::info;

use crate::domain::{
    AnnotationBreadth, AnnotationType, Database, Identifier, OutputArchive, Query,
};
use crate::error::GeneSeqError;
use crate::extract::{ExtractedFile, extract_sequence_files};
use crate::ncbi::NcbiClient;

/// Label reported when neither ESearch nor ESummary knows the symbol.
pub const NOT_RESOLVED_LABEL: &str = "NR";

/// NCBI allows three requests per second with an API key.
pub const POLITENESS_PAUSE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub breadth: AnnotationBreadth,
    pub output: OutputArchive,
    /// Directory to extract sequence files into; `None` skips extraction.
    pub extract_to: Option<Utf8PathBuf>,
    pub pause: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            breadth: AnnotationBreadth::Narrow,
            output: OutputArchive::default(),
            extract_to: None,
            pause: POLITENESS_PAUSE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Resolved,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub symbol: String,
    pub database: Database,
    pub resolution: Resolution,
    pub label: String,
    pub annotations: Vec<AnnotationType>,
    pub archive: Utf8PathBuf,
    pub archive_bytes: u64,
    pub extract_dir: Option<Utf8PathBuf>,
    pub extracted: Vec<ExtractedFile>,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
}

impl ProgressEvent {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct Pipeline<N: NcbiClient> {
    ncbi: N,
}

impl<N: NcbiClient> Pipeline<N> {
    pub fn new(ncbi: N) -> Self {
        Self { ncbi }
    }

    pub fn client(&self) -> &N {
        &self.ncbi
    }

    pub fn run(
        &self,
        query: &Query,
        options: &FetchOptions,
        sink: &dyn ProgressSink,
    ) -> Result<PipelineReport, GeneSeqError> {
        let symbol = query.symbol.as_str();
        sink.event(ProgressEvent::new("Resolving gene symbols to Gene IDs..."));

        let (resolution, label, archive_bytes) = match self.ncbi.search_identifier(query)? {
            Some(id) => {
                info!(%symbol, id = %id, "symbol resolved");
                sink.event(ProgressEvent::new(format!("✔ {symbol} → Gene ID {id}")));
                let bytes = self.download(&id, query.database, options, sink)?;
                (Resolution::Resolved, id.to_string(), bytes)
            }
            None => {
                info!(%symbol, "symbol not resolved, downloading by symbol");
                let by_symbol = Identifier::from(&query.symbol);
                let bytes = self.download(&by_symbol, query.database, options, sink)?;
                let label = self
                    .ncbi
                    .summary_label(&by_symbol, query.database)?
                    .unwrap_or_else(|| NOT_RESOLVED_LABEL.to_string());
                sink.event(ProgressEvent::new(format!("✔ {symbol} → Gene ID {label}")));
                (Resolution::Fallback, label, bytes)
            }
        };

        if !options.pause.is_zero() {
            std::thread::sleep(options.pause);
        }

        let mut extracted = Vec::new();
        if let Some(dir) = &options.extract_to {
            extracted = extract_sequence_files(options.output.as_path().as_std_path(), dir)?;
            for file in &extracted {
                sink.event(ProgressEvent::new(format!("Extracted {} to {dir}/", file.name)));
            }
            info!(count = extracted.len(), dir = %dir, "extraction finished");
        }

        Ok(PipelineReport {
            symbol: symbol.to_string(),
            database: query.database,
            resolution,
            label,
            annotations: query
                .database
                .profile()
                .annotation_types(options.breadth)
                .to_vec(),
            archive: options.output.as_path().to_path_buf(),
            archive_bytes,
            extract_dir: options.extract_to.clone(),
            extracted,
        })
    }

    fn download(
        &self,
        id: &Identifier,
        database: Database,
        options: &FetchOptions,
        sink: &dyn ProgressSink,
    ) -> Result<u64, GeneSeqError> {
        let destination = options.output.as_path();
        let info = self.ncbi.download_archive(
            id,
            database,
            options.breadth,
            destination.as_std_path(),
        )?;
        if !info.is_zip {
            tracing::warn!(%destination, "response was not labelled as a zip archive");
        }
        sink.event(ProgressEvent::new(format!("Downloaded: {destination}")));
        Ok(info.bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;

    use super::*;
    use crate::domain::GeneSymbol;
    use crate::ncbi::DownloadInfo;
    use crate::output::JsonOutput;

    #[derive(Default)]
    struct MockNcbi {
        hit: Option<&'static str>,
        downloads: Mutex<Vec<String>>,
        summaries: Mutex<usize>,
    }

    impl NcbiClient for MockNcbi {
        fn search_identifier(&self, _query: &Query) -> Result<Option<Identifier>, GeneSeqError> {
            Ok(self.hit.map(Identifier::new))
        }

        fn summary_label(
            &self,
            _id: &Identifier,
            _database: Database,
        ) -> Result<Option<String>, GeneSeqError> {
            *self.summaries.lock().unwrap() += 1;
            Ok(None)
        }

        fn download_archive(
            &self,
            id: &Identifier,
            _database: Database,
            _breadth: AnnotationBreadth,
            _destination: &Path,
        ) -> Result<DownloadInfo, GeneSeqError> {
            self.downloads.lock().unwrap().push(id.to_string());
            Ok(DownloadInfo {
                bytes: 0,
                is_zip: true,
            })
        }
    }

    fn query(symbol: &str) -> Query {
        let symbol: GeneSymbol = symbol.parse().unwrap();
        Query::new(symbol, None, Database::Gene)
    }

    fn options() -> FetchOptions {
        FetchOptions {
            pause: Duration::ZERO,
            ..FetchOptions::default()
        }
    }

    #[test]
    fn resolved_symbol_skips_summary() {
        let pipeline = Pipeline::new(MockNcbi {
            hit: Some("672"),
            ..MockNcbi::default()
        });
        let report = pipeline.run(&query("BRCA1"), &options(), &JsonOutput).unwrap();

        assert_eq!(report.resolution, Resolution::Resolved);
        assert_eq!(report.label, "672");
        assert_eq!(*pipeline.client().downloads.lock().unwrap(), vec!["672"]);
        assert_eq!(*pipeline.client().summaries.lock().unwrap(), 0);
    }

    #[test]
    fn unresolved_symbol_downloads_by_symbol_and_labels_nr() {
        let pipeline = Pipeline::new(MockNcbi::default());
        let report = pipeline.run(&query("NOPE1"), &options(), &JsonOutput).unwrap();

        assert_eq!(report.resolution, Resolution::Fallback);
        assert_eq!(report.label, NOT_RESOLVED_LABEL);
        assert_eq!(*pipeline.client().downloads.lock().unwrap(), vec!["NOPE1"]);
        assert_eq!(*pipeline.client().summaries.lock().unwrap(), 1);
    }
}
