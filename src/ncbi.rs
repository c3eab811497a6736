use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::debug;

use crate::config::{Credentials, Endpoints};
use crate::domain::{AnnotationBreadth, Database, Identifier, Query};
use crate::error::GeneSeqError;

#[derive(Debug, Clone, Copy)]
pub struct DownloadInfo {
    pub bytes: u64,
    pub is_zip: bool,
}

pub trait NcbiClient {
    /// First ESearch hit for the query, or `None` when the id list is empty.
    fn search_identifier(&self, query: &Query) -> Result<Option<Identifier>, GeneSeqError>;

    /// Display label from ESummary, or `None` when the record has none.
    fn summary_label(
        &self,
        id: &Identifier,
        database: Database,
    ) -> Result<Option<String>, GeneSeqError>;

    fn download_archive(
        &self,
        id: &Identifier,
        database: Database,
        breadth: AnnotationBreadth,
        destination: &Path,
    ) -> Result<DownloadInfo, GeneSeqError>;
}

pub struct NcbiHttpClient<'a> {
    client: Client,
    credentials: &'a Credentials,
    endpoints: Endpoints,
}

impl<'a> NcbiHttpClient<'a> {
    pub fn new(credentials: &'a Credentials, endpoints: Endpoints) -> Result<Self, GeneSeqError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("get-gene-seq/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| GeneSeqError::NcbiHttp(err.to_string()))?,
        );
        headers.insert("X-Datasets-Client", HeaderValue::from_static("get-gene-seq"));
        headers.insert(
            "X-Datasets-Client-Version",
            HeaderValue::from_str(env!("CARGO_PKG_VERSION"))
                .map_err(|err| GeneSeqError::NcbiHttp(err.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|err| GeneSeqError::NcbiHttp(err.to_string()))?;

        Ok(Self {
            client,
            credentials,
            endpoints,
        })
    }

    pub fn download_url(&self, id: &Identifier, database: Database) -> String {
        format!(
            "{}/{}/{}/download",
            self.endpoints.datasets_url,
            database.profile().download_path,
            id.as_str()
        )
    }

    fn eutils_get(&self, url: &str) -> RequestBuilder {
        self.client.get(url).query(&[
            ("retmode", "json"),
            ("email", self.credentials.email.as_str()),
            ("api_key", self.credentials.api_key.as_str()),
        ])
    }

    fn send(request: RequestBuilder) -> Result<Response, GeneSeqError> {
        let response = request
            .send()
            .map_err(|err| GeneSeqError::NcbiHttp(err.to_string()))?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "NCBI request failed".to_string());
        Err(GeneSeqError::NcbiStatus { status, message })
    }

    fn send_json(request: RequestBuilder) -> Result<Value, GeneSeqError> {
        Self::send(request)?
            .json()
            .map_err(|err| GeneSeqError::NcbiResponse(err.to_string()))
    }

    /// Streams the body into a sibling temp file and renames it over
    /// `destination` only once the whole body has arrived.
    fn write_response_to_file(
        mut response: Response,
        destination: &Path,
    ) -> Result<DownloadInfo, GeneSeqError> {
        let is_zip = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains("zip"))
            .unwrap_or(false);

        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => std::env::current_dir()
                .map_err(|err| GeneSeqError::Filesystem(err.to_string()))?,
        };
        fs::create_dir_all(&parent).map_err(|err| GeneSeqError::Filesystem(err.to_string()))?;
        let mut temp = tempfile::Builder::new()
            .prefix(".get-gene-seq")
            .suffix(".part")
            .tempfile_in(&parent)
            .map_err(|err| GeneSeqError::Filesystem(err.to_string()))?;
        let bytes = std::io::copy(&mut response, temp.as_file_mut())
            .map_err(|err| GeneSeqError::NcbiHttp(err.to_string()))?;
        temp.persist(destination)
            .map_err(|err| GeneSeqError::Filesystem(err.to_string()))?;
        Ok(DownloadInfo { bytes, is_zip })
    }
}

impl NcbiClient for NcbiHttpClient<'_> {
    fn search_identifier(&self, query: &Query) -> Result<Option<Identifier>, GeneSeqError> {
        let term = query.search_term();
        debug!(%term, db = %query.database, "esearch");
        let request = self
            .eutils_get(&self.endpoints.esearch_url())
            .query(&[("db", query.database.as_str()), ("term", term.as_str())]);
        let body = Self::send_json(request)?;
        Ok(first_search_id(&body))
    }

    fn summary_label(
        &self,
        id: &Identifier,
        database: Database,
    ) -> Result<Option<String>, GeneSeqError> {
        debug!(id = %id, db = %database, "esummary");
        let request = self
            .eutils_get(&self.endpoints.esummary_url())
            .query(&[("db", database.as_str()), ("id", id.as_str())]);
        let body = Self::send_json(request)?;
        Ok(summary_label_from(&body, id, database))
    }

    fn download_archive(
        &self,
        id: &Identifier,
        database: Database,
        breadth: AnnotationBreadth,
        destination: &Path,
    ) -> Result<DownloadInfo, GeneSeqError> {
        let url = self.download_url(id, database);
        let params = download_params(&self.credentials.api_key, database, breadth);
        debug!(%url, ?breadth, "datasets download");
        let response = Self::send(self.client.get(&url).query(&params))?;
        Self::write_response_to_file(response, destination)
    }
}

/// Query pairs for a Datasets download: the API key followed by one
/// `include_annotation_type` per requested annotation.
pub fn download_params(
    api_key: &str,
    database: Database,
    breadth: AnnotationBreadth,
) -> Vec<(&'static str, String)> {
    let mut params = vec![("api_key", api_key.to_string())];
    params.extend(
        database
            .profile()
            .annotation_types(breadth)
            .iter()
            .map(|kind| ("include_annotation_type", kind.as_str().to_string())),
    );
    params
}

pub fn first_search_id(body: &Value) -> Option<Identifier> {
    body.get("esearchresult")
        .and_then(|v| v.get("idlist"))
        .and_then(|v| v.as_array())
        .and_then(|ids| ids.first())
        .and_then(|v| v.as_str())
        .map(Identifier::new)
}

pub fn summary_label_from(body: &Value, id: &Identifier, database: Database) -> Option<String> {
    body.get("result")
        .and_then(|v| v.get(id.as_str()))
        .and_then(|v| v.get(database.profile().summary_field))
        .and_then(|v| v.as_str())
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}
