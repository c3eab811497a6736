use crate::error::GeneSeqError;

pub const EMAIL_VAR: &str = "NCBI_EMAIL";
pub const API_KEY_VAR: &str = "NCBI_API_KEY";
pub const EUTILS_URL_VAR: &str = "NCBI_EUTILS_URL";
pub const DATASETS_URL_VAR: &str = "NCBI_DATASETS_URL";

pub const DEFAULT_EUTILS_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
pub const DEFAULT_DATASETS_URL: &str = "https://api.ncbi.nlm.nih.gov/datasets/v2";

/// Identity sent with every NCBI request. Read once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self, GeneSeqError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, GeneSeqError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        match (read(EMAIL_VAR), read(API_KEY_VAR)) {
            (Some(email), Some(api_key)) => Ok(Self { email, api_key }),
            _ => Err(GeneSeqError::MissingCredentials),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub eutils_url: String,
    pub datasets_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            eutils_url: DEFAULT_EUTILS_URL.to_string(),
            datasets_url: DEFAULT_DATASETS_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str, default: &str| {
            lookup(name)
                .map(|value| value.trim().trim_end_matches('/').to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            eutils_url: read(EUTILS_URL_VAR, DEFAULT_EUTILS_URL),
            datasets_url: read(DATASETS_URL_VAR, DEFAULT_DATASETS_URL),
        }
    }

    pub fn esearch_url(&self) -> String {
        format!("{}/esearch.fcgi", self.eutils_url)
    }

    pub fn esummary_url(&self) -> String {
        format!("{}/esummary.fcgi", self.eutils_url)
    }
}
