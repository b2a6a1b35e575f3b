//! One-shot loading of the article collection.
//!
//! The collection is a single JSON array, read either from a local file or
//! from an `http(s)` URL. Both paths enforce the same size cap before
//! anything is parsed.
use crate::article::Article;
use futures::StreamExt;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default collection path, relative to the working directory.
pub const DEFAULT_SOURCE: &str = "articles.json";

const DEFAULT_MAX_BYTES: usize = 20 * 1024 * 1024; // 20 MiB
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Impossible de lire {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Erreur réseau: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Délai dépassé après {0}s")]
    Timeout(u64),
    #[error("Erreur HTTP: statut {0}")]
    HttpStatus(u16),
    #[error("Collection trop volumineuse (plus de {0} octets)")]
    TooLarge(usize),
    #[error("JSON invalide: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Le document JSON n'est pas un tableau d'articles")]
    NotAnArray,
    #[error("Article {index} invalide: {reason}")]
    InvalidArticle { index: usize, reason: String },
    #[error("Source invalide: {0}")]
    InvalidSource(String),
}

// ============================================================================
// Source
// ============================================================================

/// Where the collection comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Http(Url),
}

impl Source {
    /// Interpret `raw` as a URL when it has an `http://` or `https://`
    /// prefix, otherwise as a filesystem path.
    pub fn parse(raw: &str) -> Result<Self, LoadError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LoadError::InvalidSource(raw.to_string()));
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(trimmed)
                .map_err(|e| LoadError::InvalidSource(format!("{}: {}", trimmed, e)))?;
            if url.host_str().is_none() {
                return Err(LoadError::InvalidSource(trimmed.to_string()));
            }
            return Ok(Self::Http(url));
        }

        Ok(Self::File(PathBuf::from(trimmed)))
    }
}

impl Default for Source {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_SOURCE))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Http(url) => write!(f, "{}", url),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Fail on the first malformed entry instead of skipping it.
    pub strict: bool,
    /// Applies to the HTTP request only.
    pub timeout: Duration,
    pub max_bytes: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            strict: false,
            timeout: DEFAULT_TIMEOUT,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// A successfully loaded collection.
#[derive(Debug, Clone, Default)]
pub struct Loaded {
    pub articles: Vec<Article>,
    /// Entries dropped because they were not valid articles.
    pub skipped: usize,
}

/// Fetch and parse the collection.
pub async fn load_articles(
    source: &Source,
    client: &reqwest::Client,
    options: &LoadOptions,
) -> Result<Loaded, LoadError> {
    let bytes = match source {
        Source::File(path) => read_file(path, options.max_bytes).await?,
        Source::Http(url) => fetch(client, url, options).await?,
    };

    let loaded = parse_articles(&bytes, options.strict)?;

    tracing::info!(
        source = %source,
        count = loaded.articles.len(),
        skipped = loaded.skipped,
        "Loaded articles"
    );

    Ok(loaded)
}

async fn read_file(path: &Path, limit: usize) -> Result<Vec<u8>, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = tokio::fs::metadata(path).await.map_err(io_err)?;
    if metadata.len() > limit as u64 {
        return Err(LoadError::TooLarge(limit));
    }

    tokio::fs::read(path).await.map_err(io_err)
}

async fn fetch(
    client: &reqwest::Client,
    url: &Url,
    options: &LoadOptions,
) -> Result<Vec<u8>, LoadError> {
    tracing::debug!(url = %url, "Fetching article collection");

    let response = tokio::time::timeout(options.timeout, client.get(url.clone()).send())
        .await
        .map_err(|_| LoadError::Timeout(options.timeout.as_secs()))?
        .map_err(LoadError::Network)?;

    if !response.status().is_success() {
        return Err(LoadError::HttpStatus(response.status().as_u16()));
    }

    read_limited(response, options.max_bytes).await
}

async fn read_limited(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, LoadError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(LoadError::TooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(LoadError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(LoadError::TooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

/// Parse a JSON array of articles.
///
/// Entries that are not valid articles are skipped and counted, unless
/// `strict` is set, in which case the first one fails the whole parse.
pub fn parse_articles(bytes: &[u8], strict: bool) -> Result<Loaded, LoadError> {
    let entries = match serde_json::from_slice::<serde_json::Value>(bytes)? {
        serde_json::Value::Array(entries) => entries,
        _ => return Err(LoadError::NotAnArray),
    };

    let mut articles = Vec::with_capacity(entries.len());
    let mut skipped = 0;

    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Article>(entry) {
            Ok(article) => articles.push(article),
            Err(e) if strict => {
                return Err(LoadError::InvalidArticle {
                    index,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed article");
                skipped += 1;
            }
        }
    }

    Ok(Loaded { articles, skipped })
}
