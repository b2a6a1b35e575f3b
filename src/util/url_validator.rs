use thiserror::Error;
use url::Url;

/// Longest URL handed to the system browser.
const MAX_URL_LENGTH: usize = 2048;

/// Why a URL was refused before being opened.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("URL invalide: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Schéma non supporté: {0} (http/https uniquement)")]
    UnsupportedScheme(String),
    #[error("URL sans hôte")]
    MissingHost,
    #[error("URL trop longue ({0} caractères)")]
    TooLong(usize),
}

/// Validate a URL taken from the article collection before passing it to
/// `open::that`.
///
/// The collection is external data, so only absolute `http`/`https` URLs
/// with a host are accepted. Anything else (`file://`, `javascript:`,
/// relative paths, strings smuggling shell syntax) is refused.
///
/// ```
/// use kiosque::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("https://www.blogdumoderateur.com/article/").is_ok());
/// assert!(validate_url_for_open("file:///etc/passwd").is_err());
/// assert!(validate_url_for_open("/relative/path").is_err());
/// ```
pub fn validate_url_for_open(raw: &str) -> Result<Url, UrlValidationError> {
    let trimmed = raw.trim();
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong(trimmed.len()));
    }

    let url = Url::parse(trimmed)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}
