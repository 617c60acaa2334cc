//! URL 验证模块
//!
//! A target is accepted when it parses as an absolute URL whose scheme is not
//! one of the script/local schemes in [`DANGEROUS_SCHEMES`].

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL is required"),
            Self::DangerousProtocol(scheme) => write!(f, "Dangerous protocol blocked: {}:", scheme),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
pub const DANGEROUS_SCHEMES: &[&str] = &["javascript", "data", "file", "vbscript", "about", "blob"];

/// Check that `url` is a well-formed absolute URL with an allowed scheme
pub fn validate_url(url: &str) -> Result<Url, UrlValidationError> {
    if url.trim().is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    // Url::parse rejects relative references
    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    // scheme() is already lowercased and stripped of leading whitespace
    if DANGEROUS_SCHEMES.contains(&parsed.scheme()) {
        return Err(UrlValidationError::DangerousProtocol(parsed.scheme().to_string()));
    }

    Ok(parsed)
}

/// Wire form of a stored URL, safe to put in a `Location` header
///
/// Hosts are IDNA-encoded, paths and queries percent-encoded, and tabs or
/// newlines dropped, so the result is always ASCII.
pub fn normalize_url(url: &str) -> Result<String, UrlValidationError> {
    validate_url(url).map(String::from)
}

/// 获取 URL 验证错误的用户友好消息
pub fn validation_error_message(error: &UrlValidationError) -> &'static str {
    match error {
        UrlValidationError::EmptyUrl => "URL is required",
        UrlValidationError::DangerousProtocol(_) | UrlValidationError::InvalidFormat(_) => {
            "Invalid URL format"
        }
    }
}
