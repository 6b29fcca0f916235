//! URL normalization and validation.
//!
//! # Rules
//! - Missing `http://`/`https://` prefix defaults to `https://`
//! - The result must parse as an absolute http(s) URL with a host
//! - The host (port stripped) must be a fully-qualified domain name
//!
//! IP literals and single-label hosts such as `localhost` fail the FQDN
//! check and are rejected.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::ConvertError;

const INVALID_URL: &str = "Invalid URL";
const INVALID_FQDN: &str = "Invalid URL: must be a valid FQDN";

const MAX_DOMAIN_LEN: usize = 253;

static DOMAIN_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("valid label regex")
});

static TOP_LEVEL_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z]{2,63}|xn--[A-Za-z0-9-]{1,59})$").expect("valid tld regex")
});

/// A URL that passed normalization and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidUrl(Url);

impl ValidUrl {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }
}

impl fmt::Display for ValidUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Normalize and validate a user-supplied URL.
pub fn validate_url(raw: &str) -> Result<ValidUrl, ConvertError> {
    let candidate = if has_http_scheme(raw) {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    if !is_valid_url(&candidate) {
        return Err(ConvertError::InvalidUrl(INVALID_URL.to_string()));
    }
    let url = Url::parse(&candidate)
        .map_err(|_| ConvertError::InvalidUrl(INVALID_URL.to_string()))?;

    let host = url.host_str().unwrap_or_default();
    if !is_valid_domain(host) {
        tracing::debug!(url = %candidate, host = %host, "Rejected non-FQDN host");
        return Err(ConvertError::InvalidUrl(INVALID_FQDN.to_string()));
    }

    Ok(ValidUrl(url))
}

/// Whether `candidate` is a syntactically valid absolute http(s) URL with a host.
pub fn is_valid_url(candidate: &str) -> bool {
    if candidate.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    match Url::parse(candidate) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

/// Whether `host` is a fully-qualified domain name.
pub fn is_valid_domain(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() || host.len() > MAX_DOMAIN_LEN {
        return false;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    if !labels.iter().all(|label| DOMAIN_LABEL.is_match(label)) {
        return false;
    }

    labels
        .last()
        .is_some_and(|tld| TOP_LEVEL_LABEL.is_match(tld))
}

fn has_http_scheme(raw: &str) -> bool {
    let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
