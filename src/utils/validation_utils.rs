use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;
use url::Url;

use crate::error::{UtilsError, UtilsResult};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[[:word:]]+([.-]?[[:word:]]+)*@[[:word:]]+([.-]?[[:word:]]+)*(\.[[:word:]]{2,3})+$")
        .expect("email pattern is valid")
});

const TWITTER_HOSTS: &[&str] = &["twitter.com", "www.twitter.com"];

/// Validation utility functions
pub struct ValidationUtils;

impl ValidationUtils {
    /// Reduce an absolute http(s) URL to `host[:port]/path?query` without a
    /// leading `www.`
    ///
    /// `"https://www.portalnesia.com/news?foo=bar"` => `"portalnesia.com/news?foo=bar"`
    pub fn parse_url(s: &str) -> UtilsResult<String> {
        if !s.starts_with("http") {
            return Err(UtilsError::invalid_url(s));
        }

        let url = Url::parse(s)?;
        let host = url.host_str().ok_or_else(|| UtilsError::invalid_url(s))?;

        let mut parsed = host.strip_prefix("www.").unwrap_or(host).to_string();
        if let Some(port) = url.port() {
            let _ = write!(parsed, ":{}", port);
        }

        if url.path() != "/" || has_explicit_path(s) {
            parsed.push_str(url.path());
        }

        if let Some(query) = url.query().filter(|q| !q.is_empty()) {
            parsed.push('?');
            parsed.push_str(query);
        }

        Ok(parsed)
    }

    /// Absolute URL or rooted path (`/contact`)
    pub fn is_url(s: &str) -> bool {
        s.starts_with('/') || Url::parse(s).is_ok()
    }

    /// http(s) URL whose host is twitter.com, with or without `www.`
    pub fn is_twitter_url(s: &str) -> bool {
        if !Self::is_url(s) {
            return false;
        }

        match Url::parse(s) {
            Ok(url) => {
                matches!(url.scheme(), "http" | "https")
                    && url.host_str().map_or(false, |host| TWITTER_HOSTS.contains(&host))
            }
            Err(_) => false,
        }
    }

    /// Validate email format
    pub fn validate_email(email: &str) -> bool {
        EMAIL.is_match(email)
    }
}

/// Whether the text after the authority starts a path, so that
/// `https://host/` keeps its slash and `https://host` does not.
fn has_explicit_path(s: &str) -> bool {
    s.split_once("://")
        .and_then(|(_, rest)| rest.split(['?', '#']).next())
        .map_or(false, |authority_and_path| authority_and_path.contains('/'))
}
