//! HTTP client construction for results-page requests.
//!
//! One [`reqwest::Client`] is built per [`crate::engines::YouTubeClient`]
//! and reused by both tiers of every resolution. It carries browser-like
//! headers, a consent cookie so EU regions are not redirected to a consent
//! wall, and a User-Agent picked from a small rotation list.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use url::Url;

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Desktop browser User-Agents. Mobile agents get a different page layout
/// without `ytInitialData`, so none are listed.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:136.0) Gecko/20100101 Firefox/136.0",
];

/// Pre-accepted consent cookies, seeded into the jar for the base URL.
const CONSENT_COOKIES: &[&str] = &["CONSENT=YES+cb; Path=/", "SOCS=CAI; Path=/"];

/// Build the shared client for upstream requests.
///
/// The request timeout comes from `config.timeout_seconds` and is the only
/// bound on an upstream call; the orchestrator adds none of its own.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if a header value or the base URL is
/// invalid, and [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = config
        .user_agent
        .clone()
        .unwrap_or_else(|| random_user_agent().to_owned());

    reqwest::Client::builder()
        .cookie_provider(consent_jar(&config.base_url)?)
        .default_headers(default_headers(config)?)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Headers sent with every request.
fn default_headers(config: &SearchConfig) -> Result<HeaderMap, SearchError> {
    let language = format!("{}-{},{};q=0.9", config.language, config.region, config.language);
    let language = HeaderValue::from_str(&language)
        .map_err(|e| SearchError::Config(format!("invalid language/region header: {e}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml"));
    headers.insert(ACCEPT_LANGUAGE, language);
    Ok(headers)
}

/// Cookie jar holding the consent cookies for `base_url`.
///
/// Cookies set by the upstream (for example on a consent redirect) are
/// stored in the same jar and sent back on later requests.
fn consent_jar(base_url: &str) -> Result<Arc<Jar>, SearchError> {
    let url = Url::parse(base_url)
        .map_err(|e| SearchError::Config(format!("invalid base_url {base_url:?}: {e}")))?;
    let jar = Jar::default();
    for cookie in CONSENT_COOKIES {
        jar.add_cookie_str(cookie, &url);
    }
    Ok(Arc::new(jar))
}

/// Pick a User-Agent from the rotation list.
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_user_agent_is_desktop() {
        let ua = random_user_agent();
        assert!(USER_AGENTS.contains(&ua));
        assert!(!ua.contains("Mobile"));
    }

    #[test]
    fn headers_follow_language_and_region() {
        let config = SearchConfig {
            language: "de".into(),
            region: "AT".into(),
            ..Default::default()
        };
        let headers = default_headers(&config).expect("headers");
        assert_eq!(headers[ACCEPT_LANGUAGE], "de-AT,de;q=0.9");
        assert!(!headers.contains_key(reqwest::header::COOKIE));
    }

    #[test]
    fn consent_jar_serves_base_url() {
        use reqwest::cookie::CookieStore;

        let jar = consent_jar("https://www.youtube.com").expect("jar");
        let url = Url::parse("https://www.youtube.com/results?search_query=x").expect("url");
        let cookies = jar.cookies(&url).expect("cookies");
        let cookies = cookies.to_str().expect("ascii");
        assert!(cookies.contains("CONSENT=YES+cb"), "got {cookies}");
        assert!(cookies.contains("SOCS=CAI"), "got {cookies}");
    }

    #[test]
    fn consent_jar_rejects_bad_base_url() {
        let err = consent_jar("not a url").unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }

    #[test]
    fn invalid_language_rejected() {
        let config = SearchConfig {
            language: "en\nX-Evil: 1".into(),
            ..Default::default()
        };
        let err = default_headers(&config).unwrap_err();
        assert!(err.to_string().contains("language"));
    }

    #[test]
    fn build_client_with_default_config() {
        assert!(build_client(&SearchConfig::default()).is_ok());
    }

    #[test]
    fn build_client_with_custom_ua() {
        let config = SearchConfig {
            user_agent: Some("vidfind-test/1.0".into()),
            ..Default::default()
        };
        assert!(build_client(&config).is_ok());
    }
}
