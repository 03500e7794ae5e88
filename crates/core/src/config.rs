//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the session, the services and the page workflows. Nothing below reads
//! environment variables; the binary collects raw values and hands them to the parsers here.

use crate::constants::{DEFAULT_LOGIN_DELAY_MS, DEFAULT_RECENT_LIMIT, LOCAL_STORE_FILENAME};
use crate::{RecordsError, RecordsResult};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    records_url: Url,
    extract_url: Url,
    state_dir: PathBuf,
    login_delay: Duration,
    recent_limit: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `RecordsError::InvalidInput` if either base URL cannot be used as a base for
    /// endpoint paths, or if `recent_limit` is zero.
    pub fn new(
        records_url: Url,
        extract_url: Url,
        state_dir: PathBuf,
        login_delay: Duration,
        recent_limit: usize,
    ) -> RecordsResult<Self> {
        for url in [&records_url, &extract_url] {
            if url.cannot_be_a_base() {
                return Err(RecordsError::InvalidInput(format!(
                    "service URL cannot be used as a base: {url}"
                )));
            }
        }
        if recent_limit == 0 {
            return Err(RecordsError::InvalidInput(
                "recent patient limit must be at least 1".into(),
            ));
        }

        Ok(Self {
            records_url,
            extract_url,
            state_dir,
            login_delay,
            recent_limit,
        })
    }

    pub fn records_url(&self) -> &Url {
        &self.records_url
    }

    pub fn extract_url(&self) -> &Url {
        &self.extract_url
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn local_store_path(&self) -> PathBuf {
        self.state_dir.join(LOCAL_STORE_FILENAME)
    }

    pub fn login_delay(&self) -> Duration {
        self.login_delay
    }

    pub fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Endpoint on the records service built from path segments.
    ///
    /// Segments are percent-encoded, so a registration number can never escape its
    /// path position.
    pub fn records_endpoint(&self, segments: &[&str]) -> Url {
        endpoint(&self.records_url, segments)
    }

    /// Endpoint on the extraction service built from path segments.
    pub fn extract_endpoint(&self, segments: &[&str]) -> Url {
        endpoint(&self.extract_url, segments)
    }
}

fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Parse a service base URL from an optional raw value.
///
/// If `value` is `None` or empty/whitespace, `default` is used.
pub fn base_url_from_env_value(value: Option<String>, default: &str) -> RecordsResult<Url> {
    let raw = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string());

    Url::parse(&raw).map_err(|e| RecordsError::InvalidInput(format!("invalid URL {raw:?}: {e}")))
}

/// Parse the simulated login delay in milliseconds.
pub fn login_delay_from_env_value(value: Option<String>) -> RecordsResult<Duration> {
    let ms = parse_number(value, "login delay")?.unwrap_or(DEFAULT_LOGIN_DELAY_MS);
    Ok(Duration::from_millis(ms))
}

/// Parse the dashboard's recent-patient limit.
pub fn recent_limit_from_env_value(value: Option<String>) -> RecordsResult<usize> {
    match parse_number(value, "recent patient limit")? {
        Some(n) => usize::try_from(n).map_err(|_| {
            RecordsError::InvalidInput(format!("recent patient limit is too large: {n}"))
        }),
        None => Ok(DEFAULT_RECENT_LIMIT),
    }
}

fn parse_number(value: Option<String>, what: &str) -> RecordsResult<Option<u64>> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| RecordsError::InvalidInput(format!("{what} must be a number: {v:?}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_EXTRACT_URL, DEFAULT_RECORDS_URL};

    #[test]
    fn test_base_url_falls_back_to_default() {
        let url = base_url_from_env_value(Some("   ".into()), DEFAULT_RECORDS_URL)
            .expect("default should parse");
        assert_eq!(url.as_str(), "https://health-link-backend.vercel.app/");
    }

    #[test]
    fn test_base_url_rejects_garbage() {
        let err = base_url_from_env_value(Some("not a url".into()), DEFAULT_RECORDS_URL)
            .expect_err("garbage should fail");
        assert!(matches!(err, RecordsError::InvalidInput(_)));
    }

    #[test]
    fn test_records_endpoint_appends_and_encodes_segments() {
        let cfg = CoreConfig::new(
            Url::parse("http://localhost:4000/api").unwrap(),
            Url::parse("http://localhost:5000/").unwrap(),
            PathBuf::from("state"),
            Duration::ZERO,
            3,
        )
        .expect("config should build");

        assert_eq!(
            cfg.records_endpoint(&["REG 1", "visits"]).as_str(),
            "http://localhost:4000/api/REG%201/visits"
        );
        assert_eq!(
            cfg.extract_endpoint(&["extract-data"]).as_str(),
            "http://localhost:5000/extract-data"
        );
    }

    #[test]
    fn test_zero_recent_limit_is_rejected() {
        let err = CoreConfig::new(
            Url::parse(DEFAULT_RECORDS_URL).unwrap(),
            Url::parse(DEFAULT_EXTRACT_URL).unwrap(),
            PathBuf::from("state"),
            Duration::ZERO,
            0,
        )
        .expect_err("zero limit should fail");
        assert!(matches!(err, RecordsError::InvalidInput(_)));
    }

    #[test]
    fn test_recent_limit_must_fit_platform_width() {
        let result = recent_limit_from_env_value(Some(u64::MAX.to_string()));
        match usize::try_from(u64::MAX) {
            Ok(max) => assert_eq!(result.expect("fits on this target"), max),
            Err(_) => assert!(matches!(result, Err(RecordsError::InvalidInput(_)))),
        }
    }

    #[test]
    fn test_numeric_values_parse_or_default() {
        assert_eq!(
            login_delay_from_env_value(None).unwrap(),
            Duration::from_millis(DEFAULT_LOGIN_DELAY_MS)
        );
        assert_eq!(
            login_delay_from_env_value(Some("0".into())).unwrap(),
            Duration::ZERO
        );
        assert_eq!(recent_limit_from_env_value(Some("5".into())).unwrap(), 5);
        assert!(recent_limit_from_env_value(Some("five".into())).is_err());
    }
}
