//! Client configuration.
//!
//! Values come from CLI flags, which fall back to environment variables
//! (optionally loaded from `.env`).

use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: &str, timeout_secs: u64) -> Result<Self> {
        let mut api_url =
            Url::parse(api_url).with_context(|| format!("Invalid API URL {:?}", api_url))?;

        if !matches!(api_url.scheme(), "http" | "https") {
            bail!("API URL must use http or https, got {}", api_url.scheme());
        }
        if timeout_secs == 0 {
            bail!("Timeout must be at least one second");
        }

        // Url::join replaces the last path segment unless the path ends with '/'
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Absolute URL of an API endpoint such as `getAllTracks`.
    pub fn endpoint(&self, name: &str) -> Result<Url> {
        self.api_url
            .join(name.trim_start_matches('/'))
            .with_context(|| format!("Failed to build URL for {}", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join_keeps_base_path() {
        let config = ClientConfig::new("http://192.168.1.20:5000/api", 5).unwrap();
        assert_eq!(
            config.endpoint("getAllTracks").unwrap().as_str(),
            "http://192.168.1.20:5000/api/getAllTracks"
        );
        assert_eq!(
            config.endpoint("/getRadar").unwrap().as_str(),
            "http://192.168.1.20:5000/api/getRadar"
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ClientConfig::new("not a url", 5).is_err());
        assert!(ClientConfig::new("ftp://host/", 5).is_err());
        assert!(ClientConfig::new("http://localhost:5000", 0).is_err());
    }

    #[test]
    fn test_default() {
        let config = ClientConfig::new(DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.endpoint("addSong").unwrap().as_str(), "http://localhost:5000/addSong");
    }
}
