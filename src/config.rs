/// Gallery configuration
///
/// A small JSON file naming the public base address of the memes service:
///
/// ```json
/// { "baseurl": "https://memes.example.com" }
/// ```
///
/// Without an explicit path, the first existing file among
/// `~/.config/memes-gallery.json`, `./memes-gallery.json` and
/// `/etc/memes-gallery.json` is used.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Config file locations, in lookup order
const CONFIG_CANDIDATES: [&str; 3] = [
    "~/.config/memes-gallery.json",
    "memes-gallery.json",
    "/etc/memes-gallery.json",
];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GalleryConfig {
    /// Public base address; shared links are built from it
    pub baseurl: String,
    /// API origin, when it differs from `baseurl` (e.g. behind a proxy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl GalleryConfig {
    pub fn new(baseurl: impl Into<String>) -> Self {
        Self {
            baseurl: baseurl.into(),
            endpoint: None,
        }
    }

    /// Load the config, returning it along with the file it came from.
    ///
    /// An explicit `path` must exist. Otherwise the standard locations are
    /// tried in order.
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        if let Some(path) = path {
            let path = expand_home(&path.to_string_lossy());
            if !path.exists() {
                return Err(ConfigError::NotFound(path));
            }
            return Ok((Self::from_file(&path)?, path));
        }

        let mut last_tried = PathBuf::new();
        for candidate in CONFIG_CANDIDATES {
            let path = expand_home(candidate);
            debug!("Looking for config at {}", path.display());
            if path.exists() {
                return Ok((Self::from_file(&path)?, path));
            }
            last_tried = path;
        }

        Err(ConfigError::NotFound(last_tried))
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Public base address used for shared links
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        parse_http_url(&self.baseurl)
    }

    /// Address the API is reached at (`endpoint`, falling back to `baseurl`)
    pub fn api_base(&self) -> Result<Url, ConfigError> {
        match &self.endpoint {
            Some(endpoint) => parse_http_url(endpoint),
            None => self.base_url(),
        }
    }
}

fn parse_http_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {:?}", scheme),
        }),
    }
}

/// Expand a leading `~/` to the user's home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_explicit_path() {
        let file = config_file(r#"{"baseurl": "https://memes.example.com"}"#);

        let (config, path) = GalleryConfig::load(Some(file.path())).unwrap();

        assert_eq!(config, GalleryConfig::new("https://memes.example.com"));
        assert_eq!(path, file.path());
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");

        match GalleryConfig::load(Some(missing.as_path())) {
            Err(ConfigError::NotFound(path)) => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json() {
        let file = config_file(r#"{"base": "#);

        assert!(matches!(
            GalleryConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_endpoint_override() {
        let file = config_file(
            r#"{"baseurl": "https://memes.example.com", "endpoint": "http://localhost:8000"}"#,
        );
        let config = GalleryConfig::from_file(file.path()).unwrap();

        assert_eq!(config.base_url().unwrap().as_str(), "https://memes.example.com/");
        assert_eq!(config.api_base().unwrap().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_api_base_falls_back_to_baseurl() {
        let config = GalleryConfig::new("https://memes.example.com/");

        assert_eq!(config.api_base().unwrap(), config.base_url().unwrap());
    }

    #[test]
    fn test_rejects_non_http_urls() {
        assert!(matches!(
            GalleryConfig::new("not a url").base_url(),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            GalleryConfig::new("ftp://memes.example.com").base_url(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/etc/memes-gallery.json"), PathBuf::from("/etc/memes-gallery.json"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/.config/x.json"), home.join(".config/x.json"));
        }
    }
}
