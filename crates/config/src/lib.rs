//! App configuration. The config file is optional; every field has a default,
//! so a missing file is equivalent to an empty one. Command line flags and
//! environment variables take precedence over anything loaded here.

use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::File,
    io,
    path::{Path, PathBuf},
};
use tracing::info;
use url::Url;
use xbe_util::{
    ResultTracedAnyhow,
    paths::{self, expand_home},
};

const PATH_ENV_VAR: &str = "XBE_CONFIG_PATH";
const FILE: &str = "config.yml";

/// Placeholder shown in place of a token when printing config
const REDACTED: &str = "<redacted>";

/// App-level configuration, shared by every command
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// API base URL. Overridden by `--base-url` and `$XBE_BASE_URL`
    pub base_url: Option<Url>,
    /// API tokens, keyed by the base URL they belong to
    pub tokens: IndexMap<String, String>,
    pub http: HttpConfig,
}

impl Config {
    /// Path to the configuration file, in this precedence:
    /// - Value of `$XBE_CONFIG_PATH`
    /// - `$CONFIG_DIR/xbe/config.yml`, where `$CONFIG_DIR` is defined by
    ///   [dirs::config_dir]
    pub fn path() -> PathBuf {
        if let Ok(path) = env::var(PATH_ENV_VAR) {
            return expand_home(PathBuf::from(path)).into_owned();
        }
        paths::config_directory().join(FILE)
    }

    /// Load configuration from the default path. See [Self::load_from]
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load configuration from a file. If the file doesn't exist, return the
    /// default config. Only fails if the file exists but can't be read or
    /// parsed. Unlike other app files, the config file is never created
    /// automatically because it may hold credentials.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        info!(?path, "Loading configuration file");
        let file = match File::open(path) {
            Ok(file) => file,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                info!(?path, "Configuration file not found, using defaults");
                return Ok(Self::default());
            }
            Err(error) => {
                return Err(error)
                    .with_context(|| {
                        format!("Error opening configuration file {path:?}")
                    })
                    .traced();
            }
        };

        // An empty file is valid YAML null, which serde_yaml rejects for a
        // struct. Treat it as an empty mapping instead.
        let value: Option<Self> = serde_yaml::from_reader(file)
            .with_context(|| {
                format!("Error loading configuration from {path:?}")
            })
            .traced()?;
        Ok(value.unwrap_or_default())
    }

    /// Get the stored token for a base URL. Trailing slashes are ignored when
    /// comparing URLs, so `https://host` and `https://host/` are equivalent.
    pub fn token_for(&self, base_url: &Url) -> Option<&str> {
        let target = base_url.as_str().trim_end_matches('/');
        self.tokens
            .iter()
            .find(|(url, _)| url.trim_end_matches('/') == target)
            .map(|(_, token)| token.as_str())
    }

    /// Get a copy of this config that's safe to print, with all token values
    /// replaced by a placeholder
    pub fn redacted(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            tokens: self
                .tokens
                .keys()
                .map(|url| (url.clone(), REDACTED.to_owned()))
                .collect(),
            http: self.http.clone(),
        }
    }
}

/// Configuration for the HTTP client
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Total request timeout, in seconds
    pub timeout: u64,
    /// Follow 3xx redirects?
    pub follow_redirects: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            follow_redirects: true,
        }
    }
}
