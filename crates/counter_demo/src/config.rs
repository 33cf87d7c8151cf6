//! Runtime configuration for `counter_demo`.
//!
//! [`Config`] is the single source of truth for runtime options. It starts
//! from defaults, takes values from an optional JSON file, then lets flags
//! given on the command line override them.
//!
//! A config file may set any subset of the fields:
//!
//! ```json
//! { "name": "clicks", "timeout_ms": 1500, "offline_count": 12 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use widgets::{CountSource, DEFAULT_ENDPOINT, FetchError, FixedCountSource, HttpCountSource};

use crate::cli::Cli;

/// Default label shown under the title.
pub const DEFAULT_NAME: &str = "counter";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "Config naturally has boolean flags"
)]
pub struct Config {
    /// Label shown under the title.
    pub name: String,

    /// Service queried for the initial count.
    pub endpoint: String,

    /// Request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Fixed initial count; when set no request is made.
    pub offline_count: Option<i64>,

    /// Whether the fault probe starts armed.
    pub inject_fault: bool,

    /// Whether to emit ANSI colors.
    pub color: bool,

    /// Whether mouse input is enabled.
    pub mouse: bool,

    /// Whether to use alternate screen mode.
    pub alt_screen: bool,

    /// Log file; without one, logs only go to stderr in headless mode.
    pub log_file: Option<PathBuf>,

    /// Log verbosity level (0=warn, 1=info, 2=debug, 3+=trace).
    pub verbosity: u8,

    /// Whether running in headless self-check mode.
    #[serde(skip)]
    pub self_check: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            offline_count: None,
            inject_fault: false,
            color: true,
            mouse: true,
            alt_screen: true,
            log_file: None,
            verbosity: 0,
            self_check: false,
        }
    }
}

impl Config {
    /// Resolve the configuration from CLI arguments, reading the config file
    /// they name, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let base = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.merge_cli(cli))
    }

    /// Load a JSON config file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })
    }

    /// Apply the values given on the command line.
    #[must_use]
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(name) = &cli.name {
            self.name.clone_from(name);
        }
        if let Some(endpoint) = &cli.endpoint {
            self.endpoint.clone_from(endpoint);
        }
        if let Some(timeout_ms) = cli.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if cli.offline_count.is_some() {
            self.offline_count = cli.offline_count;
        }
        if cli.log_file.is_some() {
            self.log_file.clone_from(&cli.log_file);
        }
        self.inject_fault |= cli.inject_fault;
        self.color &= !cli.no_color;
        self.mouse &= !cli.no_mouse;
        self.alt_screen &= !cli.no_alt_screen;
        self.verbosity = self.verbosity.max(cli.verbose);
        self.self_check = cli.self_check;
        self
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check if running in headless mode.
    #[must_use]
    pub const fn is_headless(&self) -> bool {
        self.self_check
    }

    /// Log filter directive matching the verbosity.
    #[must_use]
    pub const fn log_directive(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Build the count source this configuration asks for.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn count_source(&self) -> Result<Arc<dyn CountSource>, FetchError> {
        match self.offline_count {
            Some(count) => Ok(Arc::new(FixedCountSource::ok(count))),
            None => Ok(Arc::new(HttpCountSource::new(
                self.endpoint.clone(),
                self.timeout(),
            )?)),
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.offline_count.is_none()
            && !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://"))
        {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        Ok(())
    }

    /// Export configuration as a diagnostic string.
    #[must_use]
    pub fn to_diagnostic_string(&self) -> String {
        let on_off = |flag: bool| if flag { "on" } else { "off" };
        let mut lines = Vec::new();

        lines.push(format!("Name: {}", self.name));
        match self.offline_count {
            Some(count) => lines.push(format!("Source: offline ({count})")),
            None => {
                lines.push(format!("Source: {}", self.endpoint));
                lines.push(format!("Timeout: {}ms", self.timeout_ms));
            }
        }
        lines.push(format!("Fault injected: {}", on_off(self.inject_fault)));
        lines.push(format!("Color: {}", on_off(self.color)));
        lines.push(format!("Mouse: {}", on_off(self.mouse)));
        lines.push(format!("Alt screen: {}", on_off(self.alt_screen)));
        if let Some(path) = &self.log_file {
            lines.push(format!("Log file: {}", path.display()));
        }
        lines.push(format!("Verbosity: {}", self.verbosity));

        lines.join("\n")
    }
}

/// Configuration error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: Arc<std::io::Error>,
    },

    /// The config file is not valid JSON for [`Config`].
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying parse error.
        source: Arc<serde_json::Error>,
    },

    /// The name is blank.
    #[error("name must not be empty")]
    EmptyName,

    /// The timeout is zero.
    #[error("timeout must be at least 1ms")]
    ZeroTimeout,

    /// The endpoint is not an http(s) URL.
    #[error("endpoint must be an http(s) URL: {0}")]
    InvalidEndpoint(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["counter_demo"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn config_default() {
        let config = Config::default();
        assert_eq!(config.name, "counter");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert!(config.offline_count.is_none());
        assert!(config.color);
        assert!(config.mouse);
        assert!(config.alt_screen);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_from_cli_flags() {
        let config = Config::from_cli(&cli(&[
            "--name",
            "clicks",
            "--offline-count",
            "7",
            "--no-color",
            "--no-mouse",
            "--no-alt-screen",
            "--inject-fault",
            "--self-check",
            "-v",
        ]))
        .unwrap();

        assert_eq!(config.name, "clicks");
        assert_eq!(config.offline_count, Some(7));
        assert!(!config.color);
        assert!(!config.mouse);
        assert!(!config.alt_screen);
        assert!(config.inject_fault);
        assert!(config.is_headless());
        assert_eq!(config.log_directive(), "info");
    }

    #[test]
    fn config_file_values_apply() {
        let file = write_config(r#"{ "name": "from-file", "timeout_ms": 1500, "mouse": false }"#);
        let path = file.path().to_str().unwrap();
        let config = Config::from_cli(&cli(&["--config", path])).unwrap();

        assert_eq!(config.name, "from-file");
        assert_eq!(config.timeout_ms, 1500);
        assert!(!config.mouse);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn cli_overrides_config_file() {
        let file = write_config(r#"{ "name": "from-file", "offline_count": 3 }"#);
        let path = file.path().to_str().unwrap();
        let config =
            Config::from_cli(&cli(&["--config", path, "--name", "from-cli"])).unwrap();

        assert_eq!(config.name, "from-cli");
        assert_eq!(config.offline_count, Some(3));
    }

    #[test]
    fn config_file_errors() {
        let err = Config::from_file(Path::new("/nonexistent/counter.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));

        let file = write_config("{ not json");
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("invalid config file"));
    }

    #[test]
    fn config_validation() {
        let mut config = Config {
            name: "  ".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyName)));

        config.name = "ok".to_string();
        config.timeout_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));

        config.timeout_ms = 10;
        config.endpoint = "ftp://example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint(_))
        ));

        config.offline_count = Some(1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_count_source() {
        let offline = Config {
            offline_count: Some(12),
            ..Config::default()
        };
        let source = offline.count_source().unwrap();
        assert_eq!(source.fetch().unwrap(), 12);
        assert_eq!(source.describe(), "fixed 12");

        let online = Config::default().count_source().unwrap();
        assert!(online.describe().starts_with("http "));
    }

    #[test]
    fn config_diagnostics() {
        let config = Config {
            offline_count: Some(5),
            ..Config::default()
        };
        let text = config.to_diagnostic_string();
        assert!(text.contains("Name: counter"));
        assert!(text.contains("Source: offline (5)"));
        assert!(!text.contains("Timeout"));

        let text = Config::default().to_diagnostic_string();
        assert!(text.contains(DEFAULT_ENDPOINT));
        assert!(text.contains("Timeout: 3000ms"));
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = Config {
            name: "saved".to_string(),
            offline_count: Some(4),
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
