//! Configuration for the `daemon` command.
//!
//! Read from `~/.config/rss-checker/config.toml` unless a path is given.
//! If the default file doesn't exist, a commented template is written there.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Daemon configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Seconds between checks of every host.
    pub interval: u64,
    /// Address that receives every notification.
    pub receiver: Option<String>,
    /// Site reference to the patterns checked against it.
    pub hosts: Option<BTreeMap<String, Vec<String>>>,
    pub smtp: SmtpConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL_SECS,
            receiver: None,
            hosts: None,
            smtp: SmtpConfig::default(),
        }
    }
}

/// How the relay connection is secured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    None,
    /// STARTTLS when the relay offers it.
    #[default]
    Opportunistic,
    Required,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub tls: TlsMode,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 25,
            tls: TlsMode::default(),
            username: None,
            password: None,
            timeout_secs: 30,
        }
    }
}

impl DaemonConfig {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// The result is validated; a daemon cannot start without hosts and a
    /// receiver.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    tracing::info!("Wrote a config template to {}", default_path.display());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config = Self::from_toml(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hosts.as_ref().is_none_or(BTreeMap::is_empty) {
            return Err(ConfigError::NoHosts);
        }
        if self.receiver.as_deref().is_none_or(|r| r.trim().is_empty()) {
            return Err(ConfigError::NoReceiver);
        }
        if self.interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.smtp.username.is_some() != self.smtp.password.is_some() {
            return Err(ConfigError::IncompleteCredentials);
        }
        Ok(())
    }

    /// Get the default config file path: `~/.config/rss-checker/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("rss-checker").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// The commented template. Every entry is commented out, so the daemon
    /// refuses to start until hosts are filled in.
    fn default_config_content() -> String {
        r##"# rss-checker daemon configuration

# Seconds between two checks of the same host
# interval = 60

# Address notified about every match
# receiver = "me@example.com"

# Sites to watch and the patterns searched in item titles and categories.
# Patterns are case-insensitive regular expressions.
# [hosts]
# "fly4free.pl" = ["wroclaw\\w*", "katowic\\w*"]

# [smtp]
# host = "localhost"
# port = 25
# tls = "opportunistic"   # none | opportunistic | required
# username = "user"
# password = "secret"
# timeout_secs = 30
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("No hosts configured")]
    NoHosts,

    #[error("No receiver configured")]
    NoReceiver,

    #[error("Interval must be greater than zero")]
    ZeroInterval,

    #[error("SMTP username and password must be given together")]
    IncompleteCredentials,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
interval = 300
receiver = "me@example.com"

[hosts]
"fly4free.pl" = ["wroclaw\\w*", "katowic\\w*"]
"https://blog.example.com/rss" = ["rust"]

[smtp]
host = "mail.example.com"
port = 587
tls = "required"
username = "user"
password = "secret"
"#;

    #[test]
    fn test_full_config() {
        let config = DaemonConfig::from_toml(FULL).unwrap();
        config.validate().unwrap();

        assert_eq!(config.interval, 300);
        assert_eq!(config.receiver.as_deref(), Some("me@example.com"));
        let hosts = config.hosts.unwrap();
        assert_eq!(hosts["fly4free.pl"], ["wroclaw\\w*", "katowic\\w*"]);
        assert_eq!(hosts.len(), 2);
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.smtp.tls, TlsMode::Required);
        // Unset fields keep their defaults
        assert_eq!(config.smtp.timeout_secs, 30);
    }

    #[test]
    fn test_defaults() {
        let config = DaemonConfig::from_toml(
            "receiver = \"me@example.com\"\n[hosts]\n\"example.com\" = [\"x\"]\n",
        )
        .unwrap();
        config.validate().unwrap();

        assert_eq!(config.interval, DEFAULT_INTERVAL_SECS);
        assert_eq!(config.smtp.host, "localhost");
        assert_eq!(config.smtp.port, 25);
        assert_eq!(config.smtp.tls, TlsMode::Opportunistic);
        assert!(config.smtp.username.is_none());
    }

    #[test]
    fn test_template_deserializes_but_is_incomplete() {
        let config = DaemonConfig::from_toml(&DaemonConfig::default_config_content()).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::NoHosts)));
    }

    #[test]
    fn test_validation() {
        let no_receiver = DaemonConfig::from_toml("[hosts]\n\"a.com\" = [\"x\"]\n").unwrap();
        assert!(matches!(no_receiver.validate(), Err(ConfigError::NoReceiver)));

        let empty_hosts =
            DaemonConfig::from_toml("receiver = \"me@example.com\"\n[hosts]\n").unwrap();
        assert!(matches!(empty_hosts.validate(), Err(ConfigError::NoHosts)));

        let zero = DaemonConfig::from_toml(
            "interval = 0\nreceiver = \"me@example.com\"\n[hosts]\n\"a.com\" = [\"x\"]\n",
        )
        .unwrap();
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroInterval)));

        let half_credentials = DaemonConfig::from_toml(
            "receiver = \"me@example.com\"\n[hosts]\n\"a.com\" = [\"x\"]\n\
             [smtp]\nusername = \"u\"\n",
        )
        .unwrap();
        assert!(matches!(
            half_credentials.validate(),
            Err(ConfigError::IncompleteCredentials)
        ));
    }

    #[test]
    fn test_unknown_tls_mode_is_rejected() {
        assert!(DaemonConfig::from_toml("[smtp]\ntls = \"sometimes\"\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();

        let config = DaemonConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.interval, 300);
    }

    #[test]
    fn test_load_reports_path_on_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        match DaemonConfig::load(Some(&missing)) {
            Err(ConfigError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected io error, got {:?}", other),
        }

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "interval = [").unwrap();
        assert!(matches!(
            DaemonConfig::load(Some(&broken)),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_create_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        DaemonConfig::create_default_config(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("[hosts]"));
    }
}
