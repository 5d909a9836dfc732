//! Layered application configuration.
//!
//! Sources are merged in order, later ones winning:
//! 1. built-in defaults
//! 2. YAML file (`--config`)
//! 3. environment variables prefixed with `APP__`, nested keys split on `__`
//!    (e.g. `APP__SERVER__BIND_ADDR=0.0.0.0:8080`)
//! 4. CLI overrides (`--port`, `-v`)

use std::net::{AddrParseError, SocketAddr};
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Configuration error for loading and validating `AppConfig`
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file does not exist: {path}")]
    MissingFile { path: String },
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("invalid server.bind_addr '{addr}': {source}")]
    InvalidBindAddr {
        addr: String,
        #[source]
        source: AddrParseError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub problems: ProblemsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemsConfig {
    /// Base of the problem `type` URIs; each problem appends its own `#fragment`.
    pub help_base_url: String,
}

impl Default for ProblemsConfig {
    fn default() -> Self {
        Self {
            help_base_url: "https://example.com/help".to_owned(),
        }
    }
}

impl ProblemsConfig {
    /// Problem `type` URI for the given help anchor.
    #[must_use]
    pub fn type_url(&self, anchor: &str) -> String {
        format!("{}#{anchor}", self.help_base_url.trim_end_matches('#'))
    }
}

impl AppConfig {
    /// Load defaults, then the optional YAML file, then `APP__*` environment variables.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingFile` if `path` is given but is not a file,
    /// or `ConfigError::Load` if a source cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::figment(path)?.extract().map_err(Box::new).map_err(Into::into)
    }

    fn figment(path: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::MissingFile {
                    path: path.display().to_string(),
                });
            }
            figment = figment.merge(Yaml::file(path));
        }

        Ok(figment.merge(Env::prefixed("APP__").split("__")))
    }

    /// Apply command line overrides on top of the loaded configuration.
    ///
    /// `verbose` raises the log level: 1 = info, 2 = debug, 3+ = trace.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidBindAddr` if a port override is given and
    /// the configured bind address does not parse.
    pub fn apply_cli_overrides(
        &mut self,
        port: Option<u16>,
        verbose: u8,
    ) -> Result<(), ConfigError> {
        if let Some(port) = port {
            let mut addr = self.bind_addr()?;
            addr.set_port(port);
            self.server.bind_addr = addr.to_string();
        }

        match verbose {
            0 => {}
            1 => "info".clone_into(&mut self.logging.level),
            2 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }

        Ok(())
    }

    /// Parsed listener address.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidBindAddr` if `server.bind_addr` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .bind_addr
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                addr: self.server.bind_addr.clone(),
                source,
            })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_sources() {
        Jail::expect_with(|_jail| {
            let cfg = AppConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(cfg, AppConfig::default());
            assert_eq!(cfg.server.bind_addr, "127.0.0.1:8087");
            assert_eq!(cfg.logging.level, "info");
            assert_eq!(cfg.logging.format, LogFormat::Text);
            assert_eq!(cfg.problems.help_base_url, "https://example.com/help");
            Ok(())
        });
    }

    #[test]
    fn yaml_overrides_defaults_and_env_overrides_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "demo.yaml",
                r#"
server:
  bind_addr: "0.0.0.0:9000"
logging:
  level: "debug"
  format: "json"
"#,
            )?;
            jail.set_env("APP__SERVER__BIND_ADDR", "127.0.0.1:9100");

            let cfg = AppConfig::load(Some(Path::new("demo.yaml"))).map_err(|e| e.to_string())?;
            assert_eq!(cfg.server.bind_addr, "127.0.0.1:9100");
            assert_eq!(cfg.logging.level, "debug");
            assert_eq!(cfg.logging.format, LogFormat::Json);
            assert_eq!(cfg.problems, ProblemsConfig::default());
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_rejected() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/demo.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn cli_overrides_port_and_verbosity() {
        let mut cfg = AppConfig::default();
        cfg.apply_cli_overrides(Some(9999), 2).unwrap();
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:9999");
        assert_eq!(cfg.logging.level, "debug");

        cfg.apply_cli_overrides(None, 5).unwrap();
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:9999");
        assert_eq!(cfg.logging.level, "trace");
    }

    #[test]
    fn invalid_bind_addr_is_reported() {
        let mut cfg = AppConfig::default();
        cfg.server.bind_addr = "not-an-address".to_owned();

        let err = cfg.bind_addr().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
        assert!(cfg.apply_cli_overrides(Some(8080), 0).is_err());
    }

    #[test]
    fn type_url_appends_anchor() {
        let problems = ProblemsConfig::default();
        assert_eq!(problems.type_url("bad-body"), "https://example.com/help#bad-body");

        let problems = ProblemsConfig {
            help_base_url: "/help#".to_owned(),
        };
        assert_eq!(problems.type_url("not-found"), "/help#not-found");
    }
}
