//! Ballot core configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use isaac_types::NetworkId;
use isaac_utils::LogFormat;

use crate::codec::WireFormat;
use crate::error::BallotError;

/// Settings a node hands to the ballot core.
///
/// Can be loaded from a TOML file via [`BallotConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotConfig {
    /// Mixed into every fact and seal signature.
    #[serde(default = "default_network_id")]
    pub network_id: String,

    #[serde(default)]
    pub wire_format: WireFormat,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_network_id() -> String {
    "isaac-dev".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl BallotConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, BallotError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| BallotError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, BallotError> {
        let config: Self = toml::from_str(s).map_err(|e| BallotError::Config(e.to_string()))?;
        if config.network_id.is_empty() {
            return Err(BallotError::Config("network_id must not be empty".into()));
        }
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, BallotError> {
        toml::to_string_pretty(self).map_err(|e| BallotError::Config(e.to_string()))
    }

    pub fn network_id(&self) -> NetworkId {
        NetworkId::from(self.network_id.as_str())
    }

    pub fn codec(&self) -> WireFormat {
        self.wire_format
    }

    /// Install the global tracing subscriber described by this config.
    pub fn init_logging(&self) -> Result<(), BallotError> {
        isaac_utils::init_logging(self.log_format, &self.log_level)
            .map_err(|e| BallotError::Config(e.to_string()))
    }
}

impl Default for BallotConfig {
    fn default() -> Self {
        Self {
            network_id: default_network_id(),
            wire_format: WireFormat::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = BallotConfig::default();
        let toml_str = config.to_toml_string().expect("serializable");
        let parsed = BallotConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = BallotConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.network_id, "isaac-dev");
        assert_eq!(config.codec(), WireFormat::Json);
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            network_id = "showme"
            wire_format = "binary"
        "#;
        let config = BallotConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.network_id(), NetworkId::from("showme"));
        assert_eq!(config.codec(), WireFormat::Binary);
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn unknown_wire_format_rejected() {
        let err = BallotConfig::from_toml_str(r#"wire_format = "bson""#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn empty_network_id_rejected() {
        assert!(BallotConfig::from_toml_str(r#"network_id = """#).is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("ballot.toml");
        std::fs::write(&path, "network_id = \"showme\"\nlog_format = \"json\"\n").unwrap();
        let config = BallotConfig::from_toml_file(&path).expect("should load");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let err = BallotConfig::from_toml_file("/nonexistent/ballot.toml").unwrap_err();
        assert!(matches!(err, BallotError::Config(_)));
    }
}
