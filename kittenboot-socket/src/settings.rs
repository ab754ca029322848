//! Serializable connection settings.
//!
//! Everything in a [`SocketConfig`](crate::SocketConfig) except the
//! callbacks, so it can come from JSON, TOML or the environment.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;

/// Prefix for settings read from the environment.
pub const ENV_PREFIX: &str = "KITTENBOOT";

/// Connection settings without listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketSettings {
    /// Server url, `ws(s)://` or `http(s)://`
    pub url: String,
    /// STOMP endpoint registered on the server
    pub register_endpoint: String,
    /// Prefix of server-to-client destinations
    pub message_broker_prefix: String,
    /// Prefix of client-to-server destinations
    pub application_destination_prefix: String,
    /// Suppress default listener output
    #[serde(default)]
    pub silent: bool,
    /// Enable the transport's frame-level debug output
    #[serde(default)]
    pub debug: bool,
}

impl SocketSettings {
    /// Parse settings from a JSON value.
    ///
    /// Fails if a path segment holds anything other than a string.
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::Parse(format!("JSON: {}", e)))
    }

    /// Parse settings from JSON text.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(format!("JSON: {}", e)))
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(format!("TOML: {}", e)))
    }

    /// Read settings from `KITTENBOOT_*` environment variables.
    ///
    /// `KITTENBOOT_URL`, `KITTENBOOT_REGISTER_ENDPOINT`,
    /// `KITTENBOOT_MESSAGE_BROKER_PREFIX` and
    /// `KITTENBOOT_APPLICATION_DESTINATION_PREFIX` are required;
    /// `KITTENBOOT_SILENT` and `KITTENBOOT_DEBUG_TRANSPORT` default to off.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Read settings from environment variables under a custom prefix.
    pub fn from_env_with_prefix(prefix: &str) -> ConfigResult<Self> {
        Self::from_lookup(prefix, |key| env::var(key))
    }

    /// Read settings from any `PREFIX_KEY` lookup shaped like [`env::var`].
    ///
    /// Flags follow [`kittenboot_log::is_truthy`], so they read the same way
    /// as the logging variables.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let var = |key: &str| lookup(&format!("{}_{}", prefix, key));
        let required = |key: &str, field: &'static str| match var(key) {
            Ok(value) => Ok(value),
            Err(env::VarError::NotPresent) => Err(ConfigError::MissingField(field)),
            Err(e) => Err(ConfigError::Env(e)),
        };
        let flag = |key: &str| match var(key) {
            Ok(value) => Ok(kittenboot_log::is_truthy(&value)),
            Err(env::VarError::NotPresent) => Ok(false),
            Err(e) => Err(ConfigError::Env(e)),
        };

        Ok(Self {
            url: required("URL", "url")?,
            register_endpoint: required("REGISTER_ENDPOINT", "register_endpoint")?,
            message_broker_prefix: required("MESSAGE_BROKER_PREFIX", "message_broker_prefix")?,
            application_destination_prefix: required(
                "APPLICATION_DESTINATION_PREFIX",
                "application_destination_prefix",
            )?,
            silent: flag("SILENT")?,
            debug: flag("DEBUG_TRANSPORT")?,
        })
    }
}
