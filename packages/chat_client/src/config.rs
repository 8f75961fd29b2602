use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

// =============================================================================
// File config (figment-deserialized from defaults / config.toml / env vars)
// =============================================================================
//
//   config.toml:     [connection]
//                    endpoint = "ws://localhost:8000/ws"
//
//   env var:         CHAT_CONNECTION__ENDPOINT=ws://...   (double underscore = nesting)

/// Top-level tunable configuration, deserialized by figment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub connection: ConnectionFileConfig,
    #[serde(default)]
    pub ui: UiFileConfig,
}

/// Lives under `[connection]` in config.toml.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectionFileConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ConnectionFileConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Lives under `[ui]` in config.toml.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UiFileConfig {
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

impl Default for UiFileConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
        }
    }
}

fn default_endpoint() -> String {
    "ws://localhost:8000/ws".to_string()
}
fn default_connect_timeout_secs() -> u64 {
    10
}
fn default_prompt() -> String {
    "> ".to_string()
}

/// Build a figment that layers: defaults → config.toml → CHAT_* env vars.
pub fn load_config(config_path: &Path) -> figment::Figment {
    use figment::{
        Figment,
        providers::{Env, Format, Serialized, Toml},
    };

    Figment::from(Serialized::defaults(FileConfig::default()))
        .merge(Toml::file(config_path))
        .merge(Env::prefixed("CHAT_").split("__"))
}

/// `<config dir>/chat_client/config.toml`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("chat_client").join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

// =============================================================================
// Runtime config (validated view of FileConfig)
// =============================================================================

#[derive(Clone, Debug)]
pub struct ChatConfig {
    /// WebSocket address of the chat backend, fixed for the process lifetime
    pub endpoint: String,
    pub connect_timeout: Duration,
    /// Prompt shown before each line in interactive mode
    pub prompt: String,
}

impl ChatConfig {
    pub fn from_file(fc: &FileConfig) -> Result<Self, ConfigError> {
        let endpoint = fc.connection.endpoint.trim();
        if !endpoint.starts_with("ws://") {
            return Err(ConfigError::InvalidEndpoint(endpoint.to_string()));
        }
        if fc.connection.connect_timeout_secs == 0 {
            return Err(ConfigError::ZeroConnectTimeout);
        }
        Ok(Self {
            endpoint: endpoint.to_string(),
            connect_timeout: Duration::from_secs(fc.connection.connect_timeout_secs),
            prompt: fc.ui.prompt.clone(),
        })
    }
}
