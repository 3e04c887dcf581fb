use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use kings_step_chess::notation::AlgebraicCharset;
use serde::{Deserialize, Serialize};


// Console client settings. Every field is optional in the yaml file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    // Used when the server URL is not given on the command line.
    pub server_url: Option<String>,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    pub charset: AlgebraicCharset,
    // Draw pieces as chess symbols rather than letters.
    pub unicode_pieces: bool,
    // `env_logger` filter, e.g. "debug" or "kings_step_chess=debug". `RUST_LOG` takes precedence.
    pub log_filter: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server_url: None,
            request_timeout: Duration::from_secs(10),
            charset: AlgebraicCharset::Ascii,
            unicode_pieces: true,
            log_filter: None,
        }
    }
}

impl ClientConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read config file '{}'.", path.display()))?;
        serde_yaml::from_str(&contents)
            .context(format!("Failed to parse config file '{}'.", path.display()))
    }
}
