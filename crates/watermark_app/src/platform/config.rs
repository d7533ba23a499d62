use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use watermark_engine::GatewaySettings;
use watermark_logging::{wm_info, wm_warn};

pub(crate) const CONFIG_FILENAME: &str = "watermark_client.ron";
pub(crate) const SERVER_URL_ENV: &str = "WATERMARK_SERVER_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ClientConfig {
    pub server_url: String,
    pub output_dir: PathBuf,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let gateway = GatewaySettings::default();
        Self {
            server_url: gateway.base_url,
            output_dir: PathBuf::from("downloads"),
            connect_timeout_secs: gateway.connect_timeout.as_secs(),
            request_timeout_secs: gateway.request_timeout.map(|timeout| timeout.as_secs()),
        }
    }
}

impl ClientConfig {
    pub(crate) fn with_server_override(mut self, server_url: Option<String>) -> Self {
        if let Some(url) = server_url.filter(|url| !url.trim().is_empty()) {
            self.server_url = url.trim().to_string();
        }
        self
    }

    pub(crate) fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            base_url: self.server_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            ..GatewaySettings::default()
        }
    }
}

/// Reads `watermark_client.ron` from `dir`, falling back to defaults.
pub(crate) fn load_config(dir: &Path) -> ClientConfig {
    let path = dir.join(CONFIG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return ClientConfig::default();
        }
        Err(err) => {
            wm_warn!("Failed to read config from {:?}: {}", path, err);
            return ClientConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            wm_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            wm_warn!("Failed to parse config from {:?}: {}", path, err);
            ClientConfig::default()
        }
    }
}
