use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/client.json";
pub const HOST_ENV: &str = "LINECHAT_HOST";
pub const PORT_ENV: &str = "LINECHAT_PORT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub server_host: String,
    #[serde(default = "default_port")]
    pub server_port: u16,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: default_host(),
            server_port: default_port(),
        }
    }
}

impl AppConfig {
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Applies `LINECHAT_HOST` / `LINECHAT_PORT` on top of the file values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(env::var(HOST_ENV).ok(), env::var(PORT_ENV).ok())
    }

    fn with_overrides(mut self, host: Option<String>, port: Option<String>) -> Self {
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            self.server_host = host.trim().to_string();
        }
        if let Some(port) = port {
            match port.trim().parse() {
                Ok(port) => self.server_port = port,
                Err(err) => log::warn!("Ignoring {PORT_ENV}={port}: {err}"),
            }
        }
        self
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|err| {
            log::warn!("Failed to parse config file {}: {err}", path.display());
            AppConfig::default()
        }),
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

fn parse_config(content: &str) -> Result<AppConfig, serde_json::Error> {
    serde_json::from_str(content)
}
