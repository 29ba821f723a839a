use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use bridge_engine::{BridgeSettings, RuntimeSettings};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub(crate) const DEFAULT_SETTINGS_PATH: &str = "./bridge.ron";

/// Host configuration, read from a RON file. Every field is optional in the
/// file; missing fields take the engine defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct HostSettings {
    /// URL of the page the bridge is attached to; its origin gates all traffic.
    pub page_url: String,
    pub runtime_endpoint: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_reply_bytes: u64,
    pub app_source: String,
    pub extension_source: String,
    pub extension_version: Option<String>,
    pub preferences_path: PathBuf,
    pub log_destination: LogDestination,
}

impl Default for HostSettings {
    fn default() -> Self {
        let bridge = BridgeSettings::default();
        let runtime = RuntimeSettings::default();
        Self {
            page_url: "http://localhost:3000/".to_string(),
            runtime_endpoint: runtime.endpoint,
            connect_timeout_ms: duration_ms(runtime.connect_timeout),
            request_timeout_ms: duration_ms(runtime.request_timeout),
            max_reply_bytes: runtime.max_reply_bytes,
            app_source: bridge.app_source,
            extension_source: bridge.extension_source,
            extension_version: bridge.extension_version,
            preferences_path: PathBuf::from("./preferences.ron"),
            log_destination: LogDestination::default(),
        }
    }
}

impl HostSettings {
    pub fn bridge_settings(&self) -> BridgeSettings {
        BridgeSettings {
            app_source: self.app_source.clone(),
            extension_source: self.extension_source.clone(),
            extension_version: self.extension_version.clone(),
            ..BridgeSettings::default()
        }
    }

    pub fn runtime_settings(&self) -> RuntimeSettings {
        RuntimeSettings {
            endpoint: self.runtime_endpoint.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_reply_bytes: self.max_reply_bytes,
        }
    }
}

/// Loads settings from `path`. A missing file yields the defaults.
pub(crate) fn load(path: &Path) -> anyhow::Result<HostSettings> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(HostSettings::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading settings from {:?}", path));
        }
    };

    ron::from_str(&content).with_context(|| format!("parsing settings from {:?}", path))
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
