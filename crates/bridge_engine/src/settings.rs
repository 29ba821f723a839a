use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// `source` tag the web app stamps on its requests.
    pub app_source: String,
    /// `source` tag stamped on everything posted to the page.
    pub extension_source: String,
    /// Reported in ready/pong messages; `"unknown"` when absent.
    pub extension_version: Option<String>,
    /// Preference key holding the default AI model for start requests.
    pub preferred_model_key: String,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            app_source: "resumeai-app".to_string(),
            extension_source: "resumeai-extension".to_string(),
            extension_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            preferred_model_key: "resumeai-default-model".to_string(),
        }
    }
}

impl BridgeSettings {
    pub fn version_or_unknown(&self) -> &str {
        self.extension_version
            .as_deref()
            .filter(|version| !version.trim().is_empty())
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_reply_bytes: u64,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8787/runtime".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_reply_bytes: 1024 * 1024,
        }
    }
}
