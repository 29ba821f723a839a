use std::collections::HashMap;
use std::sync::Arc;

use bridge_core::{BrowserTab, PopupViewModel};
use serde_json::Value;
use thiserror::Error;

use crate::{PageEnvelope, RuntimeCommand};

/// Delivery failure on the extension runtime channel. The display text is
/// what gets relayed to the page or popup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("{0}")]
    Disconnected(String),
    #[error("extension runtime timed out")]
    Timeout,
    #[error("extension runtime returned status {0}")]
    Status(u16),
    #[error("invalid runtime endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("could not encode command: {0}")]
    Encode(String),
    #[error("malformed reply from extension runtime: {0}")]
    MalformedReply(String),
}

/// The page context went away while posting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("page context unavailable: {0}")]
pub struct PostError(pub String);

#[async_trait::async_trait]
pub trait RuntimeChannel: Send + Sync {
    /// Sends one command and waits for its single reply. `Ok(None)` means the
    /// responder answered without a value.
    async fn send(&self, command: RuntimeCommand) -> Result<Option<Value>, ChannelError>;
}

pub trait PageSink: Send + Sync {
    fn post(&self, envelope: &PageEnvelope, target_origin: &str) -> Result<(), PostError>;
}

/// Read-only view of the extension's local preferences.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

impl PreferenceStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

#[async_trait::async_trait]
pub trait TabsApi: Send + Sync {
    async fn query_active_tab(&self) -> Result<Option<BrowserTab>, ChannelError>;
    async fn create_tab(&self, url: &str) -> Result<(), ChannelError>;
}

pub trait PopupSurface: Send + Sync {
    fn render(&self, view: &PopupViewModel);
    fn focus_url_input(&self);
    fn close(&self);
}

/// Produces the capture timestamp stamped on forwarded import results.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

pub fn default_clock() -> Clock {
    Arc::new(|| chrono::Utc::now().to_rfc3339())
}
