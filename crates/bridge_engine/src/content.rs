use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bridge_logging::{bridge_debug, bridge_info, bridge_trace, bridge_warn};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::channel::{default_clock, Clock, PageSink, PreferenceStore, RuntimeChannel};
use crate::{
    BridgeSettings, ChannelError, ExtensionAck, ExtensionMessage, PageEnvelope, PageEvent,
    PageMessage, PageRequest, RuntimeAck, RuntimeCommand, ScrapeRequest, StartPayload,
};

const CHANNEL_FAILURE_MESSAGE: &str = "Extension runtime unavailable";
const START_FAILURE_MESSAGE: &str = "Failed to start LinkedIn import";

/// Relays between the extension runtime channel and the hosting page's
/// window-message channel.
///
/// Inbound page events are accepted only from `document_origin` and only when
/// their `source` tag matches the app's; every post goes to `document_origin`.
/// Nothing is queued or retained between requests.
pub struct ContentBridge {
    settings: BridgeSettings,
    document_origin: String,
    runtime: Arc<dyn RuntimeChannel>,
    page: Arc<dyn PageSink>,
    preferences: Arc<dyn PreferenceStore>,
    clock: Clock,
    announced: AtomicBool,
}

impl ContentBridge {
    pub fn new(
        settings: BridgeSettings,
        document_origin: impl Into<String>,
        runtime: Arc<dyn RuntimeChannel>,
        page: Arc<dyn PageSink>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            settings,
            document_origin: document_origin.into(),
            runtime,
            page,
            preferences,
            clock: default_clock(),
            announced: AtomicBool::new(false),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn document_origin(&self) -> &str {
        &self.document_origin
    }

    /// Posts `linkedin-extension-ready` the first time it is called.
    /// Returns whether this call made the announcement.
    pub fn announce(&self) -> bool {
        if self.announced.swap(true, Ordering::SeqCst) {
            return false;
        }
        bridge_info!(
            "Announcing extension {} to {}",
            self.settings.version_or_unknown(),
            self.document_origin
        );
        self.reply(PageMessage::Ready {
            version: self.settings.version_or_unknown().to_string(),
        });
        true
    }

    /// Handles a message pushed by the extension runtime. Returns `None` for
    /// message types this bridge does not listen for.
    pub fn handle_extension_message(&self, raw: &Value) -> Option<ExtensionAck> {
        let message = match ExtensionMessage::deserialize(raw) {
            Ok(message) => message,
            Err(err) => {
                bridge_trace!("Ignoring runtime message: {}", err);
                return None;
            }
        };

        match message {
            ExtensionMessage::LinkedInResult { payload } => {
                let envelope = self.envelope(PageMessage::ImportResult {
                    payload,
                    captured_at: (self.clock)(),
                });
                let reply = match self.page.post(&envelope, &self.document_origin) {
                    Ok(()) => {
                        bridge_info!("Forwarded LinkedIn import result to the page");
                        RuntimeAck::acknowledged()
                    }
                    Err(err) => {
                        bridge_warn!("Failed to forward LinkedIn import result: {}", err);
                        RuntimeAck::failed(err.to_string())
                    }
                };
                Some(ExtensionAck {
                    reply,
                    keep_channel_open: true,
                })
            }
        }
    }

    /// Handles one `window` message event, posting at most one reply.
    pub async fn handle_page_event(&self, event: &PageEvent) {
        let Some(request) = self.accept(event) else {
            return;
        };

        match request {
            PageRequest::Ping { request_id } => {
                self.reply(PageMessage::Pong {
                    request_id,
                    version: self.settings.version_or_unknown().to_string(),
                });
            }
            PageRequest::Start {
                request_id,
                payload,
            } => self.start_import(request_id, payload).await,
            PageRequest::GetConfig { request_id } => self.relay_config(request_id).await,
        }
    }

    fn accept(&self, event: &PageEvent) -> Option<PageRequest> {
        if event.origin != self.document_origin {
            bridge_trace!("Dropping page message from foreign origin {}", event.origin);
            return None;
        }
        let data = event.data.as_object()?;
        if data.get("source").and_then(Value::as_str) != Some(self.settings.app_source.as_str()) {
            return None;
        }
        match PageRequest::deserialize(&event.data) {
            Ok(request) => Some(request),
            Err(err) => {
                bridge_debug!("Ignoring unrecognized page message: {}", err);
                None
            }
        }
    }

    async fn start_import(&self, request_id: Option<String>, payload: Option<StartPayload>) {
        let Some(payload) = payload else {
            bridge_debug!("Start request without payload ignored");
            return;
        };
        let request_id = request_id.or(payload.request_id);
        let Some(profile_url) = payload.profile_url.filter(|url| !url.trim().is_empty()) else {
            bridge_debug!("Start request without profileUrl ignored");
            return;
        };

        let request = ScrapeRequest {
            profile_url,
            token: payload.token,
            preferred_model: self.preferred_model(),
        };
        bridge_info!("Starting LinkedIn import for {}", request.profile_url);

        let message = match self
            .runtime
            .send(RuntimeCommand::StartFromApp { payload: request })
            .await
        {
            Err(err) => {
                bridge_warn!("Start request could not reach the extension: {}", err);
                PageMessage::StartFailed {
                    request_id,
                    error: channel_error_text(&err),
                }
            }
            Ok(reply) => {
                let ack = RuntimeAck::from_reply(reply.as_ref());
                if ack.ok {
                    PageMessage::Started { request_id }
                } else {
                    PageMessage::StartFailed {
                        request_id,
                        error: ack
                            .error
                            .filter(|error| !error.trim().is_empty())
                            .unwrap_or_else(|| START_FAILURE_MESSAGE.to_string()),
                    }
                }
            }
        };
        self.reply(message);
    }

    async fn relay_config(&self, request_id: Option<String>) {
        let config = match self.runtime.send(RuntimeCommand::GetConfig).await {
            Ok(Some(config)) if !config.is_null() => config,
            Ok(_) => Value::Object(Map::new()),
            Err(err) => {
                bridge_warn!("Config request failed: {}", err);
                Value::Object(Map::new())
            }
        };
        self.reply(PageMessage::Config { request_id, config });
    }

    fn preferred_model(&self) -> Option<String> {
        self.preferences
            .get(&self.settings.preferred_model_key)
            .filter(|model| !model.trim().is_empty())
    }

    fn envelope(&self, message: PageMessage) -> PageEnvelope {
        PageEnvelope::new(self.settings.extension_source.clone(), message)
    }

    fn reply(&self, message: PageMessage) {
        let kind = message.kind();
        let envelope = self.envelope(message);
        if let Err(err) = self.page.post(&envelope, &self.document_origin) {
            bridge_warn!("Failed to post {} to the page: {}", kind, err);
        }
    }
}

fn channel_error_text(err: &ChannelError) -> String {
    let text = err.to_string();
    if text.trim().is_empty() {
        CHANNEL_FAILURE_MESSAGE.to_string()
    } else {
        text
    }
}
