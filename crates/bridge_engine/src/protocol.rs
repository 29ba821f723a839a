//! Wire shapes exchanged over the extension runtime channel and the page's
//! window-message channel.
//!
//! Every message kind is a variant of a tagged enum keyed on the `type`
//! field, so an unknown `type` fails to parse instead of falling through.

use bridge_core::TabId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message the extension background pushes to the content bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExtensionMessage {
    #[serde(rename = "RESUMEAI_LINKEDIN_RESULT")]
    LinkedInResult {
        #[serde(default)]
        payload: Value,
    },
}

/// A `window` message event as seen by the content bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEvent {
    pub origin: String,
    pub data: Value,
}

/// Request posted by the web app. The `source` tag is checked before parsing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum PageRequest {
    #[serde(rename = "linkedin-extension-ping")]
    Ping {
        #[serde(rename = "requestId", default)]
        request_id: Option<String>,
    },
    #[serde(rename = "linkedin-extension-start")]
    Start {
        #[serde(rename = "requestId", default)]
        request_id: Option<String>,
        #[serde(default)]
        payload: Option<StartPayload>,
    },
    #[serde(rename = "linkedin-extension-get-config")]
    GetConfig {
        #[serde(rename = "requestId", default)]
        request_id: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPayload {
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Message posted to the web app. Wrapped in a [`PageEnvelope`] that stamps
/// the extension's `source` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PageMessage {
    #[serde(rename = "linkedin-extension-ready")]
    Ready { version: String },
    #[serde(rename = "linkedin-extension-pong")]
    Pong {
        #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        version: String,
    },
    #[serde(rename = "linkedin-extension-started")]
    Started {
        #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
    },
    #[serde(rename = "linkedin-extension-start-failed")]
    StartFailed {
        #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        error: String,
    },
    #[serde(rename = "linkedin-extension-config")]
    Config {
        #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        config: Value,
    },
    #[serde(rename = "linkedin-import-result")]
    ImportResult {
        payload: Value,
        #[serde(rename = "capturedAt")]
        captured_at: String,
    },
}

impl PageMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            PageMessage::Ready { .. } => "linkedin-extension-ready",
            PageMessage::Pong { .. } => "linkedin-extension-pong",
            PageMessage::Started { .. } => "linkedin-extension-started",
            PageMessage::StartFailed { .. } => "linkedin-extension-start-failed",
            PageMessage::Config { .. } => "linkedin-extension-config",
            PageMessage::ImportResult { .. } => "linkedin-import-result",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEnvelope {
    pub source: String,
    #[serde(flatten)]
    pub message: PageMessage,
}

impl PageEnvelope {
    pub fn new(source: impl Into<String>, message: PageMessage) -> Self {
        Self {
            source: source.into(),
            message,
        }
    }
}

/// Command sent to the extension runtime. Each is answered at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RuntimeCommand {
    #[serde(rename = "LINKEDIN_START_FROM_APP")]
    StartFromApp { payload: ScrapeRequest },
    #[serde(rename = "GET_CONFIG")]
    GetConfig,
    #[serde(rename = "POPUP_SCRAPE_CURRENT")]
    PopupScrapeCurrent {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },
}

impl RuntimeCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeCommand::StartFromApp { .. } => "LINKEDIN_START_FROM_APP",
            RuntimeCommand::GetConfig => "GET_CONFIG",
            RuntimeCommand::PopupScrapeCurrent { .. } => "POPUP_SCRAPE_CURRENT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub profile_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_model: Option<String>,
}

/// `{ok, error?}` acknowledgement used in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuntimeAck {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RuntimeAck {
    pub fn acknowledged() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
        }
    }

    /// Interprets a responder's reply. No reply, or one that is not an
    /// acknowledgement object, counts as not ok.
    pub fn from_reply(reply: Option<&Value>) -> Self {
        reply
            .and_then(|value| RuntimeAck::deserialize(value).ok())
            .unwrap_or_default()
    }
}

/// What the content bridge hands back to the runtime for a pushed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionAck {
    pub reply: RuntimeAck,
    /// Mirrors the runtime listener contract of returning `true` to keep the
    /// response channel open. The reply is always ready when this is returned.
    pub keep_channel_open: bool,
}
