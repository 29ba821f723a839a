use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use bridge_logging::bridge_debug;

use crate::channel::RuntimeChannel;
use crate::{ChannelError, RuntimeCommand, RuntimeSettings};

/// Runtime channel that delivers each command as a JSON `POST` to the
/// extension runtime's relay endpoint and reads back its single reply.
#[derive(Debug, Clone)]
pub struct HttpRuntime {
    settings: RuntimeSettings,
    endpoint: reqwest::Url,
    client: reqwest::Client,
}

impl HttpRuntime {
    pub fn new(settings: RuntimeSettings) -> Result<Self, ChannelError> {
        let endpoint = reqwest::Url::parse(&settings.endpoint)
            .map_err(|err| ChannelError::InvalidEndpoint(format!("{}: {err}", settings.endpoint)))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ChannelError::Disconnected(err.to_string()))?;
        Ok(Self {
            settings,
            endpoint,
            client,
        })
    }

    fn too_large(&self, actual: u64) -> ChannelError {
        ChannelError::MalformedReply(format!(
            "reply too large (max {}, actual {actual})",
            self.settings.max_reply_bytes
        ))
    }
}

#[async_trait::async_trait]
impl RuntimeChannel for HttpRuntime {
    async fn send(&self, command: RuntimeCommand) -> Result<Option<Value>, ChannelError> {
        let body =
            serde_json::to_vec(&command).map_err(|err| ChannelError::Encode(err.to_string()))?;
        bridge_debug!("POST {} to {}", command.kind(), self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChannelError::Status(status.as_u16()));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_reply_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_reply_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        // An empty body is a responder that answered without a value.
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| ChannelError::MalformedReply(err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ChannelError {
    if err.is_timeout() {
        return ChannelError::Timeout;
    }
    ChannelError::Disconnected(err.to_string())
}
