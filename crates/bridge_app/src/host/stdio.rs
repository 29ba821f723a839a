use std::io::{BufRead, Write};
use std::sync::Mutex;

use anyhow::Context;
use bridge_engine::{BridgeHost, ExtensionAck, PageEnvelope, PageEvent, PageSink, PostError};
use bridge_logging::{bridge_debug, bridge_warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line read from stdin.
#[derive(Debug, Deserialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub(crate) enum HostInput {
    /// A `window` message event observed on the page.
    Page { origin: String, data: Value },
    /// A message pushed by the extension runtime.
    Runtime { message: Value },
}

/// One line written to stdout.
#[derive(Debug, Serialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
enum HostOutput<'a> {
    Page {
        target_origin: &'a str,
        data: &'a PageEnvelope,
    },
    Ack {
        reply: &'a bridge_engine::RuntimeAck,
        keep_channel_open: bool,
    },
}

/// Serializes host output as JSON lines onto a shared writer.
pub(crate) struct JsonLineWriter<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLineWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn write_ack(&self, ack: &ExtensionAck) -> Result<(), PostError> {
        self.write_line(&HostOutput::Ack {
            reply: &ack.reply,
            keep_channel_open: ack.keep_channel_open,
        })
    }

    fn write_line(&self, output: &HostOutput<'_>) -> Result<(), PostError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| PostError("output writer poisoned".to_string()))?;
        serde_json::to_writer(&mut *out, output).map_err(|err| PostError(err.to_string()))?;
        out.write_all(b"\n")
            .and_then(|()| out.flush())
            .map_err(|err| PostError(err.to_string()))
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> PageSink for JsonLineWriter<W> {
    fn post(&self, envelope: &PageEnvelope, target_origin: &str) -> Result<(), PostError> {
        self.write_line(&HostOutput::Page {
            target_origin,
            data: envelope,
        })
    }
}

/// Feeds stdin lines to the bridge until end of input.
pub(crate) fn pump<R: BufRead, W: Write + Send>(
    input: R,
    host: &BridgeHost,
    output: &JsonLineWriter<W>,
) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = line.context("reading host input")?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<HostInput>(&line) {
            Ok(HostInput::Page { origin, data }) => host.page_event(PageEvent { origin, data }),
            Ok(HostInput::Runtime { message }) => match host.extension_message(&message) {
                Some(ack) => {
                    if let Err(err) = output.write_ack(&ack) {
                        bridge_warn!("Failed to write runtime acknowledgement: {}", err);
                    }
                }
                None => bridge_debug!("Runtime message not handled by the bridge"),
            },
            Err(err) => bridge_warn!("Ignoring malformed input line: {}", err),
        }
    }
    Ok(())
}
