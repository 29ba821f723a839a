use std::io;
use std::sync::Arc;
use std::thread;

use bridge_logging::{bridge_error, bridge_warn};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::{ContentBridge, ExtensionAck, PageEvent};

enum HostCommand {
    Page(PageEvent),
}

/// Runs a [`ContentBridge`] on a dedicated thread with its own Tokio runtime.
///
/// Each page event becomes an independent task, so replies to different
/// requests never wait on each other. [`BridgeHost::shutdown`] drains tasks
/// that are still in flight.
pub struct BridgeHost {
    bridge: Arc<ContentBridge>,
    cmd_tx: mpsc::UnboundedSender<HostCommand>,
    worker: thread::JoinHandle<()>,
}

impl BridgeHost {
    pub fn spawn(bridge: Arc<ContentBridge>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let worker_bridge = bridge.clone();
        let worker = thread::Builder::new()
            .name("bridge-host".to_string())
            .spawn(move || runtime.block_on(run_worker(worker_bridge, cmd_rx)))?;

        Ok(Self {
            bridge,
            cmd_tx,
            worker,
        })
    }

    pub fn bridge(&self) -> &ContentBridge {
        &self.bridge
    }

    pub fn page_event(&self, event: PageEvent) {
        if self.cmd_tx.send(HostCommand::Page(event)).is_err() {
            bridge_warn!("Bridge worker stopped; page event dropped");
        }
    }

    /// Runtime pushes are answered synchronously on the caller's thread.
    pub fn extension_message(&self, message: &Value) -> Option<ExtensionAck> {
        self.bridge.handle_extension_message(message)
    }

    /// Stops accepting events and waits for in-flight requests to finish.
    pub fn shutdown(self) {
        let Self { cmd_tx, worker, .. } = self;
        drop(cmd_tx);
        if worker.join().is_err() {
            bridge_error!("Bridge worker panicked during shutdown");
        }
    }
}

async fn run_worker(bridge: Arc<ContentBridge>, mut cmd_rx: mpsc::UnboundedReceiver<HostCommand>) {
    let mut in_flight = JoinSet::new();
    while let Some(command) = cmd_rx.recv().await {
        match command {
            HostCommand::Page(event) => {
                let bridge = bridge.clone();
                in_flight.spawn(async move {
                    bridge.handle_page_event(&event).await;
                });
            }
        }
        while in_flight.try_join_next().is_some() {}
    }
    while in_flight.join_next().await.is_some() {}
}
