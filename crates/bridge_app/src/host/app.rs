use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bridge_engine::{document_origin, BridgeHost, ContentBridge, HttpRuntime, PageSink};
use bridge_logging::{bridge_info, bridge_warn};

use super::logging;
use super::preferences::load_preferences;
use super::settings::{self, HostSettings, DEFAULT_SETTINGS_PATH};
use super::stdio::{pump, JsonLineWriter};

pub fn run_app() -> anyhow::Result<()> {
    let settings_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));

    // Logging depends on the settings, so a load failure is reported once the
    // logger exists.
    let (settings, load_error) = match settings::load(&settings_path) {
        Ok(settings) => (settings, None),
        Err(err) => (HostSettings::default(), Some(err)),
    };
    logging::initialize(settings.log_destination);
    if let Some(err) = load_error {
        bridge_warn!("Using default settings: {:#}", err);
    }

    let origin = document_origin(&settings.page_url)
        .with_context(|| format!("deriving origin of page_url {:?}", settings.page_url))?;
    let runtime = HttpRuntime::new(settings.runtime_settings())
        .context("configuring the extension runtime channel")?;
    let preferences = load_preferences(&settings.preferences_path);

    let output = Arc::new(JsonLineWriter::new(io::stdout()));
    let sink: Arc<dyn PageSink> = output.clone();
    let bridge = ContentBridge::new(
        settings.bridge_settings(),
        origin,
        Arc::new(runtime),
        sink,
        Arc::new(preferences),
    );
    bridge_info!(
        "Bridge attached to {} (runtime {})",
        bridge.document_origin(),
        settings.runtime_endpoint
    );
    bridge.announce();

    let host = BridgeHost::spawn(Arc::new(bridge)).context("starting the bridge worker")?;
    let result = pump(io::stdin().lock(), &host, &output);
    host.shutdown();
    bridge_info!("Input closed; bridge stopped");
    result
}
