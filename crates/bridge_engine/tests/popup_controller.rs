use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use bridge_core::{
    BrowserTab, Msg, PopupAction, PopupMode, PopupState, PopupViewModel, StatusKind,
    LINKEDIN_HOME_URL,
};
use bridge_engine::{
    ChannelError, PopupController, PopupSurface, RuntimeChannel, RuntimeCommand, ScrapeRequest,
    TabsApi,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(bridge_logging::initialize_for_tests);
}

struct FakeRuntime {
    reply: Result<Option<Value>, ChannelError>,
    sent: Mutex<Vec<RuntimeCommand>>,
}

impl FakeRuntime {
    fn replying(reply: Result<Option<Value>, ChannelError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<RuntimeCommand> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RuntimeChannel for FakeRuntime {
    async fn send(&self, command: RuntimeCommand) -> Result<Option<Value>, ChannelError> {
        self.sent.lock().unwrap().push(command);
        self.reply.clone()
    }
}

struct FakeTabs {
    active: Result<Option<BrowserTab>, ChannelError>,
    created: Mutex<Vec<String>>,
}

impl FakeTabs {
    fn on(url: &str) -> Arc<Self> {
        Self::with(Ok(Some(BrowserTab {
            id: 314,
            url: url.to_string(),
        })))
    }

    fn with(active: Result<Option<BrowserTab>, ChannelError>) -> Arc<Self> {
        Arc::new(Self {
            active,
            created: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl TabsApi for FakeTabs {
    async fn query_active_tab(&self) -> Result<Option<BrowserTab>, ChannelError> {
        self.active.clone()
    }

    async fn create_tab(&self, url: &str) -> Result<(), ChannelError> {
        self.created.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct FakeSurface {
    renders: Mutex<Vec<PopupViewModel>>,
    focused: AtomicUsize,
    closed: AtomicBool,
}

impl FakeSurface {
    fn renders(&self) -> Vec<PopupViewModel> {
        self.renders.lock().unwrap().clone()
    }
}

impl PopupSurface for FakeSurface {
    fn render(&self, view: &PopupViewModel) {
        self.renders.lock().unwrap().push(view.clone());
    }

    fn focus_url_input(&self) {
        self.focused.fetch_add(1, Ordering::SeqCst);
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

fn controller(
    state: PopupState,
    runtime: Arc<FakeRuntime>,
    tabs: Arc<FakeTabs>,
    surface: Arc<FakeSurface>,
) -> PopupController {
    PopupController::new(state, runtime, tabs, surface)
}

fn ok_runtime() -> Arc<FakeRuntime> {
    FakeRuntime::replying(Ok(Some(json!({ "ok": true }))))
}

#[tokio::test]
async fn opening_on_profile_tab_renders_profile_label() {
    init_logging();
    let surface = Arc::new(FakeSurface::default());
    let mut popup = controller(
        PopupState::new(),
        ok_runtime(),
        FakeTabs::on("https://www.linkedin.com/in/jdoe/"),
        surface.clone(),
    );

    popup.dispatch(Msg::PopupOpened).await;

    let view = popup.view();
    assert_eq!(view.mode, PopupMode::ScrapeCurrent);
    assert_eq!(view.current_tab_label.as_deref(), Some("linkedin.com/in/jdoe"));
    assert_eq!(popup.state().current_tab().map(|tab| tab.id), Some(314));
    assert_eq!(surface.renders().len(), 1);
}

#[tokio::test]
async fn opening_elsewhere_offers_open_linkedin() {
    init_logging();
    let mut popup = controller(
        PopupState::new(),
        ok_runtime(),
        FakeTabs::on("https://news.example.com/"),
        Arc::new(FakeSurface::default()),
    );

    popup.dispatch(Msg::PopupOpened).await;

    assert_eq!(popup.view().mode, PopupMode::OpenLinkedIn);
    assert!(popup.state().current_tab().is_none());
}

#[tokio::test]
async fn tab_query_failure_keeps_prior_state() {
    init_logging();
    let surface = Arc::new(FakeSurface::default());
    let mut popup = controller(
        PopupState::new(),
        ok_runtime(),
        FakeTabs::with(Err(ChannelError::Disconnected("no window".to_string()))),
        surface.clone(),
    );

    popup.dispatch(Msg::PopupOpened).await;

    assert_eq!(popup.view().mode, PopupMode::Detecting);
    assert!(surface.renders().is_empty());
}

#[tokio::test]
async fn scrape_current_sends_tab_command_and_releases_button() {
    init_logging();
    let runtime = ok_runtime();
    let surface = Arc::new(FakeSurface::default());
    let mut popup = controller(
        PopupState::with_token("bearer"),
        runtime.clone(),
        FakeTabs::on("https://www.linkedin.com/in/jdoe/"),
        surface.clone(),
    );
    popup.dispatch(Msg::PopupOpened).await;

    popup.dispatch(Msg::ScrapeCurrentClicked).await;

    assert_eq!(
        runtime.sent(),
        vec![RuntimeCommand::PopupScrapeCurrent {
            tab_id: 314,
            token: Some("bearer".to_string()),
        }]
    );
    let busy_flags: Vec<bool> = surface
        .renders()
        .iter()
        .map(|view| view.is_busy(PopupAction::ScrapeCurrent))
        .collect();
    assert_eq!(busy_flags, vec![false, true, false]);
    assert_eq!(
        popup.view().status.map(|banner| banner.kind),
        Some(StatusKind::Success)
    );
}

#[tokio::test]
async fn channel_failure_still_releases_button() {
    init_logging();
    let runtime = FakeRuntime::replying(Err(ChannelError::Disconnected(
        "disconnected".to_string(),
    )));
    let mut popup = controller(
        PopupState::new(),
        runtime,
        FakeTabs::on("https://www.linkedin.com/in/jdoe/"),
        Arc::new(FakeSurface::default()),
    );
    popup.dispatch(Msg::PopupOpened).await;

    popup.dispatch(Msg::ScrapeCurrentClicked).await;

    let view = popup.view();
    assert_eq!(view.busy, None);
    let banner = view.status.expect("error banner");
    assert_eq!(banner.kind, StatusKind::Error);
    assert_eq!(banner.text, "Import failed: disconnected");
}

#[tokio::test]
async fn rejected_reply_shows_responder_error() {
    init_logging();
    let runtime = FakeRuntime::replying(Ok(Some(json!({ "ok": false, "error": "Not signed in" }))));
    let mut popup = controller(
        PopupState::new(),
        runtime,
        FakeTabs::on("https://www.linkedin.com/in/jdoe/"),
        Arc::new(FakeSurface::default()),
    );
    popup.dispatch(Msg::PopupOpened).await;

    popup.dispatch(Msg::ScrapeCurrentClicked).await;

    let view = popup.view();
    assert_eq!(view.busy, None);
    assert_eq!(
        view.status.map(|banner| banner.text).as_deref(),
        Some("Import failed: Not signed in")
    );
}

#[tokio::test]
async fn invalid_url_never_reaches_runtime() {
    init_logging();
    let runtime = ok_runtime();
    let surface = Arc::new(FakeSurface::default());
    let mut popup = controller(
        PopupState::new(),
        runtime.clone(),
        FakeTabs::on("https://news.example.com/"),
        surface.clone(),
    );

    popup
        .dispatch(Msg::UrlInputChanged("not-a-url".to_string()))
        .await;
    popup.dispatch(Msg::ScrapeUrlClicked).await;

    assert!(runtime.sent().is_empty());
    assert_eq!(surface.focused.load(Ordering::SeqCst), 1);
    assert_eq!(
        popup.view().status.map(|banner| banner.kind),
        Some(StatusKind::Error)
    );
}

#[tokio::test]
async fn scrape_url_sends_start_command() {
    init_logging();
    let runtime = ok_runtime();
    let mut popup = controller(
        PopupState::with_token("bearer"),
        runtime.clone(),
        FakeTabs::on("https://news.example.com/"),
        Arc::new(FakeSurface::default()),
    );

    popup
        .dispatch(Msg::UrlInputChanged(
            "https://www.linkedin.com/in/jdoe".to_string(),
        ))
        .await;
    popup.dispatch(Msg::ScrapeUrlClicked).await;

    assert_eq!(
        runtime.sent(),
        vec![RuntimeCommand::StartFromApp {
            payload: ScrapeRequest {
                profile_url: "https://www.linkedin.com/in/jdoe".to_string(),
                token: Some("bearer".to_string()),
                preferred_model: None,
            },
        }]
    );
    assert_eq!(popup.view().busy, None);
}

#[tokio::test(start_paused = true)]
async fn open_linkedin_closes_popup_after_delay() {
    init_logging();
    let tabs = FakeTabs::on("https://news.example.com/");
    let surface = Arc::new(FakeSurface::default());
    let mut popup = controller(
        PopupState::new(),
        ok_runtime(),
        tabs.clone(),
        surface.clone(),
    );

    popup.dispatch(Msg::OpenLinkedInClicked).await;

    assert_eq!(
        tabs.created.lock().unwrap().clone(),
        vec![LINKEDIN_HOME_URL.to_string()]
    );
    assert_eq!(
        popup.view().status.map(|banner| banner.kind),
        Some(StatusKind::Info)
    );

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(!surface.closed.load(Ordering::SeqCst));

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(surface.closed.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn result_banner_expires() {
    init_logging();
    let mut popup = controller(
        PopupState::new(),
        ok_runtime(),
        FakeTabs::on("https://www.linkedin.com/in/jdoe/"),
        Arc::new(FakeSurface::default()),
    );
    popup.dispatch(Msg::PopupOpened).await;
    popup.dispatch(Msg::ScrapeCurrentClicked).await;
    assert!(popup.view().status.is_some());

    popup.process_deferred().await;

    assert_eq!(popup.view().status, None);
}
