use crate::view_model::{PopupViewModel, StatusBanner, StatusKind};

/// Browser tab identifier as handed out by the tabs API.
pub type TabId = i64;

/// Minimal view of a browser tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserTab {
    pub id: TabId,
    pub url: String,
}

/// Active tab that was recognized as a LinkedIn profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedInTab {
    pub id: TabId,
    pub url: String,
    pub username: String,
}

impl LinkedInTab {
    pub fn display_text(&self) -> String {
        format!("linkedin.com/in/{}", self.username)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupMode {
    /// Tab detection has not produced a result yet.
    #[default]
    Detecting,
    ScrapeCurrent,
    OpenLinkedIn,
}

/// A button that fires a single outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupAction {
    ScrapeCurrent,
    OpenLinkedIn,
    ScrapeUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PopupState {
    mode: PopupMode,
    current_tab: Option<LinkedInTab>,
    url_input: String,
    token: Option<String>,
    busy: Option<PopupAction>,
    status: Option<StatusBanner>,
    status_seq: u64,
    dirty: bool,
}

impl PopupState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for a popup whose user is signed in with `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn view(&self) -> PopupViewModel {
        PopupViewModel {
            mode: self.mode,
            current_tab_label: self.current_tab.as_ref().map(LinkedInTab::display_text),
            url_input: self.url_input.clone(),
            busy: self.busy,
            status: self.status.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn mode(&self) -> PopupMode {
        self.mode
    }

    pub fn current_tab(&self) -> Option<&LinkedInTab> {
        self.current_tab.as_ref()
    }

    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn busy(&self) -> Option<PopupAction> {
        self.busy
    }

    pub(crate) fn enter_scrape_current(&mut self, tab: LinkedInTab) {
        self.mode = PopupMode::ScrapeCurrent;
        self.current_tab = Some(tab);
        self.dirty = true;
    }

    pub(crate) fn enter_open_linkedin(&mut self) {
        self.mode = PopupMode::OpenLinkedIn;
        self.current_tab = None;
        self.dirty = true;
    }

    pub(crate) fn set_url_input(&mut self, text: String) {
        if self.url_input != text {
            self.url_input = text;
            self.dirty = true;
        }
    }

    pub(crate) fn begin(&mut self, action: PopupAction, loading_text: &str) {
        self.busy = Some(action);
        self.show_status(StatusKind::Loading, loading_text);
    }

    /// Releases the busy flag held by `action`; a stale completion leaves
    /// another action's flag alone.
    pub(crate) fn release(&mut self, action: PopupAction) {
        if self.busy == Some(action) {
            self.busy = None;
            self.dirty = true;
        }
    }

    /// Replaces the banner and returns the sequence number stamped on it.
    pub(crate) fn show_status(&mut self, kind: StatusKind, text: impl Into<String>) -> u64 {
        self.status_seq += 1;
        self.status = Some(StatusBanner {
            kind,
            text: text.into(),
            seq: self.status_seq,
        });
        self.dirty = true;
        self.status_seq
    }

    pub(crate) fn expire_status(&mut self, seq: u64) {
        if self.status.as_ref().is_some_and(|banner| banner.seq == seq) {
            self.status = None;
            self.dirty = true;
        }
    }
}
