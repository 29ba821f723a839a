use crate::{PopupAction, PopupMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub kind: StatusKind,
    pub text: String,
    /// Increases with every banner shown; used to expire only the banner a
    /// timer was scheduled for.
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PopupViewModel {
    pub mode: PopupMode,
    /// `linkedin.com/in/<username>` when the active tab is a profile.
    pub current_tab_label: Option<String>,
    pub url_input: String,
    pub busy: Option<PopupAction>,
    pub status: Option<StatusBanner>,
    pub dirty: bool,
}

impl PopupViewModel {
    /// Whether the button for `action` should be disabled with a spinner.
    pub fn is_busy(&self, action: PopupAction) -> bool {
        self.busy == Some(action)
    }
}
