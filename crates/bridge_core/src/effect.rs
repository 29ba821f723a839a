use std::time::Duration;

use crate::TabId;

/// Page opened by the "open LinkedIn" path.
pub const LINKEDIN_HOME_URL: &str = "https://www.linkedin.com/";
/// Pause before the popup closes itself after opening LinkedIn.
pub const CLOSE_DELAY: Duration = Duration::from_millis(1500);
/// How long a result banner stays visible.
pub const STATUS_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    QueryActiveTab,
    ScrapeTab {
        tab_id: TabId,
        token: Option<String>,
    },
    StartScrape {
        profile_url: String,
        token: Option<String>,
    },
    OpenTab {
        url: String,
    },
    ClosePopupAfter {
        delay: Duration,
    },
    FocusUrlInput,
    ClearStatusAfter {
        seq: u64,
        delay: Duration,
    },
}
