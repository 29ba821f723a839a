use crate::effect::{CLOSE_DELAY, LINKEDIN_HOME_URL, STATUS_DURATION};
use crate::linkedin::{looks_like_profile_url, profile_username};
use crate::{
    BrowserTab, CommandOutcome, Effect, LinkedInTab, Msg, PopupAction, PopupState, StatusKind,
};

const EMPTY_URL_MESSAGE: &str = "Please enter a LinkedIn profile URL";
const INVALID_URL_MESSAGE: &str =
    "Please enter a valid LinkedIn profile URL (e.g. linkedin.com/in/username)";
const OPEN_LINKEDIN_PROMPT: &str =
    "Navigate to a LinkedIn profile, then click the extension icon again";
const IMPORT_STARTED_MESSAGE: &str = "Import started! Check ResumeAI for progress";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PopupState, msg: Msg) -> (PopupState, Vec<Effect>) {
    let effects = match msg {
        Msg::PopupOpened => vec![Effect::QueryActiveTab],
        Msg::ActiveTabDetected(tab) => {
            apply_detected_tab(&mut state, tab);
            Vec::new()
        }
        // Logged by the effect runner; the popup keeps whatever it showed.
        Msg::ActiveTabQueryFailed(_) => Vec::new(),
        Msg::UrlInputChanged(text) => {
            state.set_url_input(text);
            Vec::new()
        }
        Msg::ScrapeCurrentClicked => {
            if state.busy().is_some() {
                return (state, Vec::new());
            }
            let Some(tab_id) = state.current_tab().map(|tab| tab.id) else {
                return (state, Vec::new());
            };
            let token = state.token().map(ToOwned::to_owned);
            state.begin(PopupAction::ScrapeCurrent, "Importing profile from this tab...");
            vec![Effect::ScrapeTab { tab_id, token }]
        }
        Msg::OpenLinkedInClicked => {
            if state.busy().is_some() {
                return (state, Vec::new());
            }
            state.begin(PopupAction::OpenLinkedIn, "Opening LinkedIn...");
            vec![Effect::OpenTab {
                url: LINKEDIN_HOME_URL.to_string(),
            }]
        }
        Msg::ScrapeUrlClicked => {
            if state.busy().is_some() {
                return (state, Vec::new());
            }
            let profile_url = state.url_input().trim().to_string();
            if profile_url.is_empty() {
                state.show_status(StatusKind::Error, EMPTY_URL_MESSAGE);
                return (state, vec![Effect::FocusUrlInput]);
            }
            if !looks_like_profile_url(&profile_url) {
                state.show_status(StatusKind::Error, INVALID_URL_MESSAGE);
                return (state, vec![Effect::FocusUrlInput]);
            }
            let token = state.token().map(ToOwned::to_owned);
            state.begin(PopupAction::ScrapeUrl, "Starting import...");
            vec![Effect::StartScrape { profile_url, token }]
        }
        Msg::CommandFinished { action, outcome } => finish_command(&mut state, action, outcome),
        Msg::StatusExpired { seq } => {
            state.expire_status(seq);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_detected_tab(state: &mut PopupState, tab: Option<BrowserTab>) {
    let profile = tab.and_then(|tab| {
        profile_username(&tab.url).map(|username| LinkedInTab {
            id: tab.id,
            url: tab.url,
            username,
        })
    });
    match profile {
        Some(tab) => state.enter_scrape_current(tab),
        None => state.enter_open_linkedin(),
    }
}

fn finish_command(
    state: &mut PopupState,
    action: PopupAction,
    outcome: CommandOutcome,
) -> Vec<Effect> {
    state.release(action);

    match (action, outcome) {
        (PopupAction::OpenLinkedIn, CommandOutcome::Acknowledged) => {
            // The prompt stays up until the popup closes.
            state.show_status(StatusKind::Info, OPEN_LINKEDIN_PROMPT);
            vec![Effect::ClosePopupAfter { delay: CLOSE_DELAY }]
        }
        (_, CommandOutcome::Acknowledged) => {
            let seq = state.show_status(StatusKind::Success, IMPORT_STARTED_MESSAGE);
            vec![Effect::ClearStatusAfter {
                seq,
                delay: STATUS_DURATION,
            }]
        }
        (_, failure) => {
            let seq = state.show_status(StatusKind::Error, failure_text(action, failure));
            vec![Effect::ClearStatusAfter {
                seq,
                delay: STATUS_DURATION,
            }]
        }
    }
}

fn failure_text(action: PopupAction, outcome: CommandOutcome) -> String {
    let detail = match outcome {
        CommandOutcome::Rejected(Some(error)) | CommandOutcome::ChannelFailed(error)
            if !error.trim().is_empty() =>
        {
            error
        }
        _ => "Unknown error".to_string(),
    };
    match action {
        PopupAction::OpenLinkedIn => format!("Could not open LinkedIn: {detail}"),
        PopupAction::ScrapeCurrent | PopupAction::ScrapeUrl => format!("Import failed: {detail}"),
    }
}
