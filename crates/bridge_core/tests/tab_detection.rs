use std::sync::Once;

use bridge_core::{
    profile_username, update, BrowserTab, Effect, Msg, PopupMode, PopupState,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(bridge_logging::initialize_for_tests);
}

fn detect(state: PopupState, url: &str) -> PopupState {
    let (state, effects) = update(
        state,
        Msg::ActiveTabDetected(Some(BrowserTab {
            id: 42,
            url: url.to_string(),
        })),
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn popup_opened_queries_active_tab() {
    init_logging();
    let (state, effects) = update(PopupState::new(), Msg::PopupOpened);

    assert_eq!(effects, vec![Effect::QueryActiveTab]);
    assert_eq!(state.mode(), PopupMode::Detecting);
}

#[test]
fn profile_tab_enables_scrape_current_mode() {
    init_logging();
    let mut state = detect(PopupState::new(), "https://www.linkedin.com/in/jdoe/");

    let view = state.view();
    assert_eq!(view.mode, PopupMode::ScrapeCurrent);
    assert_eq!(view.current_tab_label.as_deref(), Some("linkedin.com/in/jdoe"));
    let tab = state.current_tab().expect("tab stored");
    assert_eq!(tab.id, 42);
    assert_eq!(tab.username, "jdoe");
    assert!(state.consume_dirty());
}

#[test]
fn non_linkedin_tab_enables_open_linkedin_mode() {
    init_logging();
    let state = detect(PopupState::new(), "https://example.com/in/jdoe");

    assert_eq!(state.mode(), PopupMode::OpenLinkedIn);
    assert!(state.current_tab().is_none());
    assert_eq!(state.view().current_tab_label, None);
}

#[test]
fn redetection_clears_previous_profile_tab() {
    init_logging();
    let state = detect(PopupState::new(), "https://www.linkedin.com/in/jdoe/");
    let state = detect(state, "https://www.linkedin.com/feed/");

    assert_eq!(state.mode(), PopupMode::OpenLinkedIn);
    assert!(state.current_tab().is_none());
}

#[test]
fn missing_active_tab_enables_open_linkedin_mode() {
    init_logging();
    let (state, _) = update(PopupState::new(), Msg::ActiveTabDetected(None));

    assert_eq!(state.mode(), PopupMode::OpenLinkedIn);
}

#[test]
fn tab_query_failure_leaves_state_untouched() {
    init_logging();
    let state = detect(PopupState::new(), "https://www.linkedin.com/in/jdoe/");
    let before = state.clone();

    let (after, effects) = update(state, Msg::ActiveTabQueryFailed("no window".into()));

    assert_eq!(after, before);
    assert!(effects.is_empty());
}

#[test]
fn profile_username_accepts_profile_variants() {
    assert_eq!(
        profile_username("https://linkedin.com/in/jane-doe-123"),
        Some("jane-doe-123".to_string())
    );
    assert_eq!(
        profile_username("https://de.linkedin.com/in/hans?trk=public"),
        Some("hans".to_string())
    );
    assert_eq!(
        profile_username("https://www.linkedin.com/in/jdoe/details/experience/"),
        Some("jdoe".to_string())
    );
}

#[test]
fn profile_username_rejects_lookalikes() {
    assert_eq!(profile_username("https://www.linkedin.com/in/"), None);
    assert_eq!(profile_username("https://www.linkedin.com/company/acme"), None);
    assert_eq!(profile_username("https://notlinkedin.com/in/jdoe"), None);
    assert_eq!(
        profile_username("https://evil.example/?next=linkedin.com/in/jdoe"),
        None
    );
    assert_eq!(profile_username("chrome://extensions"), None);
    assert_eq!(profile_username("not-a-url"), None);
}
