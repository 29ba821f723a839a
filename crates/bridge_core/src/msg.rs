#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Popup surface finished loading.
    PopupOpened,
    /// Result of the active-tab query; `None` when the window has no active tab.
    ActiveTabDetected(Option<crate::BrowserTab>),
    /// Active-tab query failed; state is left untouched.
    ActiveTabQueryFailed(String),
    /// User edited the profile URL input.
    UrlInputChanged(String),
    /// User clicked "scrape current page".
    ScrapeCurrentClicked,
    /// User clicked "open LinkedIn".
    OpenLinkedInClicked,
    /// User clicked "scrape from URL".
    ScrapeUrlClicked,
    /// The single outstanding request for `action` has completed.
    CommandFinished {
        action: crate::PopupAction,
        outcome: CommandOutcome,
    },
    /// A result banner's display time is over.
    StatusExpired { seq: u64 },
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Responder replied `{ok: true}`.
    Acknowledged,
    /// Responder replied `{ok: false}`, with its error text if any.
    Rejected(Option<String>),
    /// The request never reached a responder.
    ChannelFailed(String),
}
