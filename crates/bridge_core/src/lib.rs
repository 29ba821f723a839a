//! Bridge core: pure popup state machine and LinkedIn URL helpers.
mod effect;
mod linkedin;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, CLOSE_DELAY, LINKEDIN_HOME_URL, STATUS_DURATION};
pub use linkedin::{looks_like_profile_url, profile_username, PROFILE_PATH_MARKER};
pub use msg::{CommandOutcome, Msg};
pub use state::{BrowserTab, LinkedInTab, PopupAction, PopupMode, PopupState, TabId};
pub use update::update;
pub use view_model::{PopupViewModel, StatusBanner, StatusKind};
