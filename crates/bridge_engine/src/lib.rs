//! Bridge engine: wire protocol, channel seams, and the two bridge components.
mod channel;
mod content;
mod host;
mod origin;
mod popup;
mod protocol;
mod runtime;
mod settings;

pub use channel::{
    default_clock, ChannelError, Clock, PageSink, PopupSurface, PostError, PreferenceStore,
    RuntimeChannel, TabsApi,
};
pub use content::ContentBridge;
pub use host::BridgeHost;
pub use origin::{document_origin, OriginError};
pub use popup::PopupController;
pub use protocol::{
    ExtensionAck, ExtensionMessage, PageEnvelope, PageEvent, PageMessage, PageRequest,
    RuntimeAck, RuntimeCommand, ScrapeRequest, StartPayload,
};
pub use runtime::HttpRuntime;
pub use settings::{BridgeSettings, RuntimeSettings};
