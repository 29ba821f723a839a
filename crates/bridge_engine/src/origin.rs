use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum OriginError {
    #[error("invalid page url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("page url has no tuple origin: {0}")]
    Opaque(String),
}

/// Serialized origin (`scheme://host[:port]`) of the page the bridge runs in.
///
/// This is the only value inbound event origins are compared against and the
/// only target outbound posts are addressed to.
pub fn document_origin(page_url: &str) -> Result<String, OriginError> {
    let url = Url::parse(page_url)?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(OriginError::Opaque(page_url.to_string()));
    }
    Ok(origin.ascii_serialization())
}
