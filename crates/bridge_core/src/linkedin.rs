use url::Url;

/// Path fragment every LinkedIn profile URL contains.
pub const PROFILE_PATH_MARKER: &str = "linkedin.com/in/";

/// Extracts the profile username from a LinkedIn profile URL such as
/// `https://www.linkedin.com/in/jdoe/`.
///
/// Returns `None` for anything that is not an http(s) URL on `linkedin.com`
/// (or a subdomain) whose path starts with `/in/<username>`.
pub fn profile_username(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?.to_ascii_lowercase();
    if host != "linkedin.com" && !host.ends_with(".linkedin.com") {
        return None;
    }

    let mut segments = url.path_segments()?;
    if segments.next()? != "in" {
        return None;
    }
    let username = segments.next()?;
    if username.is_empty() {
        return None;
    }
    Some(username.to_string())
}

/// Loose check applied to user-typed input before sending a scrape request.
pub fn looks_like_profile_url(input: &str) -> bool {
    input.contains(PROFILE_PATH_MARKER)
}
