//! # Redirect Result Extractor
//!
//! When a wallet finishes the licence flow it navigates back to the
//! application root with `#response_code=<opaque>` appended. The fragment is
//! never sent to a server, so the page itself must read it.

/// Fragment key carrying the licence flow's response code.
pub const RESPONSE_CODE: &str = "response_code";

/// Return the `response_code` carried in the fragment of `current_url`.
///
/// The fragment is parsed as `application/x-www-form-urlencoded` pairs. Works
/// on absolute URLs and on bare paths such as `/#response_code=abc`. An empty
/// value is treated as absent.
#[must_use]
pub fn extract_redirect_result(current_url: &str) -> Option<String> {
    let (_, fragment) = current_url.split_once('#')?;
    url::form_urlencoded::parse(fragment.as_bytes())
        .find(|(key, _)| key == RESPONSE_CODE)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Remove the fragment from `current_url` so that reloading the page does not
/// replay a consumed response code.
#[must_use]
pub fn strip_fragment(current_url: &str) -> &str {
    current_url.split_once('#').map_or(current_url, |(base, _)| base)
}
