//! Derive listing metadata from the URLs users paste in.

pub mod address;
pub mod names;

pub use address::extract_address_from_url;
pub use names::extract_source_from_url;

use reqwest::Url;

/// Parse a pasted listing URL, assuming https when no scheme is given
pub(crate) fn parse_listing_url(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    Url::parse(&with_scheme).ok()
}

/// Host name without a leading `www.`
pub(crate) fn bare_host(url: &Url) -> Option<&str> {
    url.host_str().map(|h| h.strip_prefix("www.").unwrap_or(h))
}
