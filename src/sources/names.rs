use super::{bare_host, parse_listing_url};
use tracing::debug;

/// Display names for listing sites keyed by their second-level domain
const KNOWN_SITES: &[(&str, &str)] = &[
    ("zillow", "Zillow"),
    ("redfin", "Redfin"),
    ("realtor", "Realtor.com"),
    ("trulia", "Trulia"),
    ("homes", "Homes.com"),
    ("century21", "Century 21"),
    ("coldwellbanker", "Coldwell Banker"),
    ("remax", "RE/MAX"),
    ("compass", "Compass"),
    ("movoto", "Movoto"),
    ("homesnap", "Homesnap"),
    ("apartments", "Apartments.com"),
    ("loopnet", "LoopNet"),
    ("auction", "Auction.com"),
    ("foreclosure", "Foreclosure.com"),
    ("homefinder", "HomeFinder"),
    ("point2homes", "Point2 Homes"),
    ("estately", "Estately"),
    ("mlslistings", "MLS Listings"),
    ("sothebysrealty", "Sotheby's"),
    ("christiesrealestate", "Christie's"),
    ("berkshirehathaway", "Berkshire Hathaway"),
    ("kw", "Keller Williams"),
];

/// Human-readable name of the site a listing URL points at.
///
/// Known sites map to their brand name; anything else becomes the
/// second-level domain with its first letter capitalised.
pub fn extract_source_from_url(url: &str) -> Option<String> {
    let Some(parsed) = parse_listing_url(url) else {
        debug!(url, "Could not parse listing URL");
        return None;
    };

    let host = bare_host(&parsed)?;
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return None;
    }

    let site = labels[labels.len() - 2];
    let lower = site.to_lowercase();

    if let Some((_, name)) = KNOWN_SITES.iter().find(|(key, _)| *key == lower) {
        return Some((*name).to_string());
    }

    let mut chars = site.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
}
