use super::{bare_host, parse_listing_url};

/// Street address encoded in a listing URL, for the sites whose URL shape is
/// known. Returns `None` for other sites or unexpected paths.
pub fn extract_address_from_url(url: &str) -> Option<String> {
    let parsed = parse_listing_url(url)?;
    let host = bare_host(&parsed)?.to_string();
    let parts: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let address = if host.contains("redfin.com") {
        redfin(&parts)
    } else if host.contains("zillow.com") {
        zillow(&parts)
    } else if host.contains("realtor.com") {
        realtor(&parts)
    } else if host.contains("trulia.com") {
        trulia(&parts)
    } else if host.contains("homes.com") {
        homes(&parts)
    } else {
        None
    };

    address.filter(|a| !a.trim().is_empty())
}

/// `/STATE/CITY/STREET-ZIP/home/ID`
fn redfin(parts: &[&str]) -> Option<String> {
    if parts.len() < 3 {
        return None;
    }
    let (state, city) = (parts[0], dashes_to_spaces(parts[1]));

    match split_trailing_number(parts[2]) {
        Some((street, zip)) => Some(format!(
            "{}, {city}, {state} {zip}",
            dashes_to_spaces(street)
        )),
        None => Some(format!("{}, {city}, {state}", dashes_to_spaces(parts[2]))),
    }
}

/// `/homedetails/STREET-CITY-ST-ZIP/ID_zpid/` or `/homes/ADDRESS_rb/`
fn zillow(parts: &[&str]) -> Option<String> {
    match parts {
        ["homedetails", address, ..] => {
            let with_state_zip = split_trailing_number(address).and_then(|(rest, zip)| {
                let (main, state) = rest.rsplit_once('-')?;
                let is_state = state.len() == 2 && state.chars().all(|c| c.is_ascii_uppercase());
                is_state.then(|| format!("{}, {state} {zip}", dashes_to_spaces(main)))
            });
            Some(with_state_zip.unwrap_or_else(|| dashes_to_spaces(address)))
        }
        ["homes", address, ..] => {
            let address: &str = address;
            let address = address.strip_suffix("_rb").unwrap_or(address);
            Some(dashes_to_spaces(address))
        }
        _ => None,
    }
}

/// `/realestateandhomes-detail/ADDRESS_ID`
fn realtor(parts: &[&str]) -> Option<String> {
    match parts {
        ["realestateandhomes-detail", address, ..] => {
            let address: &str = address;
            let address = address.split('_').next().unwrap_or(address);
            Some(dashes_to_spaces(address))
        }
        _ => None,
    }
}

/// `/p/ST/CITY/STREET-CITY-ST-ZIP/ID`
fn trulia(parts: &[&str]) -> Option<String> {
    match parts {
        ["p", state, city, address, ..] => {
            let tokens: Vec<&str> = address.split('-').collect();
            let n = tokens.len();
            let matches_shape = n >= 4
                && tokens[n - 2..].iter().all(|t| !t.is_empty())
                && !tokens[n - 3].is_empty()
                && tokens[n - 1].chars().all(|c| c.is_ascii_digit());

            if matches_shape {
                let street = tokens[..n - 3].join(" ");
                Some(format!("{street}, {}, {state}", dashes_to_spaces(city)))
            } else {
                Some(dashes_to_spaces(address))
            }
        }
        _ => None,
    }
}

/// `/property/ADDRESS/ID/`
fn homes(parts: &[&str]) -> Option<String> {
    match parts {
        ["property", address, ..] => Some(dashes_to_spaces(address)),
        _ => None,
    }
}

/// Split `"street-12345"` into `("street", "12345")`
fn split_trailing_number(segment: &str) -> Option<(&str, &str)> {
    let (head, tail) = segment.rsplit_once('-')?;
    (!tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit())).then_some((head, tail))
}

fn dashes_to_spaces(s: &str) -> String {
    s.replace('-', " ")
}
