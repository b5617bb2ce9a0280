//! Export and import of saved searches as shareable codes, links and files.
//!
//! The payload is the envelope `{"type": "listiq-shared-search", "data": ...}`.
//! Codes are URL-safe base64 without padding; on import the standard alphabet,
//! padding, percent-escaped codes, full share links and raw JSON are accepted.

use crate::error::{Error, Result};
use crate::models::{generate_id, SavedSearch};
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::{form_urlencoded, Url};

/// Envelope tag identifying a shared search payload
pub const SHARED_SEARCH_TYPE: &str = "listiq-shared-search";

/// Query parameter carrying the code in share links
pub const SHARE_QUERY_PARAM: &str = "shared";

#[derive(Serialize)]
struct Envelope<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a SavedSearch,
}

#[derive(Deserialize)]
struct IncomingEnvelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    data: Option<Value>,
}

/// Where an imported search came from; decides the name suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// Pasted code or uploaded file
    Code,
    /// Opened from a share link
    SharedLink,
}

impl ImportKind {
    fn suffix(self) -> &'static str {
        match self {
            ImportKind::Code => " (Imported)",
            ImportKind::SharedLink => " (Shared)",
        }
    }
}

/// Shareable code for embedding in a query parameter
pub fn export_code(search: &SavedSearch) -> Result<String> {
    let json = serde_json::to_vec(&Envelope {
        kind: SHARED_SEARCH_TYPE,
        data: search,
    })?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Pretty JSON for file download
pub fn export_json(search: &SavedSearch) -> Result<String> {
    Ok(serde_json::to_string_pretty(&Envelope {
        kind: SHARED_SEARCH_TYPE,
        data: search,
    })?)
}

/// File name for a downloaded search, e.g. `lake-houses-shared-search.json`
pub fn export_file_name(name: &str) -> String {
    let slug = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    format!("{slug}-shared-search.json")
}

/// Link that opens the search, e.g. `https://listiq.app?shared=...`
pub fn share_url(origin: &str, search: &SavedSearch) -> Result<String> {
    Ok(format!(
        "{}?{}={}",
        origin.trim_end_matches('/'),
        SHARE_QUERY_PARAM,
        export_code(search)?
    ))
}

/// Decode a shared search without renaming it.
pub fn decode_shared(input: &str) -> Result<SavedSearch> {
    let input = input.trim();
    let code = code_from_link(input).unwrap_or_else(|| input.to_string());

    let value = decode_code(&code)
        .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
        .or_else(|| serde_json::from_str::<Value>(input).ok())
        .ok_or_else(|| Error::InvalidImport("Invalid import code or data format".to_string()))?;

    let envelope: IncomingEnvelope = serde_json::from_value(value)
        .map_err(|_| Error::InvalidImport("Invalid shared search data format".to_string()))?;

    let data = match (envelope.kind.as_deref(), envelope.data) {
        (Some(SHARED_SEARCH_TYPE), Some(data)) if !data.is_null() => data,
        _ => {
            return Err(Error::InvalidImport(
                "Invalid shared search data format".to_string(),
            ))
        }
    };

    let search: SavedSearch = serde_json::from_value(data)
        .map_err(|e| Error::InvalidImport(format!("Malformed shared search: {e}")))?;

    if search.name.trim().is_empty() || search.properties.is_empty() {
        return Err(Error::InvalidImport(
            "The shared search is missing required data".to_string(),
        ));
    }

    Ok(search)
}

/// Decode a shared search and give it a fresh identity: new id, suffixed
/// name and the current timestamp. Properties are kept as they are.
pub fn import_search(input: &str, kind: ImportKind) -> Result<SavedSearch> {
    let search = decode_shared(input)?;

    Ok(SavedSearch {
        id: generate_id(),
        name: format!("{}{}", search.name, kind.suffix()),
        properties: search.properties,
        saved_at: Utc::now(),
    })
}

fn code_from_link(input: &str) -> Option<String> {
    if !input.contains(&format!("{SHARE_QUERY_PARAM}=")) {
        return None;
    }
    let url = Url::parse(input).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == SHARE_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
}

fn decode_code(code: &str) -> Option<Vec<u8>> {
    // Query decoding turns a bare '+' into a space; base64 never has spaces.
    let query = format!("{SHARE_QUERY_PARAM}={}", code.trim());
    let (_, value) = form_urlencoded::parse(query.as_bytes()).next()?;
    let unescaped = value.replace(' ', "+");
    let stripped = unescaped.trim_end_matches('=');

    URL_SAFE_NO_PAD
        .decode(stripped)
        .or_else(|_| STANDARD_NO_PAD.decode(stripped))
        .map_err(|e| debug!(error = %e, "Import input is not base64"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::property;
    use base64::engine::general_purpose::STANDARD;

    fn search() -> SavedSearch {
        let mut with_unknown_year = property("b", 615_000.0, 2_400);
        with_unknown_year.year_built = None;
        with_unknown_year.bathrooms = 2.5;
        SavedSearch::new(
            "Lake Houses",
            vec![property("a", 450_000.0, 1_800), with_unknown_year],
        )
    }

    #[test]
    fn export_then_import_preserves_properties() {
        let original = search();
        let code = export_code(&original).unwrap();
        let imported = import_search(&code, ImportKind::Code).unwrap();

        assert_eq!(imported.properties, original.properties);
        assert_eq!(imported.name, "Lake Houses (Imported)");
        assert_ne!(imported.id, original.id);
    }

    #[test]
    fn share_link_import_uses_shared_suffix() {
        let original = search();
        let link = share_url("https://listiq.app/", &original).unwrap();
        assert!(link.starts_with("https://listiq.app?shared="));

        let imported = import_search(&link, ImportKind::SharedLink).unwrap();
        assert_eq!(imported.name, "Lake Houses (Shared)");
        assert_eq!(imported.properties, original.properties);
    }

    #[test]
    fn accepts_percent_escaped_standard_base64() {
        let original = search();
        let json = export_json(&original).unwrap();
        let escaped = STANDARD
            .encode(json.as_bytes())
            .replace('+', "%2B")
            .replace('/', "%2F")
            .replace('=', "%3D");

        let decoded = decode_shared(&escaped).unwrap();
        assert_eq!(decoded.properties, original.properties);
    }

    #[test]
    fn accepts_any_percent_escape_in_codes() {
        let original = search();
        let json = export_json(&original).unwrap();
        let code = STANDARD.encode(json.as_bytes());
        let escaped: String = code
            .chars()
            .map(|c| match c {
                '+' => "%2b".to_string(),
                '/' => "%2f".to_string(),
                '=' => "%3d".to_string(),
                'A' => "%41".to_string(),
                other => other.to_string(),
            })
            .collect();

        assert_eq!(decode_shared(&escaped).unwrap().properties, original.properties);
        assert_eq!(decode_shared(&code).unwrap().properties, original.properties);
    }

    #[test]
    fn link_with_unescaped_plus_still_decodes() {
        let original = search();
        let json = export_json(&original).unwrap();
        let code = STANDARD.encode(json.as_bytes());
        let link = format!("https://listiq.app/?{SHARE_QUERY_PARAM}={code}");

        assert_eq!(decode_shared(&link).unwrap().properties, original.properties);
    }

    #[test]
    fn accepts_raw_json_files() {
        let original = search();
        let decoded = decode_shared(&export_json(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn rejects_wrong_envelope_and_missing_data() {
        let wrong_type = r#"{"type":"something-else","data":{"name":"x","properties":[]}}"#;
        let err = decode_shared(wrong_type).unwrap_err();
        assert!(err.to_string().contains("Invalid shared search data format"));

        let no_data = r#"{"type":"listiq-shared-search"}"#;
        assert!(decode_shared(no_data).is_err());

        let empty = r#"{"type":"listiq-shared-search","data":{"name":"x","properties":[]}}"#;
        let err = decode_shared(empty).unwrap_err();
        assert!(err.to_string().contains("missing required data"));

        let garbage = decode_shared("%%% not a code %%%").unwrap_err();
        assert!(garbage.to_string().contains("Invalid import code"));
    }

    #[test]
    fn file_names_are_slugged() {
        assert_eq!(
            export_file_name("Lake  Houses North"),
            "lake-houses-north-shared-search.json"
        );
    }
}
