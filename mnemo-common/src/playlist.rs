//! Playlist parsing and normalization
//!
//! Playlists travel as JSON arrays of track file names, sometimes wrapped in a
//! JSON string (multipart form fields). Parsing is lenient: anything that is
//! not an array of strings degrades to a caller-supplied fallback rather than
//! an error.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Volume used when nothing usable is stored
pub const DEFAULT_VOLUME: f64 = 0.3;

/// Audio file extensions recognised as library tracks (lower case, no dot)
pub const SUPPORTED_AUDIO_EXTENSIONS: &[&str] = &["mp3", "ogg", "wav", "m4a", "aac", "flac"];

/// Parse a playlist from an arbitrary JSON value
///
/// Arrays keep their trimmed, non-empty string items. A string is parsed as
/// JSON and must itself hold an array. Everything else, including an empty
/// string, yields `fallback`.
pub fn parse_playlist(raw: Option<&Value>, fallback: &[String]) -> Vec<String> {
    match raw {
        Some(Value::Array(items)) => collect_strings(items),
        Some(Value::String(text)) if !text.is_empty() => parse_playlist_text(text, fallback),
        _ => fallback.to_vec(),
    }
}

/// Parse a playlist from JSON text (e.g. a multipart form field)
pub fn parse_playlist_text(text: &str, fallback: &[String]) -> Vec<String> {
    if text.is_empty() {
        return fallback.to_vec();
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => collect_strings(&items),
        _ => fallback.to_vec(),
    }
}

fn collect_strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reduce every entry to its base name, drop blanks and duplicates (first
/// occurrence wins) and, when `available` is given, names not in the library
pub fn sanitize_playlist(playlist: &[String], available: Option<&HashSet<String>>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(playlist.len());

    for item in playlist {
        let normalized = base_name(item).trim();
        if normalized.is_empty() || seen.contains(normalized) {
            continue;
        }
        if let Some(set) = available {
            if !set.contains(normalized) {
                continue;
            }
        }
        seen.insert(normalized.to_string());
        unique.push(normalized.to_string());
    }

    unique
}

/// Trim, drop blanks and duplicates, keeping first occurrences in order
pub fn normalize_track_list<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|item| item.as_ref().trim())
        .filter(|name| !name.is_empty() && seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}

/// Keep only the normalized names that exist in `library`
pub fn filter_existing<S: AsRef<str>>(raw: &[S], library: &HashSet<String>) -> Vec<String> {
    normalize_track_list(raw)
        .into_iter()
        .filter(|name| library.contains(name))
        .collect()
}

/// Last path component, treating `/` as the separator
fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}

/// Numeric interpretation of a loosely typed volume value
///
/// Numbers pass through, numeric strings are parsed (blank counts as zero),
/// booleans map to 1/0 and null to 0. Anything else is not a number.
pub fn volume_from_value(raw: &Value) -> f64 {
    match raw {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        _ => f64::NAN,
    }
}

/// Clamp to [0, 1]; non-finite input becomes [`DEFAULT_VOLUME`]
pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        DEFAULT_VOLUME
    }
}

/// Ordering used for library listings: case-insensitive, then byte order
pub fn library_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Whether `file_name` has a supported audio extension (case-insensitive)
pub fn is_supported_audio(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_AUDIO_EXTENSIONS.contains(&ext.as_str())
        }
        _ => false,
    }
}

/// Bytes escaped in a path component: everything but ASCII alphanumerics
/// and `-_.!~*'()`, the set browsers leave alone in `encodeURIComponent`
const PATH_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single URL path component
pub fn encode_path_component(input: &str) -> String {
    utf8_percent_encode(input, PATH_COMPONENT).to_string()
}

/// Public URL of a library track
pub fn track_url(name: &str) -> String {
    format!("/music/{}", encode_path_component(name))
}
