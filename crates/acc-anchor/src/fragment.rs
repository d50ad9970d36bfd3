//! URL fragment codec for position descriptors.
//!
//! Grammar: `#acc-id=<pct>` | `#acc-index=<n>` | `#acc-highlight=<pct>`.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use acc_protocols::{AnchorError, PositionDescriptor, SavedExcerpt};

pub const ID_KEY: &str = "acc-id=";
pub const INDEX_KEY: &str = "acc-index=";
pub const HIGHLIGHT_KEY: &str = "acc-highlight=";

/// Characters `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encode a descriptor as a URL fragment, including the leading `#`.
pub fn encode_fragment(descriptor: &PositionDescriptor) -> String {
    match descriptor {
        PositionDescriptor::StableId(id) => {
            format!("#{ID_KEY}{}", utf8_percent_encode(id, COMPONENT))
        }
        PositionDescriptor::PositionalIndex(index) => format!("#{INDEX_KEY}{index}"),
        PositionDescriptor::TextFingerprint(snippet) => {
            format!("#{HIGHLIGHT_KEY}{}", utf8_percent_encode(snippet, COMPONENT))
        }
    }
}

/// Shareable link back to an excerpt's source.
pub fn link_for(excerpt: &SavedExcerpt) -> String {
    format!("{}{}", excerpt.source_url, encode_fragment(&excerpt.anchor))
}

/// Decode a fragment.
///
/// Keys are checked in priority order (`acc-id`, `acc-index`,
/// `acc-highlight`); the value is everything after the key. `Ok(None)` means
/// no anchor: either no recognised key or an empty highlight value.
pub fn parse_fragment(fragment: &str) -> Result<Option<PositionDescriptor>, AnchorError> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);

    if let Some(raw) = value_after(fragment, ID_KEY) {
        let id = decode(raw)?;
        if id.is_empty() {
            return Err(AnchorError::MalformedDescriptor("empty acc-id".to_string()));
        }
        return Ok(Some(PositionDescriptor::StableId(id)));
    }

    if let Some(raw) = value_after(fragment, INDEX_KEY) {
        return parse_index(raw).map(|i| Some(PositionDescriptor::PositionalIndex(i)));
    }

    if let Some(raw) = value_after(fragment, HIGHLIGHT_KEY) {
        if raw.is_empty() {
            return Ok(None);
        }
        return Ok(Some(PositionDescriptor::TextFingerprint(decode(raw)?)));
    }

    Ok(None)
}

fn value_after<'a>(fragment: &'a str, key: &str) -> Option<&'a str> {
    fragment.find(key).map(|pos| &fragment[pos + key.len()..])
}

fn decode(raw: &str) -> Result<String, AnchorError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| AnchorError::MalformedDescriptor(format!("invalid encoding: {e}")))
}

/// Leading decimal digits, like `parseInt(value, 10)` for non-negative input.
fn parse_index(raw: &str) -> Result<usize, AnchorError> {
    let trimmed = raw.trim_start();
    let digits: &str = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);
    digits
        .parse::<usize>()
        .map_err(|_| AnchorError::MalformedDescriptor(format!("acc-index={raw}")))
}
