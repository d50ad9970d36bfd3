//! Position descriptors: the anchor a saved excerpt carries back to its source.

use serde::{Deserialize, Serialize};

use crate::error::AnchorError;

/// Pointer from a saved excerpt back to its originating DOM node.
///
/// Exactly one variant is ever present. Resolution tries them in declaration
/// order of precedence (`StableId`, then `PositionalIndex`, then
/// `TextFingerprint`) and never falls through from one kind to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum PositionDescriptor {
    /// Durable platform-assigned message identifier.
    #[serde(rename = "id")]
    StableId(String),
    /// 0-based rank among the page's candidate assistant messages.
    #[serde(rename = "index")]
    PositionalIndex(usize),
    /// Whitespace-stripped substring of the excerpt's plain text.
    #[serde(rename = "fingerprint")]
    TextFingerprint(String),
}

/// Discriminant of a [`PositionDescriptor`], as persisted in `anchor_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorKind {
    Id,
    Index,
    Fingerprint,
}

impl AnchorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Index => "index",
            Self::Fingerprint => "fingerprint",
        }
    }
}

impl std::fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnchorKind {
    type Err = AnchorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "index" => Ok(Self::Index),
            "fingerprint" => Ok(Self::Fingerprint),
            other => Err(AnchorError::MalformedDescriptor(format!(
                "unknown anchor kind: {other}"
            ))),
        }
    }
}

impl PositionDescriptor {
    pub fn kind(&self) -> AnchorKind {
        match self {
            Self::StableId(_) => AnchorKind::Id,
            Self::PositionalIndex(_) => AnchorKind::Index,
            Self::TextFingerprint(_) => AnchorKind::Fingerprint,
        }
    }

    /// The value half of the persisted `(anchor_kind, anchor_value)` pair.
    pub fn value(&self) -> String {
        match self {
            Self::StableId(id) => id.clone(),
            Self::PositionalIndex(index) => index.to_string(),
            Self::TextFingerprint(snippet) => snippet.clone(),
        }
    }

    /// Rebuild a descriptor from its persisted pair.
    pub fn from_parts(kind: &str, value: &str) -> Result<Self, AnchorError> {
        match kind.parse::<AnchorKind>()? {
            AnchorKind::Id => Ok(Self::StableId(value.to_string())),
            AnchorKind::Index => value
                .trim()
                .parse::<usize>()
                .map(Self::PositionalIndex)
                .map_err(|_| {
                    AnchorError::MalformedDescriptor(format!("index is not a number: {value}"))
                }),
            AnchorKind::Fingerprint => Ok(Self::TextFingerprint(value.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "anchor_tests.rs"]
mod tests;
