//! Saved excerpts and their create payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::PositionDescriptor;
use crate::error::StoreError;

/// Opaque store-assigned excerpt identifier.
pub type ExcerptId = String;

/// Label shown for excerpts the user never titled.
pub const UNTITLED: &str = "Untitled";

/// A persisted excerpt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedExcerpt {
    /// Assigned by the store on creation.
    pub id: ExcerptId,

    /// Captured markup of the source excerpt.
    pub content: String,

    pub created_at: DateTime<Utc>,

    /// Absolute URL of the source page, never carrying a fragment.
    pub source_url: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// User-assigned label, overridable independently of the excerpt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub anchor: PositionDescriptor,
}

impl SavedExcerpt {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    /// Case-insensitive substring match over content, tags and title.
    ///
    /// An empty keyword matches everything.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return true;
        }
        self.content.to_lowercase().contains(&keyword)
            || self
                .tags
                .iter()
                .any(|t| t.to_lowercase().contains(&keyword))
            || self
                .title
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(&keyword))
    }
}

/// Payload for creating a new excerpt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExcerpt {
    pub content: String,

    pub source_url: String,

    #[serde(default)]
    pub tags: Vec<String>,

    pub anchor: PositionDescriptor,

    /// Defaults to the time of creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl NewExcerpt {
    pub fn new(
        content: impl Into<String>,
        source_url: impl Into<String>,
        anchor: PositionDescriptor,
    ) -> Self {
        Self {
            content: content.into(),
            source_url: source_url.into(),
            tags: Vec::new(),
            anchor,
            created_at: None,
            title: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Parse an absolute URL and drop its fragment.
pub fn normalize_source_url(raw: &str) -> Result<String, StoreError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| StoreError::InvalidRecord(format!("source url {raw:?}: {e}")))?;
    url.set_fragment(None);
    Ok(url.to_string())
}

/// Trim tags, drop blanks and duplicates; first occurrence wins.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Blank titles mean "no title".
pub fn normalize_title(title: Option<&str>) -> Option<String> {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "excerpt_tests.rs"]
mod tests;
