//! Message router wire types.
//!
//! Requests travel between the page agent, the popup/dashboard surfaces and
//! the store owner as JSON objects tagged by `type` with a `payload`.

use serde::{Deserialize, Serialize};

use crate::error::RouterError;
use crate::types::{ExcerptId, NewExcerpt, SavedExcerpt};

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;

/// A request addressed to the store owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Request {
    #[serde(rename = "ACC_ADD_ENTRY")]
    AddEntry(NewExcerpt),

    #[serde(rename = "ACC_SEARCH")]
    Search {
        #[serde(default)]
        keyword: String,
    },

    #[serde(rename = "ACC_DELETE_ENTRY")]
    DeleteEntry { id: ExcerptId },

    #[serde(rename = "ACC_BATCH_DELETE")]
    BatchDelete {
        #[serde(default)]
        ids: Vec<ExcerptId>,
    },

    #[serde(rename = "ACC_CLEAR_ALL_ENTRIES")]
    ClearAll,

    #[serde(rename = "ACC_SET_TITLE")]
    SetTitle {
        id: ExcerptId,
        #[serde(default)]
        title: Option<String>,
    },
}

impl Request {
    /// Every `type` tag the router understands.
    pub const TYPES: [&'static str; 6] = [
        "ACC_ADD_ENTRY",
        "ACC_SEARCH",
        "ACC_DELETE_ENTRY",
        "ACC_BATCH_DELETE",
        "ACC_CLEAR_ALL_ENTRIES",
        "ACC_SET_TITLE",
    ];

    /// Types whose whole payload may be omitted; every field defaults.
    const OPTIONAL_PAYLOAD: [&'static str; 2] = ["ACC_SEARCH", "ACC_BATCH_DELETE"];

    /// Decode a request, distinguishing an unknown `type` from a bad payload.
    pub fn parse(json: &str) -> Result<Self, RouterError> {
        let mut value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| RouterError::InvalidRequest(e.to_string()))?;
        let kind = value
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| RouterError::InvalidRequest("missing type".to_string()))?
            .to_string();
        if !Self::TYPES.contains(&kind.as_str()) {
            return Err(RouterError::UnknownType(kind));
        }
        if Self::OPTIONAL_PAYLOAD.contains(&kind.as_str()) {
            if let Some(object) = value.as_object_mut() {
                let payload = object
                    .entry("payload")
                    .or_insert(serde_json::Value::Null);
                if payload.is_null() {
                    *payload = serde_json::Value::Object(serde_json::Map::new());
                }
            }
        }
        serde_json::from_value(value).map_err(|e| RouterError::InvalidRequest(e.to_string()))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::AddEntry(_) => "ACC_ADD_ENTRY",
            Self::Search { .. } => "ACC_SEARCH",
            Self::DeleteEntry { .. } => "ACC_DELETE_ENTRY",
            Self::BatchDelete { .. } => "ACC_BATCH_DELETE",
            Self::ClearAll => "ACC_CLEAR_ALL_ENTRIES",
            Self::SetTitle { .. } => "ACC_SET_TITLE",
        }
    }

    /// Whether a successful request changes stored data.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Search { .. })
    }
}

/// The reply to a [`Request`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ExcerptId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SavedExcerpt>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok() -> Self {
        Self {
            ok: true,
            ..Default::default()
        }
    }

    pub fn created(id: impl Into<ExcerptId>) -> Self {
        Self {
            ok: true,
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn results(results: Vec<SavedExcerpt>) -> Self {
        Self {
            ok: true,
            results: Some(results),
            ..Default::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Broadcast to every surface after stored data changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    #[serde(rename = "ACC_DATA_CHANGED")]
    DataChanged,
}
