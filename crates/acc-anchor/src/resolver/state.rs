//! Resolver states, strategies and outcomes.

use std::time::Duration;

use serde::Serialize;

use acc_config::ResolverConfig;
use acc_protocols::PositionDescriptor;

use crate::dom::NodeHandle;

/// Lifecycle of the most recent resolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverState {
    #[default]
    Idle,
    Decoding,
    Locating,
    Retrying,
    Found,
    GaveUp,
}

impl std::fmt::Display for ResolverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResolverState::Idle => "idle",
            ResolverState::Decoding => "decoding",
            ResolverState::Locating => "locating",
            ResolverState::Retrying => "retrying",
            ResolverState::Found => "found",
            ResolverState::GaveUp => "gave_up",
        };
        f.write_str(s)
    }
}

/// Lookup strategy, one per descriptor variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Element carrying the message id or DOM id.
    StableId,
    /// Rank in the candidate list.
    PositionalIndex,
    /// Text node containing the fingerprint.
    TextFingerprint,
}

impl Strategy {
    pub fn for_descriptor(descriptor: &PositionDescriptor) -> Self {
        match descriptor {
            PositionDescriptor::StableId(_) => Strategy::StableId,
            PositionDescriptor::PositionalIndex(_) => Strategy::PositionalIndex,
            PositionDescriptor::TextFingerprint(_) => Strategy::TextFingerprint,
        }
    }

    /// Whether a miss may just mean the node has not rendered yet.
    pub fn retries(&self) -> bool {
        !matches!(self, Strategy::TextFingerprint)
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Strategy::StableId => "stable_id",
            Strategy::PositionalIndex => "positional_index",
            Strategy::TextFingerprint => "text_fingerprint",
        };
        f.write_str(s)
    }
}

/// Result of a single lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Found(NodeHandle),
    /// Miss that a later attempt may turn into a hit.
    NotYetRendered,
    /// Miss that no retry can fix.
    NotFound,
}

/// How a resolution chain ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Found,
    /// Retry budget exhausted.
    GaveUp,
    /// Single-shot lookup missed.
    NotFound,
    /// Fragment carried no anchor.
    NoAnchor,
    /// Fragment named an anchor but its value was unusable.
    Malformed(String),
    /// A newer navigation took over before this chain finished.
    Superseded,
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found)
    }
}

/// Report returned for every navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: Outcome,
    pub strategy: Option<Strategy>,
    /// Lookups performed by this chain.
    pub attempts: u32,
    pub generation: u64,
    /// Highlighted node when found.
    pub target: Option<NodeHandle>,
}

impl Resolution {
    pub(crate) fn new(generation: u64, outcome: Outcome) -> Self {
        Self {
            outcome,
            strategy: None,
            attempts: 0,
            generation,
            target: None,
        }
    }
}

/// Attempt budgets and pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retry_delay: Duration,
    pub id_attempts: u32,
    pub index_attempts: u32,
}

impl RetryPolicy {
    /// Total attempts allowed for a strategy.
    pub fn budget(&self, strategy: Strategy) -> u32 {
        if !strategy.retries() {
            return 1;
        }
        match strategy {
            Strategy::StableId => self.id_attempts,
            _ => self.index_attempts,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&ResolverConfig::default())
    }
}

impl From<&ResolverConfig> for RetryPolicy {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            retry_delay: config.retry_delay(),
            id_attempts: config.id_attempts,
            index_attempts: config.index_attempts,
        }
    }
}
