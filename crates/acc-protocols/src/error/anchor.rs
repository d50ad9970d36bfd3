//! Anchor encoding and decoding errors.

use thiserror::Error;

/// Errors raised while building or decoding a position descriptor.
///
/// Lookup misses during resolution are not errors; they are resolver
/// outcomes and never leave the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnchorError {
    #[error("Malformed descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Selection is empty")]
    EmptySelection,

    #[error("Captured content is empty")]
    EmptyContent,
}
