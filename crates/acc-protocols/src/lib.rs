//! # ACC Protocols
//!
//! Shared definitions for the ACC excerpt collector.
//! Contains only data types and interface definitions - no implementations.
//!
//! ## Contents
//!
//! - [`SavedExcerpt`] / [`NewExcerpt`] - the persisted unit and its create payload
//! - [`PositionDescriptor`] - the anchor pointing back into the source page
//! - [`EntryStore`] - trait for excerpt storage implementations
//! - [`Request`] / [`Response`] - message router wire types

pub mod error;
pub mod router;
pub mod store;
pub mod types;

pub use error::{AnchorError, RouterError, StoreError};
pub use router::{Notification, Request, Response};
pub use store::EntryStore;
pub use types::*;
