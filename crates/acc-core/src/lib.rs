//! # ACC Core
//!
//! Request routing between the surfaces of the excerpt collector and the
//! store that owns saved excerpts.
//!
//! ## Components
//!
//! - [`Router`] - dispatches [`Request`]s to an [`EntryStore`] and broadcasts
//!   [`Notification`]s after changes
//! - [`CaptureAgent`] - page-side helper that captures excerpts and submits
//!   them through the router
//!
//! [`Request`]: acc_protocols::Request
//! [`EntryStore`]: acc_protocols::EntryStore
//! [`Notification`]: acc_protocols::Notification

pub mod agent;
pub mod router;

pub use agent::CaptureAgent;
pub use router::Router;
