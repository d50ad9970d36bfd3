//! Error types for the ACC protocol layer.

mod anchor;
mod router;
mod store;

pub use anchor::*;
pub use router::*;
pub use store::*;
