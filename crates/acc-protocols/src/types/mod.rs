//! Data model shared by the encoder, resolver and store.

mod anchor;
mod excerpt;

pub use anchor::*;
pub use excerpt::*;
