//! # ACC Anchor
//!
//! Capture-time anchoring and visit-time re-location of saved excerpts.
//!
//! ## Flow
//!
//! ```text
//!  save:   node ──► Encoder ──► PositionDescriptor ──► #acc-… fragment
//!
//!  visit:  fragment ──► Resolver ──► StableId        (retried)
//!                                 ├► PositionalIndex (retried)
//!                                 └► TextFingerprint (once)
//!                                          │
//!                                          ▼
//!                                    Highlighter (self-reverting)
//! ```
//!
//! ## Key Components
//!
//! - [`Page`]: the DOM seam; [`HtmlPage`] implements it over parsed HTML
//! - [`enumerate_candidates`]: the one candidate ordering shared by save and visit
//! - [`Encoder`]: builds captures and descriptors
//! - [`Resolver`]: generation-tagged resolution chains
//! - [`Highlighter`]: token-guarded highlight effect
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use acc_anchor::{CandidateSelectors, HtmlPage, Resolver};
//! use acc_config::ResolverConfig;
//! use parking_lot::Mutex;
//!
//! #[tokio::main]
//! async fn main() {
//!     let page = Arc::new(Mutex::new(HtmlPage::parse("<body>…</body>")));
//!     let selectors = Arc::new(CandidateSelectors::standard().unwrap());
//!     let resolver = Resolver::new(page, selectors, &ResolverConfig::default());
//!     let resolution = resolver.resolve("#acc-index=2").await;
//!     println!("{:?}", resolution.outcome);
//! }
//! ```

pub mod candidates;
pub mod dom;
pub mod encoder;
pub mod fragment;
pub mod highlight;
pub mod resolver;
pub mod text;

pub use candidates::{enumerate_candidates, CandidateSelectors};
pub use dom::{HtmlPage, NodeHandle, Page, HIGHLIGHT_STYLE};
pub use encoder::{encode_anchor, is_user_message, Capture, Encoder, SELECTION_TAG};
pub use fragment::{encode_fragment, link_for, parse_fragment};
pub use highlight::{HighlightHandle, Highlighter};
pub use resolver::{
    find_by_fingerprint, AttemptOutcome, Outcome, Resolution, Resolver, ResolverState,
    RetryPolicy, Strategy,
};
pub use text::{extract_fingerprint, plain_text, strip_whitespace, text_fingerprint};
