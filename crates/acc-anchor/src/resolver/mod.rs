//! Anchor resolver.
//!
//! Decodes a fragment, locates the anchored node with the strategy its
//! descriptor calls for, and highlights it. Strategies never fall through to
//! a weaker one; misses on stable ids and ranks are retried on a fixed delay
//! because chat UIs render messages lazily.
//!
//! Each navigation starts a chain tagged with a fresh generation. A chain
//! that sees a newer generation at one of its checkpoints stops without
//! touching the page.

mod state;

pub use state::{AttemptOutcome, Outcome, Resolution, ResolverState, RetryPolicy, Strategy};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use acc_config::ResolverConfig;
use acc_protocols::PositionDescriptor;

use crate::candidates::{enumerate_candidates, CandidateSelectors};
use crate::dom::{NodeHandle, Page};
use crate::encoder::MESSAGE_ID_ATTR;
use crate::fragment::parse_fragment;
use crate::highlight::Highlighter;
use crate::text::strip_whitespace;

/// Text nodes whose stripped text is shorter than this are never matched.
const MIN_TEXT_NODE_CHARS: usize = 5;
/// How far a fingerprint match climbs out of inline wrappers.
const MAX_INLINE_CLIMB: usize = 3;
const INLINE_TAGS: [&str; 4] = ["span", "b", "strong", "code"];

/// Locates anchored nodes on a shared page.
pub struct Resolver<P: Page> {
    page: Arc<Mutex<P>>,
    selectors: Arc<CandidateSelectors>,
    policy: RetryPolicy,
    highlighter: Highlighter<P>,

    /// Latest navigation; chains compare their own tag against it.
    generation: Arc<AtomicU64>,

    /// State of the latest chain.
    state: Arc<Mutex<ResolverState>>,
}

impl<P: Page> Clone for Resolver<P> {
    fn clone(&self) -> Self {
        Self {
            page: self.page.clone(),
            selectors: self.selectors.clone(),
            policy: self.policy,
            highlighter: self.highlighter.clone(),
            generation: self.generation.clone(),
            state: self.state.clone(),
        }
    }
}

impl<P: Page> Resolver<P> {
    pub fn new(
        page: Arc<Mutex<P>>,
        selectors: Arc<CandidateSelectors>,
        config: &ResolverConfig,
    ) -> Self {
        let highlighter = Highlighter::new(page.clone(), config.highlight_duration());
        Self {
            page,
            selectors,
            policy: RetryPolicy::from(config),
            highlighter,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(Mutex::new(ResolverState::Idle)),
        }
    }

    pub fn page(&self) -> &Arc<Mutex<P>> {
        &self.page
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn highlighter(&self) -> &Highlighter<P> {
        &self.highlighter
    }

    /// Generation of the latest navigation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> ResolverState {
        *self.state.lock()
    }

    /// Start resolving `fragment` in the background, superseding any chain
    /// still in flight.
    pub fn navigate(&self, fragment: impl Into<String>) -> JoinHandle<Resolution> {
        let generation = self.next_generation();
        let fragment = fragment.into();
        let this = self.clone();
        tokio::spawn(async move { this.run(generation, &fragment).await })
    }

    /// Resolve `fragment` on the current task. Supersedes earlier chains
    /// exactly like [`Resolver::navigate`].
    pub async fn resolve(&self, fragment: &str) -> Resolution {
        let generation = self.next_generation();
        self.run(generation, fragment).await
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Record `state` for the chain `generation`, unless it was superseded.
    ///
    /// The generation is checked under the state lock. A newer chain bumps
    /// the generation before its first write, so a stale write can no longer
    /// land after it.
    fn set_state(&self, generation: u64, state: ResolverState) {
        let mut current = self.state.lock();
        if self.is_current(generation) {
            *current = state;
        }
    }

    async fn run(&self, generation: u64, fragment: &str) -> Resolution {
        self.set_state(generation, ResolverState::Decoding);

        let descriptor = match parse_fragment(fragment) {
            Ok(Some(descriptor)) => descriptor,
            Ok(None) => {
                debug!(generation, "No anchor in fragment");
                self.set_state(generation, ResolverState::Idle);
                return Resolution::new(generation, Outcome::NoAnchor);
            }
            Err(e) => {
                warn!(generation, fragment, error = %e, "Ignoring malformed anchor");
                self.set_state(generation, ResolverState::Idle);
                return Resolution::new(generation, Outcome::Malformed(e.to_string()));
            }
        };

        let strategy = Strategy::for_descriptor(&descriptor);
        let budget = self.policy.budget(strategy);
        let mut report = Resolution::new(generation, Outcome::Superseded);
        report.strategy = Some(strategy);

        loop {
            let attempt = {
                let mut page = self.page.lock();
                if !self.is_current(generation) {
                    debug!(generation, attempts = report.attempts, "Chain superseded");
                    return report;
                }
                self.set_state(generation, ResolverState::Locating);
                report.attempts += 1;
                let attempt = self.attempt(&*page, &descriptor);
                debug!(generation, %strategy, attempt = report.attempts, ?attempt, "Lookup");
                if let AttemptOutcome::Found(node) = attempt {
                    info!(generation, %strategy, target = %page.describe(node), "Anchor found");
                    self.highlighter.apply(&mut page, node);
                }
                attempt
            };

            match attempt {
                AttemptOutcome::Found(node) => {
                    self.set_state(generation, ResolverState::Found);
                    report.outcome = Outcome::Found;
                    report.target = Some(node);
                    return report;
                }
                AttemptOutcome::NotFound => {
                    debug!(generation, %strategy, "Anchor not found");
                    self.set_state(generation, ResolverState::GaveUp);
                    report.outcome = Outcome::NotFound;
                    return report;
                }
                AttemptOutcome::NotYetRendered if report.attempts >= budget => {
                    debug!(generation, %strategy, attempts = report.attempts, "Giving up");
                    self.set_state(generation, ResolverState::GaveUp);
                    report.outcome = Outcome::GaveUp;
                    return report;
                }
                AttemptOutcome::NotYetRendered => {
                    self.set_state(generation, ResolverState::Retrying);
                    tokio::time::sleep(self.policy.retry_delay).await;
                }
            }
        }
    }

    /// One synchronous lookup against the locked page.
    fn attempt(&self, page: &P, descriptor: &PositionDescriptor) -> AttemptOutcome {
        match descriptor {
            PositionDescriptor::StableId(id) => page
                .element_by_attr(MESSAGE_ID_ATTR, id)
                .or_else(|| page.element_by_id(id))
                .map_or(AttemptOutcome::NotYetRendered, AttemptOutcome::Found),
            PositionDescriptor::PositionalIndex(index) => {
                enumerate_candidates(page, &self.selectors)
                    .get(*index)
                    .copied()
                    .map_or(AttemptOutcome::NotYetRendered, AttemptOutcome::Found)
            }
            PositionDescriptor::TextFingerprint(fingerprint) => {
                find_by_fingerprint(page, fingerprint)
                    .map_or(AttemptOutcome::NotFound, AttemptOutcome::Found)
            }
        }
    }
}

/// First text node containing the fingerprint, lifted out of inline wrappers.
///
/// Whitespace is ignored on both sides. The first match in document order
/// wins even if a later node would match better.
pub fn find_by_fingerprint<P: Page + ?Sized>(page: &P, fingerprint: &str) -> Option<NodeHandle> {
    let needle = strip_whitespace(fingerprint);
    if needle.is_empty() {
        return None;
    }

    page.text_nodes().into_iter().find_map(|(node, text)| {
        let stripped = strip_whitespace(&text);
        if stripped.chars().count() < MIN_TEXT_NODE_CHARS || !stripped.contains(&needle) {
            return None;
        }
        lift_out_of_inline(page, page.parent_element(node)?)
    })
}

fn lift_out_of_inline<P: Page + ?Sized>(page: &P, mut target: NodeHandle) -> Option<NodeHandle> {
    for _ in 0..MAX_INLINE_CLIMB {
        let inline = page
            .tag_name(target)
            .is_some_and(|tag| INLINE_TAGS.contains(&tag.as_str()));
        if !inline {
            break;
        }
        target = page.parent_element(target)?;
    }
    Some(target)
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
