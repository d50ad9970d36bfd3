//! Candidate assistant-message enumeration.
//!
//! Positional anchors are ranks in this list, so save time and resolve time
//! must enumerate through the same function with the same selectors.

use scraper::Selector;

use acc_protocols::AnchorError;

use crate::dom::{NodeHandle, Page};

/// Ordered selector set identifying assistant messages.
#[derive(Debug, Clone)]
pub struct CandidateSelectors {
    sources: Vec<String>,
    group: Selector,
}

impl CandidateSelectors {
    /// Compile a selector list. Each entry is validated on its own so errors
    /// name the offending selector.
    pub fn new<I, S>(sources: I) -> Result<Self, AnchorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sources: Vec<String> = sources.into_iter().map(Into::into).collect();
        if sources.is_empty() {
            return Err(AnchorError::InvalidSelector(
                "at least one candidate selector is required".to_string(),
            ));
        }
        for source in &sources {
            Selector::parse(source)
                .map_err(|e| AnchorError::InvalidSelector(format!("{source}: {e:?}")))?;
        }
        let joined = sources.join(", ");
        let group = Selector::parse(&joined)
            .map_err(|e| AnchorError::InvalidSelector(format!("{joined}: {e:?}")))?;
        Ok(Self { sources, group })
    }

    /// The built-in selector set for common chat UIs.
    pub fn standard() -> Result<Self, AnchorError> {
        Self::new(acc_config::default_candidates())
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// All selectors as one group, matching the union in document order.
    pub fn group(&self) -> &Selector {
        &self.group
    }
}

/// Every candidate on the page, in document order.
pub fn enumerate_candidates<P: Page + ?Sized>(
    page: &P,
    selectors: &CandidateSelectors,
) -> Vec<NodeHandle> {
    page.select(selectors.group())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlPage;

    #[test]
    fn test_standard_selectors_compile() {
        let selectors = CandidateSelectors::standard().unwrap();
        assert_eq!(selectors.sources().len(), 5);
    }

    #[test]
    fn test_invalid_selector_is_named() {
        let err = CandidateSelectors::new([".ok", "[[broken"]).unwrap_err();
        match err {
            AnchorError::InvalidSelector(msg) => assert!(msg.contains("[[broken")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_selector_list_rejected() {
        assert!(CandidateSelectors::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_enumeration_follows_document_order_not_selector_order() {
        let page = HtmlPage::parse(
            r#"<body>
                <div class="markdown-body" id="a"></div>
                <div class="ds-markdown" id="b"></div>
                <div data-message-author-role="assistant" id="c"></div>
                <div class="message assistant" id="d"></div>
                <div class="message user" id="e"></div>
            </body>"#,
        );
        let selectors = CandidateSelectors::standard().unwrap();
        let ids: Vec<String> = enumerate_candidates(&page, &selectors)
            .into_iter()
            .filter_map(|n| page.attr(n, "id"))
            .collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_node_matching_several_selectors_counted_once() {
        let page = HtmlPage::parse(
            r#"<body><div class="ds-markdown markdown-body assistant-message"></div></body>"#,
        );
        let selectors = CandidateSelectors::standard().unwrap();
        assert_eq!(enumerate_candidates(&page, &selectors).len(), 1);
    }
}
