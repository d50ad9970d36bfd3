use super::*;

const PAGE: &str = r#"<html><head><title>Chat</title></head><body>
<div id="thread">
  <div class="message user">Question?</div>
  <div class="markdown-body" data-message-id="m-1"><p>First <b>answer</b></p></div>
  <div class="markdown-body" style="color: red;"><p>Second answer</p></div>
</div>
</body></html>"#;

fn selector(s: &str) -> Selector {
    Selector::parse(s).unwrap()
}

#[test]
fn test_select_in_document_order() {
    let page = HtmlPage::parse(PAGE);
    let nodes = page.select(&selector(".markdown-body"));
    assert_eq!(nodes.len(), 2);
    assert!(nodes[0].index() < nodes[1].index());
    assert_eq!(page.attr(nodes[0], "data-message-id").as_deref(), Some("m-1"));
}

#[test]
fn test_select_group_matches_once() {
    let page = HtmlPage::parse(PAGE);
    let nodes = page.select(&selector(".markdown-body, [data-message-id]"));
    assert_eq!(nodes.len(), 2);
}

#[test]
fn test_element_lookups() {
    let page = HtmlPage::parse(PAGE);
    let by_attr = page.element_by_attr("data-message-id", "m-1").unwrap();
    assert_eq!(page.tag_name(by_attr).as_deref(), Some("div"));

    let by_id = page.element_by_id("thread").unwrap();
    assert_eq!(page.attr(by_id, "id").as_deref(), Some("thread"));
    assert!(page.element_by_id("missing").is_none());
}

#[test]
fn test_text_nodes_skip_head() {
    let page = HtmlPage::parse(PAGE);
    let texts: Vec<String> = page.text_nodes().into_iter().map(|(_, t)| t).collect();
    assert!(texts.iter().any(|t| t == "answer"));
    assert!(!texts.iter().any(|t| t == "Chat"));
}

#[test]
fn test_parent_element_of_text() {
    let page = HtmlPage::parse(PAGE);
    let (node, _) = page
        .text_nodes()
        .into_iter()
        .find(|(_, t)| t == "answer")
        .unwrap();
    let parent = page.parent_element(node).unwrap();
    assert_eq!(page.tag_name(parent).as_deref(), Some("b"));
    let grandparent = page.parent_element(parent).unwrap();
    assert_eq!(page.tag_name(grandparent).as_deref(), Some("p"));
}

#[test]
fn test_inner_html() {
    let page = HtmlPage::parse(PAGE);
    let node = page.element_by_attr("data-message-id", "m-1").unwrap();
    assert_eq!(page.inner_html(node).unwrap(), "<p>First <b>answer</b></p>");
}

#[test]
fn test_highlight_overlay_and_style() {
    let mut page = HtmlPage::parse(PAGE);
    let nodes = page.select(&selector(".markdown-body"));
    let styled = nodes[1];

    assert_eq!(page.inline_style(styled).as_deref(), Some("color: red;"));
    assert!(page.set_highlighted(styled, true));
    assert!(page.is_highlighted(styled));
    let style = page.inline_style(styled).unwrap();
    assert!(style.starts_with("color: red; "));
    assert!(style.contains("background-color: #fef3c7"));

    assert!(page.set_highlighted(styled, false));
    assert!(!page.is_highlighted(styled));
    assert!(page.highlighted().is_empty());
}

#[test]
fn test_set_content_makes_handles_stale() {
    let mut page = HtmlPage::parse(PAGE);
    let node = page.element_by_id("thread").unwrap();
    assert!(page.set_highlighted(node, true));

    page.set_content("<html><body><div id=\"thread\"></div></body></html>");
    assert_eq!(page.revision(), 1);
    assert!(page.tag_name(node).is_none());
    assert!(!page.set_highlighted(node, false));
    assert!(!page.scroll_into_view(node));
    assert!(page.highlighted().is_empty());
    assert!(page.element_by_id("thread").is_some());
}

#[test]
fn test_scroll_into_view() {
    let mut page = HtmlPage::parse(PAGE);
    let node = page.element_by_id("thread").unwrap();
    assert!(page.scroll_into_view(node));
    assert_eq!(page.scrolled_to(), Some(node));
}

#[test]
fn test_describe() {
    let page = HtmlPage::parse(PAGE);
    let node = page.element_by_id("thread").unwrap();
    assert_eq!(page.describe(node), "<div id=\"thread\">");
}
