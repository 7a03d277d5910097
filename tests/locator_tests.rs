use feedback_widget::dom::document::Document;
use feedback_widget::dom::snapshot::{PageSnapshot, resolve_node_path};
use feedback_widget::locator::descriptor::{BREADCRUMB_DEPTH, describe_element, short_descriptor};
use feedback_widget::locator::xpath::{BODY_PATH, get_xpath};

mod common;
use crate::common::utils::{blank_page, body, card_page, fixture};

// ============================================================================
// Structural addresses
// ============================================================================

#[test]
fn body_has_fixed_address() {
    let page = blank_page("https://example.com/");
    assert_eq!(get_xpath(&page.document, body(&page)), BODY_PATH);
}

#[test]
fn document_element_is_addressed_by_tag() {
    let page = blank_page("https://example.com/");
    let html = page.document.document_element().unwrap();
    assert_eq!(get_xpath(&page.document, html), "html");
}

#[test]
fn same_tag_siblings_are_counted_one_based() {
    let mut page = blank_page("https://example.com/");
    let body = body(&page);
    let doc = &mut page.document;
    let list = doc.append_element(body, "ul", &[]);
    doc.append_element(list, "li", &[]);
    doc.append_text(list, "\n");
    doc.append_element(list, "li", &[]);
    let third = doc.append_element(list, "li", &[]);

    assert_eq!(get_xpath(doc, third), "/html/body/ul[1]/li[3]");
}

#[test]
fn other_tags_do_not_affect_the_index() {
    let mut page = blank_page("https://example.com/");
    let body = body(&page);
    let doc = &mut page.document;
    doc.append_element(body, "div", &[]);
    doc.append_element(body, "p", &[]);
    let second_div = doc.append_element(body, "div", &[]);

    assert_eq!(get_xpath(doc, second_div), "/html/body/div[2]");
}

#[test]
fn id_anchors_the_address() {
    let mut page = blank_page("https://example.com/");
    let body = body(&page);
    let doc = &mut page.document;
    let app = doc.append_element(body, "div", &[("id", "app")]);
    let wrapper = doc.append_element(app, "section", &[]);
    let span = doc.append_element(wrapper, "span", &[]);

    assert_eq!(get_xpath(doc, app), "//*[@id=\"app\"]");
    assert_eq!(get_xpath(doc, span), "//*[@id=\"app\"]/section[1]/span[1]");
}

#[test]
fn empty_id_is_ignored() {
    let mut page = blank_page("https://example.com/");
    let body = body(&page);
    let div = page.document.append_element(body, "div", &[("id", "")]);

    assert_eq!(get_xpath(&page.document, div), "/html/body/div[1]");
}

#[test]
fn id_on_body_wins_over_body_path() {
    let mut page = blank_page("https://example.com/");
    let body = body(&page);
    page.document.set_attribute(body, "id", "page");

    assert_eq!(get_xpath(&page.document, body), "//*[@id=\"page\"]");
}

#[test]
fn detached_element_is_just_its_tag() {
    let mut doc = Document::new();
    let orphan = doc.create_element("ARTICLE");
    assert_eq!(get_xpath(&doc, orphan), "article");
}

// ============================================================================
// Breadcrumbs
// ============================================================================

#[test]
fn breadcrumb_stops_at_id() {
    let fx = card_page();
    assert_eq!(
        describe_element(&fx.page.document, fx.button),
        "main#content > div.card > button.cta"
    );
}

#[test]
fn breadcrumb_uses_first_class_only() {
    let fx = card_page();
    assert_eq!(short_descriptor(&fx.page.document, fx.card), "div.card");
    assert_eq!(
        describe_element(&fx.page.document, fx.heading),
        "main#content > div.card > h2"
    );
}

#[test]
fn breadcrumb_is_capped() {
    let mut page = blank_page("https://example.com/");
    let mut parent = body(&page);
    for level in 0..6 {
        let class = format!("level-{}", level);
        parent = page
            .document
            .append_element(parent, "div", &[("class", class.as_str())]);
    }

    let crumb = describe_element(&page.document, parent);
    assert_eq!(crumb.split(" > ").count(), BREADCRUMB_DEPTH);
    assert_eq!(
        crumb,
        "div.level-2 > div.level-3 > div.level-4 > div.level-5"
    );
}

#[test]
fn breadcrumb_never_includes_body() {
    let mut page = blank_page("https://example.com/");
    let body = body(&page);
    let nav = page.document.append_element(body, "nav", &[]);

    assert_eq!(describe_element(&page.document, nav), "nav");
    assert_eq!(describe_element(&page.document, body), "body");
}

#[test]
fn short_descriptor_prefers_id() {
    let fx = card_page();
    let main = fx.page.document.parent(fx.card).unwrap();
    assert_eq!(short_descriptor(&fx.page.document, main), "main#content");
    assert_eq!(short_descriptor(&fx.page.document, fx.heading), "h2");
}

// ============================================================================
// Snapshot fixture
// ============================================================================

#[test]
fn fixture_button_address_and_breadcrumb() {
    let snapshot = PageSnapshot::load(&fixture("page.json")).unwrap();
    let doc = snapshot.to_document();
    let button = resolve_node_path(&doc, "1/1/0/3").unwrap();

    assert_eq!(doc.tag(button), Some("button"));
    assert_eq!(get_xpath(&doc, button), "/html/body/main[1]/section[1]/button[1]");
    assert_eq!(
        describe_element(&doc, button),
        "main.content > section.product > button.buy"
    );
}

#[test]
fn fixture_id_element_is_anchored() {
    let snapshot = PageSnapshot::load(&fixture("page.json")).unwrap();
    let doc = snapshot.to_document();
    let link = resolve_node_path(&doc, "1/0/0/0").unwrap();

    assert_eq!(get_xpath(&doc, link), "//*[@id=\"top\"]/nav[1]/a[1]");
    assert_eq!(describe_element(&doc, link), "header#top > nav > a");
}
