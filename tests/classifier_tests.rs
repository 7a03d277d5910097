use feedback_widget::dom::document::FrameAccess;
use feedback_widget::dom::snapshot::PageSnapshot;
use feedback_widget::host::page::HostPage;
use feedback_widget::page::classifier::{SensitiveSignal, classify_page, is_likely_payment_page};
use feedback_widget::page::embeds::get_embeds;
use feedback_widget::page::origin::is_cross_origin_embed;

mod common;
use crate::common::utils::{blank_page, body, fixture};

// ============================================================================
// Sensitive page classification
// ============================================================================

#[test]
fn plain_page_is_not_sensitive() {
    let page = blank_page("https://docs.example.com/guide/intro");
    let signal = classify_page(&page);

    assert!(!signal.is_sensitive);
    assert_eq!(signal.signal, None);
    assert!(!is_likely_payment_page(&page));
}

#[test]
fn url_keyword_marks_page_sensitive() {
    let page = blank_page("https://shop.example.com/checkout/step-1");
    assert_eq!(
        classify_page(&page).signal,
        Some(SensitiveSignal::UrlKeyword("checkout".into()))
    );
}

#[test]
fn url_keyword_match_is_case_insensitive() {
    let page = blank_page("https://shop.example.com/Account/BILLING");
    assert!(is_likely_payment_page(&page));
}

#[test]
fn processor_script_marks_page_sensitive() {
    let mut page = blank_page("https://shop.example.com/cart");
    let head = page.document.elements_by_tag("head")[0];
    page.document
        .append_element(head, "script", &[("src", "https://js.stripe.com/v3/")]);

    assert_eq!(
        classify_page(&page).signal,
        Some(SensitiveSignal::ProcessorScript("stripe.com".into()))
    );
}

#[test]
fn inline_script_is_ignored() {
    let mut page = blank_page("https://shop.example.com/cart");
    let body = body(&page);
    let script = page.document.append_element(body, "script", &[]);
    page.document.append_text(script, "loadStripe('https://js.stripe.com')");

    assert!(!is_likely_payment_page(&page));
}

#[test]
fn payment_field_marks_page_sensitive() {
    let mut page = blank_page("https://shop.example.com/cart");
    let body = body(&page);
    let form = page.document.append_element(body, "form", &[]);
    page.document
        .append_element(form, "input", &[("type", "text"), ("name", "cardNumber")]);

    assert_eq!(
        classify_page(&page).signal,
        Some(SensitiveSignal::PaymentField("cardNumber".into()))
    );
}

#[test]
fn payment_terms_on_non_form_elements_do_not_count() {
    let mut page = blank_page("https://shop.example.com/cart");
    let body = body(&page);
    page.document
        .append_element(body, "div", &[("id", "card-list"), ("aria-label", "Saved cards")]);

    assert!(!is_likely_payment_page(&page));
}

#[test]
fn placeholder_and_aria_label_are_checked() {
    let mut page = blank_page("https://shop.example.com/cart");
    let body = body(&page);
    page.document
        .append_element(body, "input", &[("placeholder", "CVV")]);

    assert!(matches!(
        classify_page(&page).signal,
        Some(SensitiveSignal::PaymentField(v)) if v == "CVV"
    ));
}

#[test]
fn cross_origin_iframe_marks_page_sensitive() {
    let mut page = blank_page("https://shop.example.com/cart");
    let body = body(&page);
    page.document
        .append_element(body, "iframe", &[("src", "https://maps.other.net/embed")]);

    assert_eq!(
        classify_page(&page).signal,
        Some(SensitiveSignal::CrossOriginFrame)
    );
}

#[test]
fn url_rule_wins_over_later_rules() {
    let mut page = blank_page("https://shop.example.com/payment");
    let body = body(&page);
    page.document
        .append_element(body, "input", &[("name", "cc-number")]);

    assert_eq!(
        classify_page(&page).signal,
        Some(SensitiveSignal::UrlKeyword("payment".into()))
    );
}

#[test]
fn classification_reflects_current_dom() {
    let mut page = blank_page("https://shop.example.com/cart");
    assert!(!is_likely_payment_page(&page));

    let body = body(&page);
    let field = page.document.append_element(body, "input", &[("name", "cvc")]);
    assert!(is_likely_payment_page(&page));

    page.document.detach(field);
    assert!(!is_likely_payment_page(&page));
}

// ============================================================================
// Cross-origin embed detection
// ============================================================================

fn embed_page() -> HostPage {
    blank_page("https://shop.example.com/products")
}

#[test]
fn same_origin_relative_iframe_is_not_cross_origin() {
    let mut page = embed_page();
    let body = body(&page);
    let frame = page.document.append_element(body, "iframe", &[("src", "/widgets/map")]);

    assert!(!is_cross_origin_embed(&page, frame));
}

#[test]
fn about_blank_and_javascript_frames_share_the_page_origin() {
    let mut page = blank_page("https://docs.example.com/guide");
    let body = body(&page);
    let blank = page.document.append_element(body, "iframe", &[("src", "about:blank")]);
    let script = page
        .document
        .append_element(body, "iframe", &[("src", "javascript:void(0)")]);
    let inline = page
        .document
        .append_element(body, "iframe", &[("srcdoc", "<p>ad slot</p>")]);

    assert!(!is_cross_origin_embed(&page, blank));
    assert!(!is_cross_origin_embed(&page, script));
    assert!(!is_cross_origin_embed(&page, inline));
    assert!(!is_likely_payment_page(&page));
}

#[test]
fn data_url_frame_stays_cross_origin() {
    let mut page = blank_page("https://docs.example.com/guide");
    let body = body(&page);
    let frame = page
        .document
        .append_element(body, "iframe", &[("src", "data:text/html,<p>hi</p>")]);

    assert!(is_cross_origin_embed(&page, frame));
}

#[test]
fn blocked_frame_is_cross_origin_even_with_same_origin_src() {
    let mut page = embed_page();
    let body = body(&page);
    let frame = page.document.append_element(body, "iframe", &[("src", "/widgets/map")]);
    page.document.set_frame_access(frame, FrameAccess::Blocked);

    assert!(is_cross_origin_embed(&page, frame));
}

#[test]
fn accessible_frame_is_not_cross_origin() {
    let mut page = embed_page();
    let body = body(&page);
    let frame = page
        .document
        .append_element(body, "iframe", &[("src", "https://other.net/")]);
    page.document.set_frame_access(frame, FrameAccess::Accessible);

    assert!(!is_cross_origin_embed(&page, frame));
}

#[test]
fn embed_and_object_compare_origins() {
    let mut page = embed_page();
    let body = body(&page);
    let video = page
        .document
        .append_element(body, "embed", &[("src", "https://media.example.net/clip.mp4")]);
    let pdf = page
        .document
        .append_element(body, "object", &[("data", "/files/manual.pdf")]);

    assert!(is_cross_origin_embed(&page, video));
    assert!(!is_cross_origin_embed(&page, pdf));
}

#[test]
fn embed_without_source_is_not_cross_origin() {
    let mut page = embed_page();
    let body = body(&page);
    let frame = page.document.append_element(body, "iframe", &[]);

    assert!(!is_cross_origin_embed(&page, frame));
}

#[test]
fn unparseable_source_counts_as_cross_origin() {
    let mut page = embed_page();
    let body = body(&page);
    let frame = page.document.append_element(body, "embed", &[("src", "http://[::1")]);

    assert!(is_cross_origin_embed(&page, frame));
}

#[test]
fn non_embed_elements_are_never_cross_origin() {
    let mut page = embed_page();
    let body = body(&page);
    let img = page
        .document
        .append_element(body, "img", &[("src", "https://cdn.other.net/a.png")]);

    assert!(!is_cross_origin_embed(&page, img));
}

// ============================================================================
// Embed listing
// ============================================================================

#[test]
fn page_without_embeds() {
    let report = get_embeds(&embed_page());
    assert!(!report.has_embeds);
    assert!(report.embed_hostnames.is_empty());
}

#[test]
fn embed_hostnames_are_deduplicated_in_document_order() {
    let mut page = embed_page();
    let body = body(&page);
    let doc = &mut page.document;
    doc.append_element(body, "iframe", &[("src", "https://www.youtube.com/embed/a")]);
    doc.append_element(body, "object", &[("data", "/docs/terms.pdf")]);
    doc.append_element(body, "iframe", &[("src", "https://www.youtube.com/embed/b")]);
    doc.append_element(body, "embed", &[("src", "https://player.vimeo.com/v/1")]);

    let report = get_embeds(&page);
    assert!(report.has_embeds);
    assert_eq!(
        report.embed_hostnames,
        vec!["www.youtube.com", "shop.example.com", "player.vimeo.com"]
    );
}

#[test]
fn sourceless_embed_counts_but_has_no_hostname() {
    let mut page = embed_page();
    let body = body(&page);
    page.document.append_element(body, "iframe", &[("srcdoc", "<p>hi</p>")]);

    let report = get_embeds(&page);
    assert!(report.has_embeds);
    assert!(report.embed_hostnames.is_empty());
}

#[test]
fn embed_report_uses_camel_case_keys() {
    let json = serde_json::to_value(get_embeds(&embed_page())).unwrap();
    assert_eq!(json["hasEmbeds"], false);
    assert!(json["embedHostnames"].as_array().unwrap().is_empty());
}

// ============================================================================
// Snapshot fixture
// ============================================================================

#[test]
fn fixture_page_is_not_sensitive_and_lists_embeds() {
    let snapshot = PageSnapshot::load(&fixture("page.json")).unwrap();
    let page = HostPage::from_snapshot(&snapshot).unwrap();

    assert!(!is_likely_payment_page(&page));

    let report = get_embeds(&page);
    assert!(report.has_embeds);
    assert_eq!(
        report.embed_hostnames,
        vec!["media.example.net", "shop.example.com"]
    );
}
