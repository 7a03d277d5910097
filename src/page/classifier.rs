use serde::Serialize;
use tracing::debug;

use crate::dom::document::NodeId;
use crate::host::page::HostPage;
use crate::page::origin::is_cross_origin_embed;

const URL_KEYWORDS: &[&str] = &[
    "checkout",
    "payment",
    "pay",
    "billing",
    "order",
    "purchase",
    "invoice",
    "subscribe",
];

const PROCESSOR_DOMAINS: &[&str] = &[
    "stripe.com",
    "paypal.com",
    "paypalobjects.com",
    "braintreepayments.com",
    "braintreegateway.com",
    "square.com",
    "squareup.com",
    "adyen.com",
    "checkout.com",
    "klarna.com",
    "razorpay.com",
    "mollie.com",
    "paystack.co",
    "mercadopago.com",
];

const FIELD_TERMS: &[&str] = &["card", "cc-", "cvv", "cvc", "expiry", "billing", "cardholder"];

const FIELD_ATTRIBUTES: &[&str] = &["name", "id", "placeholder", "aria-label"];

const FORM_CONTROLS: &[&str] = &["input", "select", "textarea"];

/// Which rule marked a page as sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "detail", rename_all = "camelCase")]
pub enum SensitiveSignal {
    UrlKeyword(String),
    ProcessorScript(String),
    PaymentField(String),
    CrossOriginFrame,
}

/// Fresh classification of the page as it is right now. Never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSignal {
    pub is_sensitive: bool,
    pub signal: Option<SensitiveSignal>,
}

/// Heuristic payment-page detector. First matching rule wins.
///
/// False positives and negatives are expected: this decides whether the
/// widget hides itself, it is not a privacy guarantee.
pub fn classify_page(page: &HostPage) -> PageSignal {
    let signal = url_keyword(page)
        .or_else(|| processor_script(page))
        .or_else(|| payment_field(page))
        .or_else(|| cross_origin_frame(page));

    if let Some(s) = &signal {
        debug!(signal = ?s, "page classified as sensitive");
    }

    PageSignal {
        is_sensitive: signal.is_some(),
        signal,
    }
}

pub fn is_likely_payment_page(page: &HostPage) -> bool {
    classify_page(page).is_sensitive
}

fn url_keyword(page: &HostPage) -> Option<SensitiveSignal> {
    let lower = page.location().as_str().to_lowercase();

    URL_KEYWORDS
        .iter()
        .find(|k| lower.contains(*k))
        .map(|k| SensitiveSignal::UrlKeyword(k.to_string()))
}

fn processor_script(page: &HostPage) -> Option<SensitiveSignal> {
    let doc = &page.document;

    doc.elements_by_tag("script").into_iter().find_map(|script| {
        let src = doc.attribute(script, "src")?.to_lowercase();
        PROCESSOR_DOMAINS
            .iter()
            .find(|d| src.contains(*d))
            .map(|d| SensitiveSignal::ProcessorScript(d.to_string()))
    })
}

fn payment_field(page: &HostPage) -> Option<SensitiveSignal> {
    let doc = &page.document;

    doc.elements()
        .into_iter()
        .filter(|n| {
            doc.tag(*n)
                .map(|t| FORM_CONTROLS.contains(&t))
                .unwrap_or(false)
        })
        .find_map(|n| matching_field_attribute(page, n))
}

fn matching_field_attribute(page: &HostPage, node: NodeId) -> Option<SensitiveSignal> {
    FIELD_ATTRIBUTES.iter().find_map(|attr| {
        let value = page.document.attribute(node, attr)?;
        let lower = value.to_lowercase();
        FIELD_TERMS
            .iter()
            .any(|t| lower.contains(t))
            .then(|| SensitiveSignal::PaymentField(value.to_string()))
    })
}

fn cross_origin_frame(page: &HostPage) -> Option<SensitiveSignal> {
    page.document
        .elements_by_tag("iframe")
        .into_iter()
        .any(|f| is_cross_origin_embed(page, f))
        .then_some(SensitiveSignal::CrossOriginFrame)
}
