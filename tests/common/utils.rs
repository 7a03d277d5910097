use std::sync::Arc;

use feedback_widget::dom::document::{Document, NodeId};
use feedback_widget::dom::geometry::Rect;
use feedback_widget::host::page::HostPage;
use feedback_widget::submit::transport::MockTransport;
use feedback_widget::widget::config::WidgetConfig;
use feedback_widget::widget::controller::WidgetController;
use url::Url;

pub fn fixture(name: &str) -> String {
    let base = std::env::current_dir().unwrap();
    let path = base.join("tests").join("fixtures").join(name);

    path.display().to_string()
}

/// `<html><head/><body/></html>` at `url`.
pub fn blank_page(url: &str) -> HostPage {
    let mut doc = Document::new();
    let html = doc.append_element(doc.root(), "html", &[]);
    doc.append_element(html, "head", &[]);
    doc.append_element(html, "body", &[]);
    HostPage::new(doc, Url::parse(url).unwrap())
}

pub fn body(page: &HostPage) -> NodeId {
    page.document.body().unwrap()
}

/// A docs page with a card holding a heading and a button.
pub struct CardPage {
    pub page: HostPage,
    pub card: NodeId,
    pub heading: NodeId,
    pub button: NodeId,
}

pub fn card_page() -> CardPage {
    let mut page = blank_page("https://docs.example.com/guide/intro");
    let body = body(&page);
    let doc = &mut page.document;

    let main = doc.append_element(body, "main", &[("id", "content")]);
    let card = doc.append_element(main, "div", &[("class", "card shadow")]);
    doc.set_rect(card, Rect::new(10.0, 20.0, 300.0, 120.0));
    let heading = doc.append_element(card, "h2", &[]);
    doc.append_text(heading, "Getting started");
    let button = doc.append_element(card, "button", &[("class", "cta")]);
    doc.append_text(button, "Install");
    doc.set_rect(button, Rect::new(20.0, 100.0, 80.0, 30.0));

    CardPage {
        page,
        card,
        heading,
        button,
    }
}

pub fn config() -> WidgetConfig {
    WidgetConfig::new("test-key")
}

/// Controller wired to a mock transport.
pub fn mount(
    config: WidgetConfig,
    page: &mut HostPage,
    transport: MockTransport,
) -> (WidgetController, Arc<MockTransport>) {
    let mock = Arc::new(transport);
    let controller = WidgetController::init_with_transport(config, page, mock.clone()).unwrap();
    (controller, mock)
}
