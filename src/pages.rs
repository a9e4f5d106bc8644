//! Page skeletons honouring the element ids and classes the scripts bind to.
//!
//! These stand in for the server-rendered templates: the CLI drives them and
//! the tests use them as fixtures.

use crate::chat::{SEND_ICON, SUGGESTIONS};
use crate::dom::{Display, Document, Element, NodeId};

/// Height of the sticky site header.
pub const HEADER_HEIGHT: f64 = 80.0;

/// Site header with the mobile navigation.
///
/// Returns the `.burger` and `.nav-links` nodes.
pub fn site_header(doc: &mut Document) -> (NodeId, NodeId) {
    let body = doc.body();
    let header = doc.append(body, Element::new("header").with_class("navbar"));
    let nav = doc.append(header, Element::new("nav"));
    let links = doc.append(nav, Element::new("ul").with_class("nav-links"));
    for (href, label) in [
        ("/", "Home"),
        ("/about", "About"),
        ("/chatbot", "Chatbot"),
        ("/file_upload", "Upload"),
        ("/contact", "Contact"),
    ] {
        let item = doc.append(links, Element::new("li"));
        doc.append(
            item,
            Element::new("a")
                .with_class("nav-link")
                .with_attr("href", href)
                .with_text(label),
        );
    }
    let burger = doc.append(nav, Element::new("div").with_class("burger"));
    for line in ["line1", "line2", "line3"] {
        doc.append(burger, Element::new("div").with_class(line));
    }
    (burger, links)
}

/// Login page: `.auth-form` with username and password.
pub fn login_page() -> Document {
    let mut doc = Document::new();
    site_header(&mut doc);
    let body = doc.body();
    let form = doc.append(
        body,
        Element::new("form")
            .with_class("auth-form")
            .with_attr("method", "post")
            .with_attr("action", "/login"),
    );
    text_input(&mut doc, form, "username", "text");
    text_input(&mut doc, form, "password", "password");
    doc.append(
        form,
        Element::new("a")
            .with_class("forgot-password")
            .with_attr("href", "#")
            .with_text("Forgot password?"),
    );
    submit_button(&mut doc, form, "Login");
    doc
}

/// Signup page: `.auth-form` with username, email and both passwords.
pub fn signup_page() -> Document {
    let mut doc = Document::new();
    site_header(&mut doc);
    let body = doc.body();
    let form = doc.append(
        body,
        Element::new("form")
            .with_class("auth-form")
            .with_attr("method", "post")
            .with_attr("action", "/signup"),
    );
    text_input(&mut doc, form, "username", "text");
    text_input(&mut doc, form, "email", "email");
    text_input(&mut doc, form, "password", "password");
    text_input(&mut doc, form, "confirm_password", "password");
    submit_button(&mut doc, form, "Sign Up");
    doc
}

/// Chatbot page with the default suggestion buttons.
pub fn chat_page() -> Document {
    chat_page_with(&SUGGESTIONS)
}

/// Chatbot page with the given suggestion labels.
pub fn chat_page_with(suggestions: &[&str]) -> Document {
    let mut doc = Document::new();
    site_header(&mut doc);
    let body = doc.body();
    let container = doc.append(body, Element::new("div").with_class("chat-container"));
    doc.append(
        container,
        Element::new("div")
            .with_id("chatMessages")
            .with_class("chat-messages"),
    );
    let typing = doc.append(
        container,
        Element::new("div")
            .with_id("typingIndicator")
            .with_class("typing-indicator")
            .with_display(Display::None),
    );
    for _ in 0..3 {
        doc.append(typing, Element::new("span"));
    }

    let row = doc.append(container, Element::new("div").with_class("suggestions"));
    for label in suggestions {
        doc.append(
            row,
            Element::new("button")
                .with_class("suggestion-btn")
                .with_attr("type", "button")
                .with_text(*label),
        );
    }

    let form = doc.append(container, Element::new("form").with_id("chatForm"));
    let input_row = doc.append(form, Element::new("div").with_class("chat-input"));
    doc.append(
        input_row,
        Element::new("input")
            .with_id("userInput")
            .with_attr("type", "text")
            .with_attr("placeholder", "Type your message..."),
    );
    doc.append(
        input_row,
        Element::new("button")
            .with_class("send-btn")
            .with_attr("type", "submit")
            .with_markup(SEND_ICON),
    );
    doc
}

/// Landing page with in-page anchors and scroll-animated sections.
pub fn landing_page() -> Document {
    let mut doc = Document::new();
    site_header(&mut doc);
    let body = doc.body();
    doc.append(
        body,
        Element::new("div")
            .with_id("loading")
            .with_class("loading-screen"),
    );

    let hero = doc.append(
        body,
        Element::new("section")
            .with_id("hero")
            .with_class("hero animate__animated")
            .with_attr("data-animate", "animate__fadeIn")
            .with_offset_top(100.0),
    );
    doc.append(
        hero,
        Element::new("div")
            .with_class("floating")
            .with_offset_top(200.0),
    );
    for (href, label) in [
        ("#", "Top"),
        ("#features", "Features"),
        ("#about", "About"),
    ] {
        doc.append(
            hero,
            Element::new("a")
                .with_class("btn")
                .with_attr("href", href)
                .with_text(label),
        );
    }

    for (id, offset, animation) in [
        ("features", 900.0, "animate__fadeInUp"),
        ("about", 1800.0, "animate__fadeInLeft"),
    ] {
        doc.append(
            body,
            Element::new("section")
                .with_id(id)
                .with_class("animate__animated")
                .with_attr("data-animate", animation)
                .with_offset_top(offset),
        );
    }
    doc
}

fn text_input(doc: &mut Document, form: NodeId, id: &str, kind: &str) -> NodeId {
    let group = doc.append(form, Element::new("div").with_class("form-group"));
    doc.append(
        group,
        Element::new("input")
            .with_id(id)
            .with_attr("name", id)
            .with_attr("type", kind),
    )
}

fn submit_button(doc: &mut Document, form: NodeId, label: &str) -> NodeId {
    doc.append(
        form,
        Element::new("button")
            .with_class("btn btn-primary")
            .with_attr("type", "submit")
            .with_text(label),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_page_contract() {
        let doc = chat_page();
        for selector in [
            "#chatForm",
            "#userInput",
            "#chatMessages",
            ".send-btn",
            "#typingIndicator",
            ".chat-input",
            ".burger",
            ".nav-links",
        ] {
            assert!(
                doc.query_selector(selector).unwrap().is_some(),
                "{selector} missing"
            );
        }
        assert_eq!(
            doc.query_selector_all(".suggestion-btn").unwrap().len(),
            SUGGESTIONS.len()
        );
    }

    #[test]
    fn test_signup_page_has_email() {
        let doc = signup_page();
        let form = doc.query_selector(".auth-form").unwrap().unwrap();
        assert!(doc.query_within(form, "#email").unwrap().is_some());

        let doc = login_page();
        let form = doc.query_selector(".auth-form").unwrap().unwrap();
        assert!(doc.query_within(form, "#email").unwrap().is_none());
    }
}
