//! Rendering the message log into `#chatMessages`.

use std::fmt;

use crate::dom::{Document, Element, NodeId};

const USER_AVATAR: &str = r#"<i class="fas fa-user"></i>"#;
const BOT_AVATAR: &str = r#"<i class="fas fa-robot"></i>"#;

/// Height one rendered message adds to the log's scroll height.
const MESSAGE_HEIGHT: f64 = 64.0;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }

    fn message_class(self) -> &'static str {
        match self {
            Self::User => "user-message",
            Self::Bot => "bot-message",
        }
    }

    fn avatar(self) -> &'static str {
        match self {
            Self::User => USER_AVATAR,
            Self::Bot => BOT_AVATAR,
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the chat log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
        }
    }
}

/// Append a message block to the log.
///
/// The text is stored as text content and never parsed as markup.
pub fn append(doc: &mut Document, log: NodeId, message: &ChatMessage) -> NodeId {
    let block = doc.append(
        log,
        Element::new("div")
            .with_class("message")
            .with_class(message.sender.message_class()),
    );
    doc.append(
        block,
        Element::new("div")
            .with_class("message-avatar")
            .with_markup(message.sender.avatar()),
    );
    let content = doc.append(block, Element::new("div").with_class("message-content"));
    doc.append(content, Element::new("p").with_text(message.text.as_str()));
    doc[log].layout_mut().scroll_height += MESSAGE_HEIGHT;
    block
}

/// Read the rendered messages back in display order.
pub fn read(doc: &Document, log: NodeId) -> Vec<ChatMessage> {
    doc[log]
        .children()
        .iter()
        .filter_map(|&block| {
            let element = &doc[block];
            let sender = if element.has_class("user-message") {
                Sender::User
            } else if element.has_class("bot-message") {
                Sender::Bot
            } else {
                return None;
            };
            let text = element
                .children()
                .iter()
                .find(|&&c| doc[c].has_class("message-content"))
                .map(|&c| doc.text_content(c))
                .unwrap_or_default();
            Some(ChatMessage { text, sender })
        })
        .collect()
}

/// `log.scrollTop = log.scrollHeight`
pub fn scroll_to_bottom(doc: &mut Document, log: NodeId) {
    let layout = doc[log].layout_mut();
    layout.scroll_top = layout.scroll_height;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_is_rendered_as_text() {
        let mut doc = Document::new();
        let body = doc.body();
        let log = doc.append(body, Element::new("div").with_id("chatMessages"));

        append(&mut doc, log, &ChatMessage::user("<b>hi</b>"));
        append(&mut doc, log, &ChatMessage::bot("hello"));

        let block = doc[log].children()[0];
        assert_eq!(doc[block].class_name(), "message user-message");
        assert_eq!(
            read(&doc, log),
            vec![ChatMessage::user("<b>hi</b>"), ChatMessage::bot("hello")]
        );
        assert!(doc.query_within(log, "b").unwrap().is_none());
    }

    #[test]
    fn test_scroll_to_bottom() {
        let mut doc = Document::new();
        let body = doc.body();
        let log = doc.append(body, Element::new("div"));
        append(&mut doc, log, &ChatMessage::bot("one"));
        append(&mut doc, log, &ChatMessage::bot("two"));

        scroll_to_bottom(&mut doc, log);
        let layout = doc[log].layout();
        assert_eq!(layout.scroll_top, layout.scroll_height);
        assert!(layout.scroll_top > 0.0);
    }
}
