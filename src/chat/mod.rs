//! Chat widget controller.
//!
//! Binds to `#chatForm`, `#userInput`, `#chatMessages`, `.send-btn`,
//! `#typingIndicator`, `.suggestion-btn` and `.chat-input`.
//!
//! # Flow
//!
//! 1. Submit reads the trimmed input. Empty input does nothing.
//! 2. The user message is appended and the input cleared.
//! 3. [`ChatWidget::exchange`] engages the loading state, sends the message
//!    through the [`ChatTransport`] and renders the reply, or the fallback
//!    message on any failure.
//! 4. The loading state is restored by a drop guard, so it is released on
//!    every exit path.
//!
//! There is no in-flight guard: a second submit while a request is pending
//! sends a second request. Overlaps are logged.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use docbot_web::chat::{ChatWidget, HttpChatTransport, RecognitionConfig, SpeechCapability};
//! use docbot_web::dialog::ScriptedDialogs;
//! use docbot_web::page::Page;
//! use docbot_web::pages;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let page = Page::new(pages::chat_page(), Arc::new(ScriptedDialogs::new()));
//! let transport = Arc::new(HttpChatTransport::new("http://127.0.0.1:5000", "/chatbot")?);
//! let widget = ChatWidget::new(&page, transport, SpeechCapability::Unsupported, RecognitionConfig::default())?;
//! let mount = widget.mount()?;
//!
//! widget.set_input("hello");
//! page.dispatch(widget.form(), docbot_web::dom::EventType::Submit);
//! page.run_until_idle().await;
//! mount.dispose();
//! # Ok(())
//! # }
//! ```

mod log;
mod speech;
mod transport;

pub use log::{ChatMessage, Sender};
pub use speech::{RecognitionConfig, SpeechCapability, SpeechRecognizer};
pub use transport::{ChatRequest, ChatResponse, ChatTransport, HttpChatTransport};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, warn};

use crate::dom::{Display, Document, Element, EventType, NodeId};
use crate::error::{ChatError, DomError, DomResult, SpeechError};
use crate::page::{Mount, Page};

/// Bot message shown when the request fails for any reason.
pub const FALLBACK_REPLY: &str = "Sorry, I'm having trouble responding. Please try again.";
/// Bot message shown when speech recognition is unavailable.
pub const VOICE_UNSUPPORTED: &str = "Voice recognition is not supported in your browser";

/// Suggestion labels rendered on the chatbot page.
pub const SUGGESTIONS: [&str; 3] = [
    "What files can I upload?",
    "Help with password",
    "Tell me about AI",
];

pub const SEND_ICON: &str = r#"<i class="fas fa-paper-plane"></i>"#;
pub const SPINNER_ICON: &str = r#"<i class="fas fa-spinner fa-spin"></i>"#;
pub const MIC_ICON: &str = r#"<i class="fas fa-microphone"></i>"#;
pub const MIC_OFF_ICON: &str = r#"<i class="fas fa-microphone-slash"></i>"#;

/// Text of the bot message for a failed capture.
pub fn voice_failed(error: &SpeechError) -> String {
    format!("Voice input failed: {}", error.code)
}

#[derive(Debug, Clone, Copy)]
struct ChatElements {
    form: NodeId,
    input: NodeId,
    log: NodeId,
    send_button: Option<NodeId>,
    typing: Option<NodeId>,
    voice_button: Option<NodeId>,
}

impl ChatElements {
    fn locate(doc: &Document) -> DomResult<Self> {
        let required = |id: &str| {
            doc.element_by_id(id)
                .ok_or_else(|| DomError::MissingElement(format!("#{id}")))
        };
        Ok(Self {
            form: required("chatForm")?,
            input: required("userInput")?,
            log: required("chatMessages")?,
            send_button: doc.query_selector(".send-btn")?,
            typing: doc.element_by_id("typingIndicator"),
            voice_button: None,
        })
    }
}

#[derive(Debug)]
struct WidgetInner {
    page: Page,
    elements: ChatElements,
    transport: Arc<dyn ChatTransport>,
    speech: SpeechCapability,
    recognition: RecognitionConfig,
    in_flight: AtomicUsize,
}

/// The chat widget bound to one page.
#[derive(Debug, Clone)]
pub struct ChatWidget {
    inner: Arc<WidgetInner>,
}

impl ChatWidget {
    /// Bind to the chat elements of `page`.
    ///
    /// When the page has a `.chat-input` container a voice button is added
    /// to it.
    pub fn new(
        page: &Page,
        transport: Arc<dyn ChatTransport>,
        speech: SpeechCapability,
        recognition: RecognitionConfig,
    ) -> DomResult<Self> {
        let elements = {
            let mut doc = page.document();
            let mut elements = ChatElements::locate(&doc)?;
            if let Some(container) = doc.query_selector(".chat-input")? {
                elements.voice_button = Some(doc.append(
                    container,
                    Element::new("button")
                        .with_class("voice-btn")
                        .with_attr("type", "button")
                        .with_attr("title", "Voice Input")
                        .with_markup(MIC_ICON),
                ));
            }
            elements
        };

        debug!(
            name: "chat.widget.bound",
            speech = speech.is_available(),
            "Chat widget bound"
        );

        Ok(Self {
            inner: Arc::new(WidgetInner {
                page: page.clone(),
                elements,
                transport,
                speech,
                recognition,
                in_flight: AtomicUsize::new(0),
            }),
        })
    }

    /// Attach the submit, suggestion and voice listeners.
    pub fn mount(&self) -> DomResult<Mount> {
        let page = &self.inner.page;
        let elements = self.inner.elements;
        let mut mount = Mount::new(page, "chat");

        let widget = self.clone();
        mount.listen(elements.form, EventType::Submit, move |page, event| {
            event.prevent_default();
            if let Some(message) = widget.take_input() {
                let widget = widget.clone();
                page.spawn(async move {
                    // The reply (or fallback) is rendered inside `exchange`.
                    let _ = widget.exchange(&message).await;
                });
            }
        });

        let suggestions = page.document().query_selector_all(".suggestion-btn")?;
        for button in suggestions {
            mount.listen(button, EventType::Click, move |page, _| {
                let mut doc = page.document();
                let label = doc.text_content(button);
                doc[elements.input].set_value(label);
                doc.focus(elements.input);
            });
        }

        if let Some(voice) = elements.voice_button {
            let widget = self.clone();
            mount.listen(voice, EventType::Click, move |page, _| {
                if widget.inner.speech.is_available() {
                    let widget = widget.clone();
                    page.spawn(async move {
                        let _ = widget.listen().await;
                    });
                } else {
                    widget.append(&ChatMessage::bot(VOICE_UNSUPPORTED));
                }
            });
        }

        Ok(mount)
    }

    /// Send one message and render the outcome.
    ///
    /// Engages the loading state for the duration of the request. On success
    /// the reply is appended as a bot message; on failure the fallback
    /// message is appended and the error returned.
    pub async fn exchange(&self, message: &str) -> Result<String, ChatError> {
        let _busy = BusyGuard::request(self);

        let result = self.inner.transport.send(message).await;
        match &result {
            Ok(reply) => self.append(&ChatMessage::bot(reply.as_str())),
            Err(error) => {
                warn!(
                    name: "chat.request.failed",
                    error = %error,
                    "Chatbot request failed"
                );
                self.append(&ChatMessage::bot(FALLBACK_REPLY));
            }
        }
        result
    }

    /// Run one speech capture session.
    ///
    /// Without speech support the unsupported message is appended and
    /// `Ok(None)` returned.
    pub async fn listen(&self) -> Result<Option<String>, SpeechError> {
        let recognizer = match &self.inner.speech {
            SpeechCapability::Available(recognizer) => Arc::clone(recognizer),
            SpeechCapability::Unsupported => {
                self.append(&ChatMessage::bot(VOICE_UNSUPPORTED));
                return Ok(None);
            }
        };

        let _busy = BusyGuard::capture(self);
        let outcome = recognizer.capture(&self.inner.recognition).await;
        match &outcome {
            Ok(Some(transcript)) => self.set_input(transcript.as_str()),
            Ok(None) => {}
            Err(error) => {
                warn!(
                    name: "chat.speech.failed",
                    code = %error.code,
                    "Speech recognition error"
                );
                self.append(&ChatMessage::bot(voice_failed(error)));
            }
        }
        outcome
    }

    /// Take the trimmed input and append it as a user message.
    ///
    /// Returns `None`, leaving the page untouched, when the input is blank.
    fn take_input(&self) -> Option<String> {
        let message = {
            let mut doc = self.inner.page.document();
            let input = &mut doc[self.inner.elements.input];
            let message = input.value().trim().to_string();
            if message.is_empty() {
                return None;
            }
            input.set_value("");
            log::append(&mut doc, self.inner.elements.log, &ChatMessage::user(message.as_str()));
            message
        };

        let pending = self.inner.in_flight.load(Ordering::SeqCst);
        if pending > 0 {
            warn!(
                name: "chat.request.overlap",
                pending,
                "Message submitted while a request is still in flight"
            );
        }
        Some(message)
    }

    fn append(&self, message: &ChatMessage) {
        let mut doc = self.inner.page.document();
        log::append(&mut doc, self.inner.elements.log, message);
    }

    /// Replace the input value.
    pub fn set_input(&self, value: impl Into<String>) {
        self.inner.page.document()[self.inner.elements.input].set_value(value);
    }

    pub fn input(&self) -> String {
        self.inner.page.document()[self.inner.elements.input]
            .value()
            .to_string()
    }

    /// Messages currently rendered in the log.
    pub fn messages(&self) -> Vec<ChatMessage> {
        log::read(&self.inner.page.document(), self.inner.elements.log)
    }

    /// Whether the loading affordances are showing.
    pub fn is_loading(&self) -> bool {
        let doc = self.inner.page.document();
        let elements = &self.inner.elements;
        elements
            .typing
            .is_some_and(|t| doc[t].display() == Display::Flex)
            || elements.send_button.is_some_and(|b| doc[b].is_disabled())
    }

    /// Requests sent and not yet settled.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    pub fn form(&self) -> NodeId {
        self.inner.elements.form
    }

    pub fn voice_button(&self) -> Option<NodeId> {
        self.inner.elements.voice_button
    }
}

fn set_loading(doc: &mut Document, elements: &ChatElements, loading: bool) {
    if let Some(typing) = elements.typing {
        doc[typing].set_display(if loading { Display::Flex } else { Display::None });
    }
    if let Some(button) = elements.send_button {
        let button = &mut doc[button];
        button.set_disabled(loading);
        button.set_markup(if loading { SPINNER_ICON } else { SEND_ICON });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BusyKind {
    Request,
    Capture,
}

/// Holds the loading state for one request or capture session and restores
/// it on drop.
#[derive(Debug)]
struct BusyGuard {
    widget: ChatWidget,
    kind: BusyKind,
}

impl BusyGuard {
    fn request(widget: &ChatWidget) -> Self {
        widget.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        Self::engage(widget, BusyKind::Request)
    }

    fn capture(widget: &ChatWidget) -> Self {
        Self::engage(widget, BusyKind::Capture)
    }

    fn engage(widget: &ChatWidget, kind: BusyKind) -> Self {
        let elements = widget.inner.elements;
        let mut doc = widget.inner.page.document();
        set_loading(&mut doc, &elements, true);
        if kind == BusyKind::Capture {
            if let Some(voice) = elements.voice_button {
                doc[voice].set_markup(MIC_OFF_ICON);
                doc[voice].add_class("listening");
            }
        }
        Self {
            widget: widget.clone(),
            kind,
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let inner = &self.widget.inner;
        let elements = inner.elements;
        let mut doc = inner.page.document();
        set_loading(&mut doc, &elements, false);
        match self.kind {
            BusyKind::Request => {
                inner.in_flight.fetch_sub(1, Ordering::SeqCst);
                log::scroll_to_bottom(&mut doc, elements.log);
            }
            BusyKind::Capture => {
                if let Some(voice) = elements.voice_button {
                    doc[voice].set_markup(MIC_ICON);
                    doc[voice].remove_class("listening");
                }
            }
        }
    }
}
