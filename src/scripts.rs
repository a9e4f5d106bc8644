//! Page bootstrap: what used to run on `DOMContentLoaded`.
//!
//! Components mount in a fixed order so that the auth validator and the chat
//! widget see a submission before the generic submit handler does.

use std::sync::Arc;

use tracing::info;

use crate::auth::AuthForms;
use crate::chat::{ChatTransport, ChatWidget, RecognitionConfig, SpeechCapability};
use crate::chrome::{ChromeSettings, PageChrome};
use crate::error::{DomError, DomResult};
use crate::page::{Mount, Page};

/// Everything the page scripts need besides the page itself.
#[derive(Debug, Clone)]
pub struct ScriptDeps {
    pub transport: Arc<dyn ChatTransport>,
    pub speech: SpeechCapability,
    pub recognition: RecognitionConfig,
    pub chrome: ChromeSettings,
}

/// The mounted page scripts.
#[derive(Debug)]
pub struct PageScripts {
    mounts: Vec<Mount>,
    chat: Option<ChatWidget>,
}

impl PageScripts {
    /// Mount auth, chat (when the page has a chat form) and chrome.
    pub fn mount(page: &Page, deps: ScriptDeps) -> DomResult<Self> {
        let mut mounts = vec![AuthForms::mount(page)?];

        let chat = match ChatWidget::new(page, deps.transport, deps.speech, deps.recognition) {
            Ok(widget) => {
                mounts.push(widget.mount()?);
                Some(widget)
            }
            Err(DomError::MissingElement(_)) => None,
            Err(other) => return Err(other),
        };

        mounts.push(PageChrome::mount(page, deps.chrome)?);

        info!(
            name: "page.scripts.mounted",
            listeners = page.listener_count(),
            chat = chat.is_some(),
            "Page scripts mounted"
        );
        Ok(Self { mounts, chat })
    }

    /// The chat widget, if the page has one.
    pub fn chat(&self) -> Option<&ChatWidget> {
        self.chat.as_ref()
    }

    /// Detach every listener.
    pub fn dispose(self) {
        for mount in self.mounts {
            mount.dispose();
        }
    }
}
