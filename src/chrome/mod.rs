//! Page-chrome controller.
//!
//! Every behaviour is a stateless event-to-action mapping:
//!
//! - burger click toggles the mobile menu, nav-link click closes it
//! - in-page anchors scroll smoothly, offset by the header height
//! - `.animate__animated` elements get their `data-animate` class once they
//!   come within the reveal margin of the viewport bottom
//! - the password strength meter follows every keystroke
//! - the confirm field carries a validity message while it differs
//! - any form submission disables its submit button

pub mod forms;
pub mod nav;
pub mod scroll;
pub mod strength;

pub use strength::{Strength, StrengthMeter, classify, score};

use crate::config::ChromeConfig;
use crate::dom::{EventTarget, EventType};
use crate::error::DomResult;
use crate::page::{Mount, Page};
use crate::pages::HEADER_HEIGHT;

/// Distance above the viewport bottom at which elements reveal.
pub const REVEAL_MARGIN: f64 = 100.0;

/// Tunables for the chrome behaviours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeSettings {
    /// Subtracted from anchor targets so they clear the sticky header.
    pub header_offset: f64,
    /// See [`REVEAL_MARGIN`].
    pub reveal_margin: f64,
}

impl Default for ChromeSettings {
    fn default() -> Self {
        Self {
            header_offset: HEADER_HEIGHT,
            reveal_margin: REVEAL_MARGIN,
        }
    }
}

impl From<&ChromeConfig> for ChromeSettings {
    fn from(config: &ChromeConfig) -> Self {
        Self {
            header_offset: config.header_offset,
            reveal_margin: config.reveal_margin,
        }
    }
}

/// Mounts the chrome behaviours on a page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageChrome;

impl PageChrome {
    /// Attach every chrome listener present on the page and run the initial
    /// reveal pass.
    pub fn mount(page: &Page, settings: ChromeSettings) -> DomResult<Mount> {
        let mut mount = Mount::new(page, "chrome");

        Self::mount_nav(page, &mut mount)?;
        Self::mount_anchors(page, &mut mount, settings.header_offset)?;
        Self::mount_reveal(page, &mut mount, settings.reveal_margin);
        Self::mount_passwords(page, &mut mount);
        Self::mount_forms(page, &mut mount)?;

        Ok(mount)
    }

    fn mount_nav(page: &Page, mount: &mut Mount) -> DomResult<()> {
        let (burger, links, items) = {
            let doc = page.document();
            (
                doc.query_selector(".burger")?,
                doc.query_selector(".nav-links")?,
                doc.query_selector_all(".nav-link")?,
            )
        };
        let Some(links) = links else {
            return Ok(());
        };

        if let Some(burger) = burger {
            mount.listen(burger, EventType::Click, move |page, _| {
                nav::toggle(&mut page.document(), burger, links);
            });
        }
        for item in items {
            mount.listen(item, EventType::Click, move |page, _| {
                nav::close(&mut page.document(), burger, links);
            });
        }
        Ok(())
    }

    fn mount_anchors(page: &Page, mount: &mut Mount, header_offset: f64) -> DomResult<()> {
        let anchors = page.document().query_selector_all("a[href^=\"#\"]")?;
        for anchor in anchors {
            mount.listen(anchor, EventType::Click, move |page, event| {
                event.prevent_default();
                let mut doc = page.document();
                let href = doc[anchor].attr("href").unwrap_or("#").to_string();
                scroll::scroll_to_anchor(&mut doc, &href, header_offset);
            });
        }
        Ok(())
    }

    fn mount_reveal(page: &Page, mount: &mut Mount, margin: f64) {
        for kind in [EventType::Scroll, EventType::Load] {
            mount.listen(EventTarget::Window, kind, move |page, _| {
                scroll::reveal_visible(&mut page.document(), margin);
            });
        }
        scroll::reveal_visible(&mut page.document(), margin);
    }

    fn mount_passwords(page: &Page, mount: &mut Mount) {
        let (password, confirm, meter) = {
            let mut doc = page.document();
            let password = doc.element_by_id("password");
            let confirm = doc.element_by_id("confirm_password");
            let meter = password.map(|input| StrengthMeter::install(&mut doc, input));
            (password, confirm, meter)
        };

        if let (Some(input), Some(meter)) = (password, meter) {
            mount.listen(input, EventType::Input, move |page, _| {
                let mut doc = page.document();
                let value = doc[input].value().to_string();
                meter.update(&mut doc, &value);
            });
        }

        if let Some(confirm) = confirm {
            mount.listen(confirm, EventType::Input, move |page, _| {
                forms::check_confirmation(&mut page.document(), password, confirm);
            });
        }
    }

    fn mount_forms(page: &Page, mount: &mut Mount) -> DomResult<()> {
        let form_nodes = page.document().query_selector_all("form")?;
        for form in form_nodes {
            // Runs even when an earlier listener cancelled the submission.
            mount.listen(form, EventType::Submit, move |page, _| {
                forms::mark_submitting(&mut page.document(), form);
            });
        }
        Ok(())
    }
}
