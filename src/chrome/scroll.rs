//! Smooth in-page scrolling and scroll-triggered reveal.

use crate::dom::{Document, ScrollBehavior};

/// Attribute naming the class to add on reveal.
pub const ANIMATE_ATTR: &str = "data-animate";

/// Scroll to the element an in-page `href` points at.
///
/// `#` alone, an unknown target and an unparsable fragment are all no-ops.
/// Returns the scroll position requested, if any.
pub fn scroll_to_anchor(doc: &mut Document, href: &str, header_offset: f64) -> Option<f64> {
    if href == "#" {
        return None;
    }
    let target = match doc.query_selector(href) {
        Ok(target) => target?,
        Err(error) => {
            tracing::debug!(name: "chrome.anchor.invalid", href, error = %error, "Ignoring anchor");
            return None;
        }
    };
    let top = doc[target].layout().offset_top - header_offset;
    doc.scroll_to(top, ScrollBehavior::Smooth);
    Some(top)
}

/// Add the `data-animate` class to every `.animate__animated` element whose
/// top is above `inner_height - margin`. Returns how many were newly
/// revealed.
///
/// Classes are never removed, so scrolling back up does not replay.
pub fn reveal_visible(doc: &mut Document, margin: f64) -> usize {
    let Ok(candidates) = doc.query_selector_all(".animate__animated") else {
        return 0;
    };
    let threshold = doc.viewport().inner_height - margin;

    let mut revealed = 0;
    for node in candidates {
        if doc.bounding_top(node) >= threshold {
            continue;
        }
        let Some(class) = doc[node].attr(ANIMATE_ATTR).map(str::to_string) else {
            continue;
        };
        if doc[node].add_class(&class) {
            revealed += 1;
        }
    }
    revealed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, Viewport};

    fn page() -> Document {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append(body, Element::new("section").with_id("features").with_offset_top(900.0));
        for (offset, class) in [(100.0, "fadeIn"), (699.0, "fadeInUp"), (700.0, "fadeInLeft")] {
            doc.append(
                body,
                Element::new("div")
                    .with_class("animate__animated")
                    .with_attr(ANIMATE_ATTR, class)
                    .with_offset_top(offset),
            );
        }
        doc
    }

    #[test]
    fn test_anchor_offsets_header() {
        let mut doc = page();
        assert_eq!(scroll_to_anchor(&mut doc, "#features", 80.0), Some(820.0));
        assert_eq!(doc.scroll_requests()[0].behavior, ScrollBehavior::Smooth);
    }

    #[test]
    fn test_anchor_noops() {
        let mut doc = page();
        assert_eq!(scroll_to_anchor(&mut doc, "#", 80.0), None);
        assert_eq!(scroll_to_anchor(&mut doc, "#missing", 80.0), None);
        assert_eq!(scroll_to_anchor(&mut doc, "#not valid", 80.0), None);
        assert!(doc.scroll_requests().is_empty());
    }

    #[test]
    fn test_reveal_is_one_way() {
        let mut doc = page();
        // 800px viewport, 100px margin: only tops above 700 reveal.
        assert_eq!(reveal_visible(&mut doc, 100.0), 2);
        assert_eq!(reveal_visible(&mut doc, 100.0), 0);

        doc.set_viewport(Viewport {
            scroll_y: 400.0,
            inner_height: 800.0,
        });
        assert_eq!(reveal_visible(&mut doc, 100.0), 1);

        doc.set_viewport(Viewport::default());
        reveal_visible(&mut doc, 100.0);
        let revealed = doc.query_selector_all(".fadeInLeft").unwrap();
        assert_eq!(revealed.len(), 1);
    }
}
