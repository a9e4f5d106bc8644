//! In-memory document model.
//!
//! The page scripts only ever touch a handful of element properties, so the
//! model keeps exactly those: ids, classes, attributes, form values, text,
//! inline markup, display, disabled, custom validity and a few layout
//! numbers. Elements live in an arena and are addressed by [`NodeId`].
//!
//! # Example
//!
//! ```rust
//! use docbot_web::dom::{Document, Element};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let nav = doc.append(body, Element::new("ul").with_class("nav-links"));
//! doc.append(nav, Element::new("a").with_class("nav-link").with_attr("href", "/about"));
//!
//! assert_eq!(doc.query_selector_all(".nav-link").unwrap().len(), 1);
//! ```

mod element;
mod event;
mod selector;

pub use element::{Display, Element, Layout, NodeId};
pub use event::{Event, EventTarget, EventType};
pub use selector::{AttributeFilter, Selector};

use std::ops::{Index, IndexMut};

use crate::error::DomResult;

/// Default viewport height used by fixtures and tests.
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

/// Window scroll state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// `window.scrollY`
    pub scroll_y: f64,
    /// `window.innerHeight`
    pub inner_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            inner_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

/// `ScrollToOptions.behavior`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

/// A recorded `window.scrollTo` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// The element tree plus window state.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    focused: Option<NodeId>,
    viewport: Viewport,
    scrolls: Vec<ScrollRequest>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only an empty `body`.
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new("body")],
            focused: None,
            viewport: Viewport::default(),
            scrolls: Vec::new(),
        }
    }

    /// The root element.
    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // body is always present
        false
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0)
    }

    /// Append `element` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, mut element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        element.parent = Some(parent);
        element.children.clear();
        self.nodes.push(element);
        self[parent].children.push(id);
        id
    }

    /// Insert `element` right after `reference` under the same parent.
    ///
    /// Inserting after the body appends to the body.
    pub fn insert_after(&mut self, reference: NodeId, mut element: Element) -> NodeId {
        let Some(parent) = self[reference].parent else {
            return self.append(reference, element);
        };
        let id = NodeId(self.nodes.len());
        element.parent = Some(parent);
        element.children.clear();
        self.nodes.push(element);
        let siblings = &mut self[parent].children;
        let position = siblings
            .iter()
            .position(|&c| c == reference)
            .map_or(siblings.len(), |p| p + 1);
        siblings.insert(position, id);
        id
    }

    /// Next sibling element, like `nextElementSibling`.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get(id)?.parent?;
        let siblings = &self[parent].children;
        let position = siblings.iter().position(|&c| c == id)?;
        siblings.get(position + 1).copied()
    }

    /// Ancestors from the parent up to the body.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.get(id).and_then(Element::parent), move |&n| {
            self.get(n).and_then(Element::parent)
        })
    }

    /// Descendants of `scope` in document order, excluding `scope`.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .get(scope)
            .map(|e| e.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self[id].children.iter().rev().copied());
        }
        out
    }

    /// Whether `id` is `ancestor` or lies below it.
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// `document.getElementById`
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.all().find(|&n| self[n].id() == Some(id))
    }

    /// `document.querySelector`
    pub fn query_selector(&self, selector: &str) -> DomResult<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self.all().find(|&n| selector.matches(&self[n])))
    }

    /// `document.querySelectorAll`
    pub fn query_selector_all(&self, selector: &str) -> DomResult<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self.all().filter(|&n| selector.matches(&self[n])).collect())
    }

    /// `scope.querySelector`, descendants only.
    pub fn query_within(&self, scope: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .find(|&n| selector.matches(&self[n])))
    }

    /// `scope.querySelectorAll`, descendants only.
    pub fn query_all_within(&self, scope: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .filter(|&n| selector.matches(&self[n]))
            .collect())
    }

    /// Concatenated text of the element and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = self[id].text().to_string();
        for n in self.descendants(id) {
            out.push_str(self[n].text());
        }
        out
    }

    pub fn focus(&mut self, id: NodeId) {
        self.focused = Some(id);
    }

    /// `document.activeElement`
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// `getBoundingClientRect().top`
    pub fn bounding_top(&self, id: NodeId) -> f64 {
        self[id].layout().offset_top - self.viewport.scroll_y
    }

    /// `window.scrollTo`; the request is recorded and applied immediately.
    pub fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scrolls.push(ScrollRequest { top, behavior });
        self.viewport.scroll_y = top.max(0.0);
    }

    /// Every `scrollTo` call made so far.
    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scrolls
    }

    fn all(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.body()).into_iter()
    }
}

impl Index<NodeId> for Document {
    type Output = Element;

    fn index(&self, id: NodeId) -> &Element {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Document {
    fn index_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let form = doc.append(body, Element::new("form").with_class("auth-form"));
        let password = doc.append(form, Element::new("input").with_id("password"));
        doc.append(
            form,
            Element::new("button")
                .with_attr("type", "submit")
                .with_text("Login"),
        );
        (doc, form, password)
    }

    #[test]
    fn test_insert_after_keeps_order() {
        let (mut doc, form, password) = sample();
        let meter = doc.insert_after(password, Element::new("div").with_class("password-strength"));

        assert_eq!(doc.next_sibling(password), Some(meter));
        assert_eq!(doc[form].children()[1], meter);
        assert_eq!(doc[meter].parent(), Some(form));
    }

    #[test]
    fn test_query_within_scope() {
        let (doc, form, _) = sample();
        let button = doc
            .query_within(form, "button[type=\"submit\"]")
            .unwrap()
            .unwrap();
        assert_eq!(doc.text_content(button), "Login");
        assert!(doc.query_within(button, "button").unwrap().is_none());
        assert!(doc.contains(form, button));
    }

    #[test]
    fn test_document_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.append(body, Element::new("div").with_class("x"));
        let b = doc.append(a, Element::new("div").with_class("x"));
        let c = doc.append(body, Element::new("div").with_class("x"));
        assert_eq!(doc.query_selector_all(".x").unwrap(), vec![a, b, c]);
        assert_eq!(doc.ancestors(b).collect::<Vec<_>>(), vec![a, body]);
    }

    #[test]
    fn test_scroll_to_clamps_at_top() {
        let mut doc = Document::new();
        doc.scroll_to(-40.0, ScrollBehavior::Smooth);
        assert_eq!(doc.viewport().scroll_y, 0.0);
        assert_eq!(doc.scroll_requests()[0].top, -40.0);
    }
}
