//! Elements of the in-memory document.

use std::collections::BTreeMap;

/// Handle to an element inside a [`Document`](super::Document).
///
/// Ids are only minted by the document that owns the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the element in the document arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// CSS `display` values the widgets toggle between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Display {
    /// No inline display set; the stylesheet decides.
    #[default]
    Initial,
    /// `display: none`.
    None,
    /// `display: block`.
    Block,
    /// `display: flex`.
    Flex,
}

impl Display {
    /// CSS keyword for this value.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Initial => "",
            Self::None => "none",
            Self::Block => "block",
            Self::Flex => "flex",
        }
    }
}

/// Layout numbers the scroll behaviours read.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Layout {
    /// Distance from the top of the document, in CSS pixels.
    pub offset_top: f64,
    /// Current scroll offset of a scrollable container.
    pub scroll_top: f64,
    /// Total scrollable height of a container.
    pub scroll_height: f64,
}

/// A single element.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    value: String,
    text: String,
    markup: String,
    display: Display,
    disabled: bool,
    validation_message: String,
    layout: Layout,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Element {
    /// Create a detached element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            value: String::new(),
            text: String::new(),
            markup: String::new(),
            display: Display::Initial,
            disabled: false,
            validation_message: String::new(),
            layout: Layout::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class. Whitespace-separated lists are split.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        for name in class.split_whitespace() {
            self.add_class(name);
        }
        self
    }

    /// Set an arbitrary attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set the own text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the inner markup (icon fragments on buttons).
    #[must_use]
    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    /// Set the form control value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the inline display.
    #[must_use]
    pub fn with_display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    /// Place the element at a document offset.
    #[must_use]
    pub fn with_offset_top(mut self, offset_top: f64) -> Self {
        self.layout.offset_top = offset_top;
        self
    }

    /// Lowercase tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The `id` attribute, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Class list in insertion order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// The `class` attribute as a single string.
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    /// Replace the whole class list.
    pub fn set_class_name(&mut self, class_name: &str) {
        self.classes.clear();
        for name in class_name.split_whitespace() {
            self.add_class(name);
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class; returns `false` when it was already present.
    pub fn add_class(&mut self, class: &str) -> bool {
        if class.is_empty() || self.has_class(class) {
            return false;
        }
        self.classes.push(class.to_string());
        true
    }

    /// Remove a class; returns `true` when it was present.
    pub fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        before != self.classes.len()
    }

    /// Toggle a class; returns whether it is present afterwards.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.remove_class(class) {
            false
        } else {
            self.add_class(class)
        }
    }

    /// Read an attribute. `id` and `class` are reflected.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id(),
            _ => self.attributes.get(name).map(String::as_str),
        }
    }

    /// Write an attribute. `id` and `class` are reflected.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match name.as_str() {
            "id" => self.id = Some(value),
            "class" => self.set_class_name(&value),
            _ => {
                self.attributes.insert(name, value);
            }
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Own text, without descendants.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn set_markup(&mut self, markup: impl Into<String>) {
        self.markup = markup.into();
    }

    pub fn display(&self) -> Display {
        self.display
    }

    pub fn set_display(&mut self, display: Display) {
        self.display = display;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Native constraint-validation message; empty means valid.
    pub fn validation_message(&self) -> &str {
        &self.validation_message
    }

    /// Equivalent of `setCustomValidity`.
    pub fn set_custom_validity(&mut self, message: impl Into<String>) {
        self.validation_message = message.into();
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
