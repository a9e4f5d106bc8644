//! DOM events.

use super::NodeId;

/// Event types the page scripts listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Form submission.
    Submit,
    /// Pointer activation.
    Click,
    /// Value change on a form control.
    Input,
    /// Window scroll.
    Scroll,
    /// Window load.
    Load,
}

impl EventType {
    /// DOM event name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Click => "click",
            Self::Input => "input",
            Self::Scroll => "scroll",
            Self::Load => "load",
        }
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The window object.
    Window,
    /// An element.
    Node(NodeId),
}

impl From<NodeId> for EventTarget {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

/// An event being dispatched.
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventType,
    target: EventTarget,
    current_target: EventTarget,
    default_prevented: bool,
}

impl Event {
    pub(crate) fn new(kind: EventType, target: EventTarget) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            default_prevented: false,
        }
    }

    pub fn kind(&self) -> EventType {
        self.kind
    }

    /// The element the event was dispatched on.
    pub fn target(&self) -> EventTarget {
        self.target
    }

    /// The element whose listener is currently running.
    pub fn current_target(&self) -> EventTarget {
        self.current_target
    }

    pub(crate) fn set_current_target(&mut self, target: EventTarget) {
        self.current_target = target;
    }

    /// Cancel the default action (form submission, link navigation).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
