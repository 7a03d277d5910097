use crate::dom::document::NodeId;

/// DOM event types the widget listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    KeyPress,
    MouseDown,
    MouseUp,
    TouchStart,
    TouchEnd,
    Focus,
    FocusIn,
    PointerOver,
    Click,
    Resize,
    PopState,
}

/// Events swallowed while the user is picking an element.
pub const SUPPRESSED_DURING_PICK: &[EventKind] = &[
    EventKind::KeyDown,
    EventKind::KeyUp,
    EventKind::KeyPress,
    EventKind::MouseDown,
    EventKind::MouseUp,
    EventKind::TouchStart,
    EventKind::TouchEnd,
    EventKind::Focus,
    EventKind::FocusIn,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyInput {
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ctrl: false,
            meta: false,
        }
    }

    pub fn is_escape(&self) -> bool {
        self.key == "Escape" || self.key == "Esc"
    }

    /// Keys that keep working while picking: Escape, F5 and Ctrl/Cmd+R.
    pub fn passes_pick_guard(&self) -> bool {
        self.is_escape()
            || self.key == "F5"
            || ((self.ctrl || self.meta) && self.key.eq_ignore_ascii_case("r"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageEvent {
    pub kind: EventKind,
    pub target: Option<NodeId>,
    pub key: Option<KeyInput>,
}

impl PageEvent {
    pub fn new(kind: EventKind, target: Option<NodeId>) -> Self {
        Self {
            kind,
            target,
            key: None,
        }
    }

    pub fn key_down(key: &str) -> Self {
        Self::key(EventKind::KeyDown, KeyInput::plain(key))
    }

    pub fn key(kind: EventKind, key: KeyInput) -> Self {
        Self {
            kind,
            target: None,
            key: Some(key),
        }
    }

    pub fn click(target: NodeId) -> Self {
        Self::new(EventKind::Click, Some(target))
    }

    pub fn pointer_over(target: NodeId) -> Self {
        Self::new(EventKind::PointerOver, Some(target))
    }

    pub fn mouse_down(target: NodeId) -> Self {
        Self::new(EventKind::MouseDown, Some(target))
    }

    pub fn focus_in(target: NodeId) -> Self {
        Self::new(EventKind::FocusIn, Some(target))
    }

    pub fn resize() -> Self {
        Self::new(EventKind::Resize, None)
    }
}

/// What a listener tells the page after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    /// `preventDefault` + `stopImmediatePropagation`.
    Stop,
}

/// Whether the page's own behaviour ran for a dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Default,
    Suppressed,
}
