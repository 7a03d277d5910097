use serde::Serialize;

use crate::dom::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

/// Widget-rendered layers drawn above the page (inside the widget host).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Overlay {
    HoverHighlight { rect: Rect },
    SelectionHighlight { rect: Rect },
    Tooltip { rect: Rect, text: String },
    Toast { toast: ToastKind, message: String },
}

impl Overlay {
    pub fn is_toast(&self) -> bool {
        matches!(self, Overlay::Toast { .. })
    }
}
