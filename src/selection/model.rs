use crate::dom::document::NodeId;

/// Delay before pick-mode listeners go live, so the click that asked for
/// picking is not taken as the selection.
pub const PICK_ARM_DELAY_MS: u64 = 100;

pub const EMBED_TOOLTIP: &str = "This embedded content can't be selected";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Picking { armed: bool },
    Selected(Selection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub element: NodeId,
    /// Breadcrumb computed when the element was picked.
    pub descriptor: String,
}

impl SelectionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SelectionState::Idle)
    }

    pub fn is_picking(&self) -> bool {
        matches!(self, SelectionState::Picking { .. })
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            SelectionState::Selected(s) => Some(s),
            _ => None,
        }
    }
}
