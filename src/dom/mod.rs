pub mod document;
pub mod geometry;
pub mod snapshot;

pub use document::{Document, ElementData, FrameAccess, NodeId, NodeKind};
pub use geometry::{Rect, Viewport};
