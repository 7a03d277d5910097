pub mod model;
pub mod session;

pub use model::{Selection, SelectionState};
pub use session::SelectionSession;
