pub mod events;
pub mod hooks;
pub mod overlay;
pub mod page;

pub use events::{Delivery, EventKind, KeyInput, PageEvent, Propagation};
pub use hooks::{Hook, HookTable, ListenerRole};
pub use overlay::{Overlay, ToastKind};
pub use page::{Cursor, HostPage, ListenerHost};
