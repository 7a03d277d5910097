//! In-page feedback widget: element picking, redacted element capture and
//! report delivery, modelled over an arena DOM so it runs outside a browser.

pub mod cli;
pub mod dom;
pub mod error;
pub mod host;
pub mod locator;
pub mod page;
pub mod selection;
pub mod serialize;
pub mod submit;
pub mod widget;

pub use error::{ConfigError, SnapshotError, SubmitError, WidgetError};
pub use widget::{WidgetConfig, WidgetController};
