pub mod config;
pub mod controller;
pub mod visibility;

pub use config::WidgetConfig;
pub use controller::{Editor, WidgetController};
pub use visibility::{PathRules, Visibility};
