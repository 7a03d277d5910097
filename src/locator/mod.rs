pub mod descriptor;
pub mod xpath;

pub use descriptor::{describe_element, short_descriptor};
pub use xpath::{BODY_PATH, get_xpath};
