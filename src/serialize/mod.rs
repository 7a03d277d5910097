pub mod model;
pub mod serializer;

pub use model::{FieldMap, SerializedNode};
pub use serializer::{SerializeOptions, ValuePolicy, serialize_element, serialize_element_with};
