pub mod classifier;
pub mod embeds;
pub mod origin;
