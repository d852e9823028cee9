//! Listing generator adapters.

mod template;

pub use template::{TemplateListingGenerator, MAX_TITLE_CHARS};
