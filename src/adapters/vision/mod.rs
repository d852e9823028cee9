//! Vision analyzer adapters.

mod http;
mod mock;

pub use http::{HttpVisionAnalyzer, HttpVisionConfig};
pub use mock::{MockVisionAnalyzer, VisionCall};
