//! Mock Vision Analyzer for testing.
//!
//! Answers are queued per operation and consumed in order; an empty queue
//! falls back to a fixed default. Errors can be queued the same way.
//!
//! # Example
//!
//! ```ignore
//! let vision = MockVisionAnalyzer::new()
//!     .with_category(Category::Pants)
//!     .with_category_error(CollaboratorError::unavailable("503"));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::ImageRef;
use crate::domain::listing::{Category, ProductFeatures};
use crate::ports::{CollaboratorError, VisionAnalyzer};

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum VisionCall {
    DetectCategory { images: Vec<ImageRef> },
    InferFeatures { images: Vec<ImageRef>, category: Category },
}

#[derive(Debug, Clone)]
pub struct MockVisionAnalyzer {
    categories: Arc<Mutex<VecDeque<Result<Category, CollaboratorError>>>>,
    features: Arc<Mutex<VecDeque<Result<ProductFeatures, CollaboratorError>>>>,
    default_category: Category,
    delay: Duration,
    calls: Arc<Mutex<Vec<VisionCall>>>,
}

impl Default for MockVisionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVisionAnalyzer {
    /// Detects tops and infers all-unknown features unless told otherwise.
    pub fn new() -> Self {
        Self {
            categories: Arc::new(Mutex::new(VecDeque::new())),
            features: Arc::new(Mutex::new(VecDeque::new())),
            default_category: Category::Tops,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Category returned once the queue is empty.
    pub fn with_default_category(mut self, category: Category) -> Self {
        self.default_category = category;
        self
    }

    pub fn with_category(self, category: Category) -> Self {
        self.categories.lock().unwrap().push_back(Ok(category));
        self
    }

    pub fn with_category_error(self, error: CollaboratorError) -> Self {
        self.categories.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_features(self, features: ProductFeatures) -> Self {
        self.features.lock().unwrap().push_back(Ok(features));
        self
    }

    pub fn with_features_error(self, error: CollaboratorError) -> Self {
        self.features.lock().unwrap().push_back(Err(error));
        self
    }

    /// Simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn get_calls(&self) -> Vec<VisionCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl VisionAnalyzer for MockVisionAnalyzer {
    async fn detect_category(&self, images: &[ImageRef]) -> Result<Category, CollaboratorError> {
        self.calls.lock().unwrap().push(VisionCall::DetectCategory {
            images: images.to_vec(),
        });
        self.simulate_latency().await;

        let queued = self.categories.lock().unwrap().pop_front();
        queued.unwrap_or(Ok(self.default_category))
    }

    async fn infer_features(
        &self,
        images: &[ImageRef],
        category: Category,
    ) -> Result<ProductFeatures, CollaboratorError> {
        self.calls.lock().unwrap().push(VisionCall::InferFeatures {
            images: images.to_vec(),
            category,
        });
        self.simulate_latency().await;

        let queued = self.features.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| Ok(ProductFeatures::unknown(category)))
    }
}
