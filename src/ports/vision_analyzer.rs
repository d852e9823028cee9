//! Vision Analyzer Port - image understanding for the intake flow.
//!
//! Implementations translate whatever their backend returns into the closed
//! [`Category`] enum before returning; raw labels never cross this port.

use async_trait::async_trait;

use super::CollaboratorError;
use crate::domain::foundation::ImageRef;
use crate::domain::listing::{Category, ProductFeatures};

/// Port for category detection and feature inference from product images.
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    /// Detects the garment category shown in the images.
    ///
    /// # Errors
    ///
    /// `InvalidResponse` when the backend names a category outside the closed set.
    async fn detect_category(&self, images: &[ImageRef]) -> Result<Category, CollaboratorError>;

    /// Infers product features for an already-known category.
    async fn infer_features(
        &self,
        images: &[ImageRef],
        category: Category,
    ) -> Result<ProductFeatures, CollaboratorError>;
}
