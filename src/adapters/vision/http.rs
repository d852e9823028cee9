//! HTTP Vision Analyzer - talks to an external image analysis service.
//!
//! The service exposes two JSON endpoints:
//!
//! - `POST {base_url}/category` with `{"images": [...]}` answering
//!   `{"category": "<label>"}`
//! - `POST {base_url}/features` with `{"images": [...], "category": "<label>"}`
//!   answering a features object
//!
//! Category labels are translated into [`Category`] here; an unknown label is
//! an `InvalidResponse`.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::ImageRef;
use crate::domain::listing::{Category, ProductFeatures, DEFAULT_CONDITION, UNKNOWN};
use crate::ports::{CollaboratorError, VisionAnalyzer};

/// Upper bound on the wait between two attempts.
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Configuration for [`HttpVisionAnalyzer`].
#[derive(Debug, Clone)]
pub struct HttpVisionConfig {
    api_key: Secret<String>,
    pub base_url: String,
    pub timeout: Duration,
    /// Extra attempts after a retryable failure.
    pub max_retries: u32,
}

impl HttpVisionConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: base_url.into(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

pub struct HttpVisionAnalyzer {
    config: HttpVisionConfig,
    client: Client,
}

impl HttpVisionAnalyzer {
    pub fn new(config: HttpVisionConfig) -> Result<Self, CollaboratorError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CollaboratorError::unavailable(format!("http client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, CollaboratorError> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(self.config.api_key())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CollaboratorError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    CollaboratorError::unavailable(e.to_string())
                }
            })?;
        check_status(response).await
    }

    /// Posts with exponential backoff on retryable failures.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, CollaboratorError>
    where
        B: Serialize + Sync,
        T: for<'de> Deserialize<'de>,
    {
        let mut attempt = 0;
        loop {
            let result = match self.post(path, body).await {
                Ok(response) => response.json::<T>().await.map_err(|e| {
                    CollaboratorError::invalid_response(format!("{}: {}", path, e))
                }),
                Err(e) => Err(e),
            };
            match result {
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    tracing::warn!(path, attempt, error = %err, "vision call failed, retrying");
                    sleep(backoff(attempt)).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

/// 1s, 2s, 4s, ... capped at [`MAX_BACKOFF`].
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(16)).min(MAX_BACKOFF)
}

async fn check_status(response: Response) -> Result<Response, CollaboratorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    match status.as_u16() {
        404 => Err(CollaboratorError::not_found(body)),
        408 | 429 | 500..=599 => Err(CollaboratorError::unavailable(format!(
            "status {}: {}",
            status, body
        ))),
        _ => Err(CollaboratorError::invalid_response(format!(
            "status {}: {}",
            status, body
        ))),
    }
}

#[derive(Debug, Serialize)]
struct CategoryRequest<'a> {
    images: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CategoryResponse {
    category: String,
}

#[derive(Debug, Serialize)]
struct FeaturesRequest<'a> {
    images: Vec<&'a str>,
    category: &'a str,
}

/// Wire shape of inferred features. Missing fields read as unknown.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeaturesResponse {
    brand: Option<String>,
    item_type: Option<String>,
    gender: Option<String>,
    size: Option<String>,
    color: Option<String>,
    design: Option<String>,
    material: Option<String>,
    era: Option<String>,
    condition: Option<String>,
    confidence: Option<f32>,
}

impl FeaturesResponse {
    fn into_features(self, category: Category) -> ProductFeatures {
        let or_unknown = |value: Option<String>| {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string())
        };
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        ProductFeatures {
            brand: or_unknown(self.brand),
            category,
            item_type: or_unknown(self.item_type),
            gender: or_unknown(self.gender),
            size: or_unknown(self.size),
            color: or_unknown(self.color),
            design: present(self.design),
            material: present(self.material),
            era: present(self.era),
            condition: present(self.condition).unwrap_or_else(|| DEFAULT_CONDITION.to_string()),
            confidence: self.confidence.unwrap_or(0.0).clamp(0.0, 1.0),
        }
    }
}

fn wire_label(category: Category) -> &'static str {
    match category {
        Category::Tops => "tops",
        Category::Pants => "pants",
        Category::Setup => "setup",
    }
}

fn image_strs(images: &[ImageRef]) -> Vec<&str> {
    images.iter().map(ImageRef::as_str).collect()
}

#[async_trait]
impl VisionAnalyzer for HttpVisionAnalyzer {
    async fn detect_category(&self, images: &[ImageRef]) -> Result<Category, CollaboratorError> {
        let request = CategoryRequest {
            images: image_strs(images),
        };
        let response: CategoryResponse = self.post_json("category", &request).await?;
        Category::from_label(&response.category).ok_or_else(|| {
            CollaboratorError::invalid_response(format!(
                "unknown category label: {}",
                response.category
            ))
        })
    }

    async fn infer_features(
        &self,
        images: &[ImageRef],
        category: Category,
    ) -> Result<ProductFeatures, CollaboratorError> {
        let request = FeaturesRequest {
            images: image_strs(images),
            category: wire_label(category),
        };
        let response: FeaturesResponse = self.post_json("features", &request).await?;
        Ok(response.into_features(category))
    }
}
