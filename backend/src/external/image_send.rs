//! Image-ordering client
//!
//! Forwards crop images, in recommendation order, to the image-ordering service.
//! Image files are read with `tokio::fs` so forwarding never blocks a runtime worker.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ImageSendConfig;
use crate::error::{AppError, AppResult};

/// Images known to the image service, by normalized crop name
const CROP_IMAGES: &[(&str, &str)] = &[
    ("alfalfa", "alfalfa.png"),
    ("barley", "Barley.png"),
    ("canola", "Canola.png"),
    ("carrot", "Carrot.png"),
    ("corn", "Corn.png"),
    ("cotton", "Cotton.png"),
    ("lettuce", "Lettuce.png"),
    ("oats", "Oats.png"),
    ("onion", "Onion.png"),
    ("peanuts", "Peanuts.png"),
    ("potato", "Potato.png"),
    ("rice", "Rice.png"),
    ("sorghum", "Sorghum.png"),
    ("soybean", "Soybean.png"),
    ("sunflower", "Sunflower.png"),
    ("tomato", "Tomato.png"),
    ("spring wheat", "Wheatspring.png"),
    ("wheat spring", "Wheatspring.png"),
    ("winter wheat", "Wheatwinter.png"),
    ("wheat winter", "Wheatwinter.png"),
];

/// Which prediction the image order belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImageContext {
    ShortTerm,
    LongTerm,
}

impl ImageContext {
    /// Most images a request of this kind carries
    pub fn max_images(&self) -> usize {
        match self {
            ImageContext::ShortTerm => 5,
            ImageContext::LongTerm => 12,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImageSendRequest {
    pub context: ImageContext,
    pub crops: Vec<CropImage>,
    pub missing_images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CropImage {
    /// 1-based position in the order
    pub position: usize,
    pub name: String,
    pub image_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImageSendResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Client for the image-ordering service
#[derive(Clone)]
pub struct ImageSendClient {
    api_endpoint: String,
    api_key: String,
    images_dir: PathBuf,
    http_client: Client,
}

/// Image file for a crop name, matched case-insensitively
pub fn image_file_for(crop_name: &str) -> Option<&'static str> {
    let normalized = crop_name.trim().to_lowercase();
    CROP_IMAGES
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, file)| *file)
}

impl ImageSendClient {
    /// Create a new image-ordering client
    pub fn new(config: &ImageSendConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
            images_dir: PathBuf::from(&config.images_dir),
            http_client,
        })
    }

    async fn encode_image(path: &Path) -> Option<String> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Some(BASE64.encode(bytes)),
            Err(e) => {
                tracing::warn!("Cannot read image {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Build the request body, embedding every image found on disk
    pub async fn build_request(
        &self,
        context: ImageContext,
        crop_names: &[String],
    ) -> ImageSendRequest {
        let mut missing_images = Vec::new();
        let mut crops = Vec::with_capacity(context.max_images());

        for (i, name) in crop_names.iter().take(context.max_images()).enumerate() {
            let image_file = image_file_for(name);
            let image_base64 = match image_file {
                Some(file) => Self::encode_image(&self.images_dir.join(file)).await,
                None => None,
            };
            if image_base64.is_none() {
                missing_images.push(name.clone());
            }
            crops.push(CropImage {
                position: i + 1,
                name: name.clone(),
                image_file: image_file.map(String::from),
                image_base64,
            });
        }

        ImageSendRequest {
            context,
            crops,
            missing_images,
        }
    }

    /// Send crop images in order
    pub async fn send(
        &self,
        context: ImageContext,
        crop_names: &[String],
    ) -> AppResult<ImageSendResponse> {
        let request = self.build_request(context, crop_names).await;
        if !request.missing_images.is_empty() {
            tracing::warn!("Missing images for crops: {:?}", request.missing_images);
        }

        let mut builder = self
            .http_client
            .post(&self.api_endpoint)
            .header("Content-Type", "application/json")
            .json(&request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::ImageSendError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ImageSendError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let result: ImageSendResponse = response
            .json()
            .await
            .map_err(|e| AppError::ImageSendError(format!("Failed to parse response: {}", e)))?;

        Ok(result)
    }
}
