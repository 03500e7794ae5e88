use crate::{http_client, read_json};
use async_trait::async_trait;
use healthrecs_core::constants::{EXTRACT_IMAGE_FIELD, EXTRACT_PATH};
use healthrecs_core::service::{ExtractionApi, ImageUpload};
use healthrecs_core::{ApiError, ApiResult, CoreConfig};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::sync::Arc;

/// Image extraction service over HTTP.
#[derive(Clone)]
pub struct HttpExtractionClient {
    http: reqwest::Client,
    cfg: Arc<CoreConfig>,
}

impl HttpExtractionClient {
    pub fn new(cfg: Arc<CoreConfig>) -> ApiResult<Self> {
        Ok(Self {
            http: http_client()?,
            cfg,
        })
    }
}

#[async_trait]
impl ExtractionApi for HttpExtractionClient {
    async fn extract(&self, image: &ImageUpload) -> ApiResult<Value> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(ApiError::transport)?;
        let form = Form::new().part(EXTRACT_IMAGE_FIELD, part);

        let url = self.cfg.extract_endpoint(&[EXTRACT_PATH]);
        tracing::debug!("POST {} ({} bytes)", url, image.bytes.len());
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::transport)?;
        read_json(response).await
    }
}
