//! # HealthRecs Client
//!
//! HTTP implementations of the service traits in `healthrecs_core::service`.
//!
//! Every request is a single attempt: no retries, no explicit timeout. Failures are
//! mapped onto [`ApiError`] so the workflows can show one generic notice.

mod extraction;
mod records;

pub use extraction::HttpExtractionClient;
pub use records::HttpRecordsClient;

use healthrecs_core::{ApiError, ApiResult};
use serde_json::Value;

fn http_client() -> ApiResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("healthrecs/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ApiError::transport)
}

async fn check_status(response: reqwest::Response) -> ApiResult<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Check the status and decode the body as JSON.
async fn read_json(response: reqwest::Response) -> ApiResult<Value> {
    check_status(response)
        .await?
        .json::<Value>()
        .await
        .map_err(|e| ApiError::UnexpectedShape(format!("body is not JSON: {e}")))
}

/// Check the status of a write and decode whatever body came back.
///
/// The write has landed once the status is 2xx, so an empty or non-JSON body is
/// `Value::Null` rather than an error.
async fn read_write_ack(response: reqwest::Response) -> ApiResult<Value> {
    let body = check_status(response)
        .await?
        .text()
        .await
        .map_err(ApiError::transport)?;
    Ok(serde_json::from_str(&body).unwrap_or_else(|_| {
        tracing::debug!("write acknowledged with a non-JSON body: {:?}", body);
        Value::Null
    }))
}
