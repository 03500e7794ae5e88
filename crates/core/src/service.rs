//! Seams to the two remote services.
//!
//! The workflows only ever talk to these traits; `healthrecs-client` provides the
//! HTTP implementations and tests substitute in-memory fakes.

use crate::error::ApiResult;
use crate::models::{NewVisit, Patient, Visit};
use async_trait::async_trait;
use healthrecs_types::RegNo;

/// Records service: patient listing, lookup, creation and visit append.
#[async_trait]
pub trait RecordsApi: Send + Sync {
    /// `GET /records`. A payload that is not an array yields an empty list.
    async fn list_patients(&self) -> ApiResult<Vec<Patient>>;

    /// `GET /record/{regNo}`.
    async fn get_patient(&self, reg_no: &RegNo) -> ApiResult<Patient>;

    /// `POST /newRecord`, returning the server's echo of the created record.
    async fn create_patient(&self, patient: &Patient) -> ApiResult<Patient>;

    /// `POST /{regNo}/visits`.
    async fn add_visit(&self, reg_no: &RegNo, visit: &NewVisit) -> ApiResult<Visit>;
}

/// An image read from disk and ready to upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Image data-extraction service.
#[async_trait]
pub trait ExtractionApi: Send + Sync {
    /// `POST /extract-data` with the image as multipart field `image`.
    ///
    /// The response is an unstructured key/value record.
    async fn extract(&self, image: &ImageUpload) -> ApiResult<serde_json::Value>;
}
