use crate::{http_client, read_json, read_write_ack};
use async_trait::async_trait;
use healthrecs_core::constants::{NEW_RECORD_PATH, RECORDS_PATH, RECORD_PATH, VISITS_PATH};
use healthrecs_core::models::{NewVisit, Patient, Visit};
use healthrecs_core::service::RecordsApi;
use healthrecs_core::{ApiError, ApiResult, CoreConfig};
use healthrecs_types::RegNo;
use serde_json::Value;
use std::sync::Arc;

/// Records service over HTTP.
#[derive(Clone)]
pub struct HttpRecordsClient {
    http: reqwest::Client,
    cfg: Arc<CoreConfig>,
}

impl HttpRecordsClient {
    pub fn new(cfg: Arc<CoreConfig>) -> ApiResult<Self> {
        Ok(Self {
            http: http_client()?,
            cfg,
        })
    }

    async fn get(&self, segments: &[&str]) -> ApiResult<Value> {
        let url = self.cfg.records_endpoint(segments);
        tracing::debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ApiError::transport)?;
        read_json(response).await
    }

    async fn post(&self, segments: &[&str], body: &impl serde::Serialize) -> ApiResult<Value> {
        let url = self.cfg.records_endpoint(segments);
        tracing::debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(ApiError::transport)?;
        read_write_ack(response).await
    }
}

#[async_trait]
impl RecordsApi for HttpRecordsClient {
    async fn list_patients(&self) -> ApiResult<Vec<Patient>> {
        let value = self.get(&[RECORDS_PATH]).await?;
        let items = match value {
            Value::Array(items) => items,
            other => {
                tracing::warn!("Expected an array of patients but got: {}", other);
                return Ok(Vec::new());
            }
        };

        Ok(items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Patient>(item) {
                Ok(patient) => Some(patient),
                Err(e) => {
                    tracing::warn!("skipping malformed patient record: {}", e);
                    None
                }
            })
            .collect())
    }

    async fn get_patient(&self, reg_no: &RegNo) -> ApiResult<Patient> {
        let value = self.get(&[RECORD_PATH, reg_no.as_str()]).await?;
        if !value.is_object() {
            return Err(ApiError::UnexpectedShape(format!(
                "expected a patient object, got: {value}"
            )));
        }
        serde_json::from_value(value).map_err(|e| ApiError::UnexpectedShape(e.to_string()))
    }

    async fn create_patient(&self, patient: &Patient) -> ApiResult<Patient> {
        let value = self.post(&[NEW_RECORD_PATH], patient).await?;
        match serde_json::from_value::<Patient>(value) {
            Ok(created) if !created.reg_no.is_empty() => Ok(created),
            _ => {
                tracing::warn!("create response was not a patient record; using submitted record");
                Ok(patient.clone())
            }
        }
    }

    async fn add_visit(&self, reg_no: &RegNo, visit: &NewVisit) -> ApiResult<Visit> {
        let value = self.post(&[reg_no.as_str(), VISITS_PATH], visit).await?;
        let created = match value {
            Value::Object(_) => serde_json::from_value::<Visit>(value)
                .ok()
                .filter(|v| !v.investigation.is_empty() || !v.treatment_given.is_empty()),
            _ => None,
        };
        Ok(created.unwrap_or_else(|| Visit {
            id: None,
            date: None,
            investigation: visit.investigation.clone(),
            treatment_given: visit.treatment_given.clone(),
        }))
    }
}
