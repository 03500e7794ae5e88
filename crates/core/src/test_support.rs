//! Fixtures and in-memory service fakes shared by the unit tests.

use crate::config::CoreConfig;
use crate::constants::{DEFAULT_EXTRACT_URL, DEFAULT_RECORDS_URL};
use crate::error::{ApiError, ApiResult};
use crate::models::{Ailment, NewVisit, OtherAilments, Patient, Visit};
use crate::service::{ExtractionApi, ImageUpload, RecordsApi};
use async_trait::async_trait;
use healthrecs_types::RegNo;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Config rooted at `state_dir` with no login delay.
pub(crate) fn test_cfg(state_dir: &Path) -> CoreConfig {
    CoreConfig::new(
        Url::parse(DEFAULT_RECORDS_URL).expect("default records URL should parse"),
        Url::parse(DEFAULT_EXTRACT_URL).expect("default extract URL should parse"),
        state_dir.to_path_buf(),
        Duration::ZERO,
        3,
    )
    .expect("test config should build")
}

/// One critical, one follow-up and one stable patient.
pub(crate) fn sample_patients() -> Vec<Patient> {
    vec![
        Patient {
            id: Some("p1".into()),
            reg_no: "REG-2023-0042".into(),
            name: "Arun Mehta".into(),
            age: Some(45),
            sex: "M".into(),
            mobile_no: "9876543210".into(),
            aadhar_no: "1234 5678 9012".into(),
            blood_group: "B+".into(),
            mb_or_pb_status: "MB".into(),
            other_ailments: Some(OtherAilments::new().with(Ailment::Cancer)),
            visits: vec![Visit {
                id: Some("v1".into()),
                date: Some("2024-03-05T09:30:00.000Z".into()),
                investigation: "Biopsy".into(),
                treatment_given: "Referred to oncology".into(),
            }],
            created_at: Some("2024-03-01T10:00:00.000Z".into()),
            ..Patient::default()
        },
        Patient {
            id: Some("p2".into()),
            reg_no: "REG-2023-0039".into(),
            name: "Priya Sharma".into(),
            age: Some(32),
            sex: "F".into(),
            mobile_no: "9876543211".into(),
            aadhar_no: "4321 8765 2109".into(),
            other_ailments: Some(OtherAilments::new().with(Ailment::Hypertension)),
            created_at: Some("2024-02-14T08:15:00.000Z".into()),
            ..Patient::default()
        },
        Patient {
            id: Some("p3".into()),
            reg_no: "REG-2023-0038".into(),
            name: "Raj Kumar".into(),
            age: Some(67),
            sex: "M".into(),
            mobile_no: "9876543212".into(),
            other_ailments: Some(OtherAilments::new()),
            created_at: Some("2024-01-20T12:00:00.000Z".into()),
            ..Patient::default()
        },
    ]
}

fn unavailable() -> ApiError {
    ApiError::Status {
        status: 503,
        body: "service unavailable".into(),
    }
}

/// Records service backed by a vector. Every call is logged by name.
#[derive(Default)]
pub(crate) struct FakeRecords {
    patients: Mutex<Vec<Patient>>,
    failing: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl FakeRecords {
    pub(crate) fn with_patients(patients: Vec<Patient>) -> Self {
        Self {
            patients: Mutex::new(patients),
            ..Self::default()
        }
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn patients(&self) -> Vec<Patient> {
        self.patients.lock().expect("patients lock").clone()
    }

    fn record(&self, call: String) -> ApiResult<()> {
        self.calls.lock().expect("calls lock").push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl RecordsApi for FakeRecords {
    async fn list_patients(&self) -> ApiResult<Vec<Patient>> {
        self.record("list".into())?;
        Ok(self.patients())
    }

    async fn get_patient(&self, reg_no: &RegNo) -> ApiResult<Patient> {
        self.record(format!("get {reg_no}"))?;
        self.patients()
            .into_iter()
            .find(|p| p.reg_no == reg_no.as_str())
            .ok_or(ApiError::Status {
                status: 404,
                body: "Record not found".into(),
            })
    }

    async fn create_patient(&self, patient: &Patient) -> ApiResult<Patient> {
        self.record(format!("create {}", patient.reg_no))?;
        let mut created = patient.clone();
        created.id = Some(format!("id-{}", patient.reg_no));
        self.patients.lock().expect("patients lock").push(created.clone());
        Ok(created)
    }

    async fn add_visit(&self, reg_no: &RegNo, visit: &NewVisit) -> ApiResult<Visit> {
        self.record(format!("visit {reg_no}"))?;
        let created = Visit {
            id: Some("visit-id".into()),
            date: None,
            investigation: visit.investigation.clone(),
            treatment_given: visit.treatment_given.clone(),
        };
        if let Some(patient) = self
            .patients
            .lock()
            .expect("patients lock")
            .iter_mut()
            .find(|p| p.reg_no == reg_no.as_str())
        {
            patient.visits.push(created.clone());
        }
        Ok(created)
    }
}

/// Extraction service returning a canned record.
pub(crate) struct FakeExtraction {
    response: serde_json::Value,
    failing: AtomicBool,
    uploads: Mutex<Vec<ImageUpload>>,
}

impl FakeExtraction {
    pub(crate) fn returning(response: serde_json::Value) -> Self {
        Self {
            response,
            failing: AtomicBool::new(false),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn uploads(&self) -> Vec<ImageUpload> {
        self.uploads.lock().expect("uploads lock").clone()
    }
}

#[async_trait]
impl ExtractionApi for FakeExtraction {
    async fn extract(&self, image: &ImageUpload) -> ApiResult<serde_json::Value> {
        self.uploads.lock().expect("uploads lock").push(image.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.response.clone())
    }
}

/// Smallest valid PNG: signature plus an IHDR chunk header.
pub(crate) const PNG_BYTES: [u8; 16] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
];
