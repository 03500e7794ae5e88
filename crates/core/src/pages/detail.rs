//! Patient detail: profile, condition badge, active ailments and visit history.

use crate::condition::CardStatus;
use crate::dates::{format_visit_date, NOT_RECORDED};
use crate::models::{ActiveAilment, Patient};
use crate::service::RecordsApi;
use crate::{RecordsError, RecordsResult};
use healthrecs_types::RegNo;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRow {
    pub date: String,
    pub investigation: String,
    pub treatment_given: String,
}

/// Everything the detail screen shows, already formatted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientDetailView {
    pub reg_no: String,
    pub name: String,
    pub age_sex: String,
    pub blood_group: String,
    pub leprosy_class: String,
    pub mobile_no: String,
    pub address: String,
    pub status: CardStatus,
    pub ailments: Vec<ActiveAilment>,
    pub visits: Vec<VisitRow>,
}

impl PatientDetailView {
    pub fn from_patient(patient: &Patient) -> Self {
        let or_not_recorded = |value: &str| {
            if value.trim().is_empty() {
                NOT_RECORDED.to_string()
            } else {
                value.to_string()
            }
        };
        let age = match patient.age {
            Some(age) => format!("{age} years"),
            None => "Age not recorded".to_string(),
        };

        Self {
            reg_no: patient.reg_no.clone(),
            name: patient.name.clone(),
            age_sex: format!("{age}, {}", patient.sex_label()),
            blood_group: or_not_recorded(&patient.blood_group),
            leprosy_class: or_not_recorded(&patient.mb_or_pb_status),
            mobile_no: or_not_recorded(&patient.mobile_no),
            address: or_not_recorded(&patient.address),
            status: CardStatus::for_patient(patient),
            ailments: patient.active_ailments(),
            visits: patient
                .visits
                .iter()
                .map(|v| VisitRow {
                    date: format_visit_date(v.date.as_deref()),
                    investigation: v.investigation.clone(),
                    treatment_given: v.treatment_given.clone(),
                })
                .collect(),
        }
    }
}

/// Fetch one patient by registration number and build its view.
///
/// # Errors
///
/// Returns `RecordsError::Text` for a registration number that cannot be used in a
/// route, before any request is made, or `RecordsError::Api` if the fetch fails.
pub async fn load_detail(api: &dyn RecordsApi, reg_no: &str) -> RecordsResult<PatientDetailView> {
    let reg_no = RegNo::parse(reg_no)?;
    let patient = api.get_patient(&reg_no).await.map_err(|e| {
        tracing::error!("failed to fetch patient {}: {}", reg_no, e);
        RecordsError::Api(e)
    })?;
    Ok(PatientDetailView::from_patient(&patient))
}
