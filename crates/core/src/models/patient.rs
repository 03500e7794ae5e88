//! Patient and visit wire models.
//!
//! Field names follow the records service exactly (camelCase, `_id` for the server
//! identifier). The backend spells the disability field `disablitiyStatus`; it is
//! written with that spelling and accepted in either spelling on read.
//!
//! Decoding is lenient: `null` text fields and visit lists become empty and a non-numeric
//! `age` becomes `None`, so one sloppy record never sinks a whole list fetch.

use super::ailments::{ActiveAilment, OtherAilments};
use chrono::{DateTime, FixedOffset};
use healthrecs_types::{RegNo, TextError};
use serde::{Deserialize, Deserializer, Serialize};

/// A single recorded clinical encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub investigation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub treatment_given: String,
}

/// Request body appending a visit to a patient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisit {
    pub investigation: String,
    pub treatment_given: String,
}

/// Server-owned patient record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reg_no: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dob: String,
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sex: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub caste: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mobile_no: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub aadhar_no: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date_of_admission: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mothers_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relatives: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub blood_group: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mb_or_pb_status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deformity_status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration_of_disease: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub previous_occupation: String,
    #[serde(
        rename = "disablitiyStatus",
        alias = "disabilityStatus",
        default,
        deserialize_with = "null_as_default"
    )]
    pub disability_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_ailments: Option<OtherAilments>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visits: Vec<Visit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Patient {
    /// The registration number as a route-safe key.
    pub fn reg_no(&self) -> Result<RegNo, TextError> {
        RegNo::parse(&self.reg_no)
    }

    /// The most recent visit, i.e. the last one in server order.
    pub fn last_visit(&self) -> Option<&Visit> {
        self.visits.last()
    }

    pub fn active_ailments(&self) -> Vec<ActiveAilment> {
        self.other_ailments
            .as_ref()
            .map(OtherAilments::active)
            .unwrap_or_default()
    }

    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.created_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }

    pub fn sex_label(&self) -> &'static str {
        sex_label(&self.sex)
    }
}

/// Display form of the stored sex code.
pub fn sex_label(sex: &str) -> &'static str {
    match sex {
        "M" => "Male",
        "F" => "Female",
        _ => "Other",
    }
}

/// The `n` most recently created patients, newest first.
///
/// Records without a parseable `createdAt` sort after every dated record and keep
/// their server order among themselves.
pub fn recent_patients(patients: &[Patient], n: usize) -> Vec<&Patient> {
    let mut sorted: Vec<&Patient> = patients.iter().collect();
    sorted.sort_by(|a, b| match (a.created_at(), b.created_at()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    sorted.truncate(n);
    sorted
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
