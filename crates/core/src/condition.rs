//! Triage classification derived from a patient's ailment flags.
//!
//! The label is never stored; it is recomputed from the latest fetched record
//! every time a view is built.

use crate::models::{Ailment, OtherAilments, Patient};
use serde::Serialize;

const CRITICAL: [Ailment; 3] = [
    Ailment::Cancer,
    Ailment::Tuberculosis,
    Ailment::IschemicHeartDisease,
];

const FOLLOW_UP: [Ailment; 4] = [
    Ailment::Hypertension,
    Ailment::Parkinsons,
    Ailment::MajorSurgery,
    Ailment::Relapse,
];

/// Derived triage label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Critical,
    #[serde(rename = "followup")]
    FollowUp,
    Stable,
}

impl Condition {
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Critical => "critical",
            Condition::FollowUp => "followup",
            Condition::Stable => "stable",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an ailment mapping. First match wins: critical, then follow-up, then stable.
pub fn classify(ailments: Option<&OtherAilments>) -> Condition {
    let Some(ailments) = ailments else {
        return Condition::Stable;
    };

    if CRITICAL.iter().any(|a| ailments.has(*a)) {
        Condition::Critical
    } else if FOLLOW_UP.iter().any(|a| ailments.has(*a)) {
        Condition::FollowUp
    } else {
        Condition::Stable
    }
}

pub fn classify_patient(patient: &Patient) -> Condition {
    classify(patient.other_ailments.as_ref())
}

/// Status shown on a patient card.
///
/// `New` is reserved for records that carry no ailment data at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardStatus {
    Condition(Condition),
    New,
}

impl CardStatus {
    pub fn for_patient(patient: &Patient) -> Self {
        match patient.other_ailments {
            Some(_) => CardStatus::Condition(classify_patient(patient)),
            None => CardStatus::New,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CardStatus::Condition(Condition::Critical) => "Critical Attention",
            CardStatus::Condition(Condition::FollowUp) => "Follow-up Required",
            CardStatus::Condition(Condition::Stable) => "Stable",
            CardStatus::New => "New Patient",
        }
    }
}
