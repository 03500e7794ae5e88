//! Comorbidity flags recorded against a patient (`otherAilments`).
//!
//! The map is sparse: a key that is absent means the condition is not present.
//! Keys outside the labelled vocabulary are kept and round-tripped untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ailments the clinic records with a display label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ailment {
    Hypertension,
    IschemicHeartDisease,
    BronchialAsthma,
    Cancer,
    Tuberculosis,
    Parkinsons,
    Bph,
    Tkr,
    SkinDisease,
    Relapse,
    MajorSurgery,
}

/// Badge tone used when listing a patient's active ailments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AilmentTone {
    Critical,
    Warning,
    Normal,
}

impl Ailment {
    pub const ALL: [Ailment; 11] = [
        Ailment::Hypertension,
        Ailment::IschemicHeartDisease,
        Ailment::BronchialAsthma,
        Ailment::Cancer,
        Ailment::Tuberculosis,
        Ailment::Parkinsons,
        Ailment::Bph,
        Ailment::Tkr,
        Ailment::SkinDisease,
        Ailment::Relapse,
        Ailment::MajorSurgery,
    ];

    /// Wire key inside `otherAilments`.
    pub fn key(self) -> &'static str {
        match self {
            Ailment::Hypertension => "hypertension",
            Ailment::IschemicHeartDisease => "ischemicHeartDisease",
            Ailment::BronchialAsthma => "bronchialAsthma",
            Ailment::Cancer => "cancer",
            Ailment::Tuberculosis => "tuberculosis",
            Ailment::Parkinsons => "parkinsons",
            Ailment::Bph => "bph",
            Ailment::Tkr => "tkr",
            Ailment::SkinDisease => "skinDisease",
            Ailment::Relapse => "relapse",
            Ailment::MajorSurgery => "majorSurgery",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Ailment::Hypertension => "Hypertension",
            Ailment::IschemicHeartDisease => "Ischemic Heart Disease",
            Ailment::BronchialAsthma => "Bronchial Asthma",
            Ailment::Cancer => "Cancer",
            Ailment::Tuberculosis => "Tuberculosis",
            Ailment::Parkinsons => "Parkinson's Disease",
            Ailment::Bph => "Benign Prostatic Hyperplasia",
            Ailment::Tkr => "Total Knee Replacement",
            Ailment::SkinDisease => "Skin Disease",
            Ailment::Relapse => "Relapse",
            Ailment::MajorSurgery => "Major Surgery",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.key() == key)
    }

    // Major surgery drives follow-up triage but is not highlighted on the badge.
    pub fn tone(self) -> AilmentTone {
        match self {
            Ailment::Cancer | Ailment::Tuberculosis | Ailment::IschemicHeartDisease => {
                AilmentTone::Critical
            }
            Ailment::Hypertension | Ailment::Parkinsons | Ailment::Relapse => AilmentTone::Warning,
            _ => AilmentTone::Normal,
        }
    }
}

/// An active ailment as displayed: the raw key, its label and badge tone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveAilment {
    pub key: String,
    pub label: String,
    pub tone: AilmentTone,
}

/// Sparse `otherAilments` mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OtherAilments(BTreeMap<String, bool>);

impl OtherAilments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, ailment: Ailment) -> bool {
        self.has_key(ailment.key())
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, ailment: Ailment, present: bool) {
        self.set_key(ailment.key(), present);
    }

    pub fn set_key(&mut self, key: impl Into<String>, present: bool) {
        self.0.insert(key.into(), present);
    }

    pub fn with(mut self, ailment: Ailment) -> Self {
        self.set(ailment, true);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys flagged true, in key order.
    pub fn active_keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, present)| **present)
            .map(|(key, _)| key.as_str())
    }

    /// Active ailments with labels; unknown keys are shown verbatim with a normal tone.
    pub fn active(&self) -> Vec<ActiveAilment> {
        self.active_keys()
            .map(|key| match Ailment::from_key(key) {
                Some(ailment) => ActiveAilment {
                    key: key.to_string(),
                    label: ailment.label().to_string(),
                    tone: ailment.tone(),
                },
                None => ActiveAilment {
                    key: key.to_string(),
                    label: key.to_string(),
                    tone: AilmentTone::Normal,
                },
            })
            .collect()
    }
}

impl FromIterator<Ailment> for OtherAilments {
    fn from_iter<I: IntoIterator<Item = Ailment>>(iter: I) -> Self {
        let mut ailments = Self::new();
        for ailment in iter {
            ailments.set(ailment, true);
        }
        ailments
    }
}

impl<'de> Deserialize<'de> for OtherAilments {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Anything other than a literal `true` counts as absent.
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(Self(
            raw.into_iter()
                .map(|(key, value)| (key, value == serde_json::Value::Bool(true)))
                .collect(),
        ))
    }
}
