//! In-memory patient directory with field search and triage tabs.
//!
//! The full patient list is fetched once per page load and every search or tab
//! change is answered from memory.

use crate::condition::{classify_patient, Condition};
use crate::models::Patient;
use crate::RecordsError;
use std::str::FromStr;

/// Field a search query is matched against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchField {
    #[default]
    Name,
    Aadhar,
    RegNo,
    Phone,
}

impl SearchField {
    fn value(self, patient: &Patient) -> &str {
        match self {
            SearchField::Name => &patient.name,
            SearchField::Aadhar => &patient.aadhar_no,
            SearchField::RegNo => &patient.reg_no,
            SearchField::Phone => &patient.mobile_no,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::Aadhar => "Aadhar number",
            SearchField::RegNo => "registration number",
            SearchField::Phone => "phone",
        }
    }
}

impl FromStr for SearchField {
    type Err = RecordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SearchField::Name),
            "aadhar" | "aadharno" => Ok(SearchField::Aadhar),
            "regno" | "reg-no" | "reg" => Ok(SearchField::RegNo),
            "phone" | "mobile" | "mobileno" => Ok(SearchField::Phone),
            other => Err(RecordsError::InvalidInput(format!(
                "unknown search field: {other}"
            ))),
        }
    }
}

/// Triage tab of the patients page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    All,
    Critical,
    FollowUp,
    Stable,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::All, Tab::Critical, Tab::FollowUp, Tab::Stable];

    fn admits(self, condition: Condition) -> bool {
        match self {
            Tab::All => true,
            Tab::Critical => condition == Condition::Critical,
            Tab::FollowUp => condition == Condition::FollowUp,
            Tab::Stable => condition == Condition::Stable,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::All => "All Patients",
            Tab::Critical => "Critical",
            Tab::FollowUp => "Follow-up",
            Tab::Stable => "Stable",
        }
    }
}

impl FromStr for Tab {
    type Err = RecordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Tab::All),
            "critical" => Ok(Tab::Critical),
            "followup" | "follow-up" => Ok(Tab::FollowUp),
            "stable" => Ok(Tab::Stable),
            other => Err(RecordsError::InvalidInput(format!("unknown tab: {other}"))),
        }
    }
}

/// Result of a search request.
///
/// An empty query is not an empty result: it switches filtering off so the caller
/// can fall back to the tabbed view.
#[derive(Debug, PartialEq)]
pub enum SearchOutcome<'a> {
    Inactive,
    Results(Vec<&'a Patient>),
}

/// Patient counts per tab.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TabCounts {
    pub all: usize,
    pub critical: usize,
    pub follow_up: usize,
    pub stable: usize,
}

impl TabCounts {
    pub fn get(&self, tab: Tab) -> usize {
        match tab {
            Tab::All => self.all,
            Tab::Critical => self.critical,
            Tab::FollowUp => self.follow_up,
            Tab::Stable => self.stable,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PatientDirectory {
    patients: Vec<Patient>,
}

impl PatientDirectory {
    pub fn new(patients: Vec<Patient>) -> Self {
        Self { patients }
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Case-insensitive substring search over one field.
    ///
    /// The query is trimmed first; a blank query yields [`SearchOutcome::Inactive`].
    pub fn search(&self, query: &str, field: SearchField) -> SearchOutcome<'_> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return SearchOutcome::Inactive;
        }

        SearchOutcome::Results(
            self.patients
                .iter()
                .filter(|p| field.value(p).to_lowercase().contains(&needle))
                .collect(),
        )
    }

    pub fn by_tab(&self, tab: Tab) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|p| tab.admits(classify_patient(p)))
            .collect()
    }

    pub fn tab_counts(&self) -> TabCounts {
        let mut counts = TabCounts {
            all: self.patients.len(),
            ..TabCounts::default()
        };
        for patient in &self.patients {
            match classify_patient(patient) {
                Condition::Critical => counts.critical += 1,
                Condition::FollowUp => counts.follow_up += 1,
                Condition::Stable => counts.stable += 1,
            }
        }
        counts
    }
}
