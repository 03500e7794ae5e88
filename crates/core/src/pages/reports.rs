//! Reports computed locally from the fetched patient list.

use super::detail::{PatientDetailView, VisitRow};
use super::fetch_patients;
use crate::condition::{classify_patient, Condition};
use crate::dates::parse_date;
use crate::models::{Ailment, Patient};
use crate::service::RecordsApi;
use crate::{RecordsError, RecordsResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    MonthlySummary,
    DiseaseDistribution,
    Demographics,
    TreatmentSummary,
    MedicalHistory,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::MonthlySummary,
        ReportKind::DiseaseDistribution,
        ReportKind::Demographics,
        ReportKind::TreatmentSummary,
        ReportKind::MedicalHistory,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::MonthlySummary => "Monthly Patient Summary",
            ReportKind::DiseaseDistribution => "Disease Distribution",
            ReportKind::Demographics => "Patient Demographics",
            ReportKind::TreatmentSummary => "Treatment Summary",
            ReportKind::MedicalHistory => "Medical History",
        }
    }
}

impl FromStr for ReportKind {
    type Err = RecordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "monthly-summary" => Ok(ReportKind::MonthlySummary),
            "disease" | "disease-distribution" => Ok(ReportKind::DiseaseDistribution),
            "demographics" => Ok(ReportKind::Demographics),
            "treatment" | "treatment-summary" => Ok(ReportKind::TreatmentSummary),
            "history" | "medical-history" => Ok(ReportKind::MedicalHistory),
            other => Err(RecordsError::InvalidInput(format!(
                "unknown report: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CountRow {
    pub label: String,
    pub count: usize,
}

impl CountRow {
    fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthRow {
    /// `YYYY-MM`
    pub month: String,
    pub registrations: usize,
    pub visits: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentRow {
    pub reg_no: String,
    pub name: String,
    pub visits: usize,
    pub last_treatment: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryProfile {
    pub reg_no: String,
    pub name: String,
    pub age_sex: String,
    pub blood_group: String,
    pub leprosy_class: String,
    pub status: String,
    pub ailments: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportBody {
    #[serde(rename_all = "camelCase")]
    MonthlySummary {
        months: Vec<MonthRow>,
        undated_registrations: usize,
        undated_visits: usize,
    },
    DiseaseDistribution {
        ailments: Vec<CountRow>,
        conditions: Vec<CountRow>,
    },
    #[serde(rename_all = "camelCase")]
    Demographics {
        sex: Vec<CountRow>,
        age_bands: Vec<CountRow>,
    },
    #[serde(rename_all = "camelCase")]
    TreatmentSummary {
        total_visits: usize,
        patients_with_visits: usize,
        rows: Vec<TreatmentRow>,
    },
    MedicalHistory {
        profile: HistoryProfile,
        visits: Vec<VisitRow>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub body: ReportBody,
}

/// Fetch the patient list and compute a report as of now.
pub async fn build_report(
    api: &dyn RecordsApi,
    kind: ReportKind,
    reg_no: Option<&str>,
) -> RecordsResult<Report> {
    let patients = fetch_patients(api).await?;
    generate(kind, &patients, reg_no, Utc::now())
}

/// Compute a report over `patients`.
///
/// # Errors
///
/// The medical history report needs `reg_no`: `RecordsError::MissingRegNo` when it
/// is absent and `RecordsError::PatientNotFound` when no patient has it.
pub fn generate(
    kind: ReportKind,
    patients: &[Patient],
    reg_no: Option<&str>,
    generated_at: DateTime<Utc>,
) -> RecordsResult<Report> {
    let body = match kind {
        ReportKind::MonthlySummary => monthly_summary(patients),
        ReportKind::DiseaseDistribution => disease_distribution(patients),
        ReportKind::Demographics => demographics(patients),
        ReportKind::TreatmentSummary => treatment_summary(patients),
        ReportKind::MedicalHistory => {
            let reg_no = reg_no
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or(RecordsError::MissingRegNo)?;
            let patient = patients
                .iter()
                .find(|p| p.reg_no == reg_no)
                .ok_or(RecordsError::PatientNotFound)?;
            medical_history(patient)
        }
    };
    tracing::debug!("generated {} over {} patients", kind.title(), patients.len());

    Ok(Report {
        kind,
        title: kind.title().to_string(),
        generated_at,
        body,
    })
}

fn monthly_summary(patients: &[Patient]) -> ReportBody {
    let mut months: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    let mut undated_registrations = 0;
    let mut undated_visits = 0;

    for patient in patients {
        match patient.created_at() {
            Some(created) => months.entry(created.format("%Y-%m").to_string()).or_default().0 += 1,
            None => undated_registrations += 1,
        }
        for visit in &patient.visits {
            match visit.date.as_deref().and_then(parse_date) {
                Some(date) => months.entry(date.format("%Y-%m").to_string()).or_default().1 += 1,
                None => undated_visits += 1,
            }
        }
    }

    ReportBody::MonthlySummary {
        months: months
            .into_iter()
            .map(|(month, (registrations, visits))| MonthRow {
                month,
                registrations,
                visits,
            })
            .collect(),
        undated_registrations,
        undated_visits,
    }
}

fn disease_distribution(patients: &[Patient]) -> ReportBody {
    let mut ailments: Vec<CountRow> = Ailment::ALL
        .iter()
        .map(|ailment| {
            let count = patients
                .iter()
                .filter(|p| p.other_ailments.as_ref().is_some_and(|a| a.has(*ailment)))
                .count();
            CountRow::new(ailment.label(), count)
        })
        .collect();
    ailments.sort_by(|a, b| b.count.cmp(&a.count));

    let conditions = [
        (Condition::Critical, "Critical"),
        (Condition::FollowUp, "Follow-up"),
        (Condition::Stable, "Stable"),
    ]
    .into_iter()
    .map(|(condition, label)| {
        let count = patients
            .iter()
            .filter(|p| classify_patient(p) == condition)
            .count();
        CountRow::new(label, count)
    })
    .collect();

    ReportBody::DiseaseDistribution {
        ailments,
        conditions,
    }
}

const AGE_BANDS: [(&str, u32, u32); 4] = [
    ("0-17", 0, 17),
    ("18-39", 18, 39),
    ("40-59", 40, 59),
    ("60+", 60, u32::MAX),
];

fn demographics(patients: &[Patient]) -> ReportBody {
    let sex = ["Male", "Female", "Other"]
        .into_iter()
        .map(|label| {
            let count = patients.iter().filter(|p| p.sex_label() == label).count();
            CountRow::new(label, count)
        })
        .collect();

    let mut age_bands: Vec<CountRow> = AGE_BANDS
        .iter()
        .map(|(label, low, high)| {
            let count = patients
                .iter()
                .filter(|p| p.age.is_some_and(|age| (*low..=*high).contains(&age)))
                .count();
            CountRow::new(*label, count)
        })
        .collect();
    age_bands.push(CountRow::new(
        "Unknown",
        patients.iter().filter(|p| p.age.is_none()).count(),
    ));

    ReportBody::Demographics { sex, age_bands }
}

fn treatment_summary(patients: &[Patient]) -> ReportBody {
    let rows: Vec<TreatmentRow> = patients
        .iter()
        .filter_map(|p| {
            let last = p.last_visit()?;
            Some(TreatmentRow {
                reg_no: p.reg_no.clone(),
                name: p.name.clone(),
                visits: p.visits.len(),
                last_treatment: last.treatment_given.clone(),
            })
        })
        .collect();

    ReportBody::TreatmentSummary {
        total_visits: rows.iter().map(|r| r.visits).sum(),
        patients_with_visits: rows.len(),
        rows,
    }
}

fn medical_history(patient: &Patient) -> ReportBody {
    let view = PatientDetailView::from_patient(patient);
    ReportBody::MedicalHistory {
        profile: HistoryProfile {
            reg_no: view.reg_no,
            name: view.name,
            age_sex: view.age_sex,
            blood_group: view.blood_group,
            leprosy_class: view.leprosy_class,
            status: view.status.label().to_string(),
            ailments: view.ailments.into_iter().map(|a| a.label).collect(),
        },
        visits: view.visits,
    }
}

// ============================================================================
// TEXT RENDERING
// ============================================================================

fn write_counts(f: &mut fmt::Formatter<'_>, heading: &str, rows: &[CountRow]) -> fmt::Result {
    writeln!(f, "{heading}")?;
    for row in rows {
        writeln!(f, "  {:<32} {:>5}", row.label, row.count)?;
    }
    Ok(())
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(
            f,
            "Generated {}",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        )?;
        writeln!(f)?;

        match &self.body {
            ReportBody::MonthlySummary {
                months,
                undated_registrations,
                undated_visits,
            } => {
                writeln!(f, "  {:<10} {:>13} {:>7}", "Month", "Registrations", "Visits")?;
                for row in months {
                    writeln!(
                        f,
                        "  {:<10} {:>13} {:>7}",
                        row.month, row.registrations, row.visits
                    )?;
                }
                if *undated_registrations > 0 || *undated_visits > 0 {
                    writeln!(
                        f,
                        "  {:<10} {:>13} {:>7}",
                        "Undated", undated_registrations, undated_visits
                    )?;
                }
            }
            ReportBody::DiseaseDistribution {
                ailments,
                conditions,
            } => {
                write_counts(f, "Ailments", ailments)?;
                writeln!(f)?;
                write_counts(f, "Conditions", conditions)?;
            }
            ReportBody::Demographics { sex, age_bands } => {
                write_counts(f, "Sex", sex)?;
                writeln!(f)?;
                write_counts(f, "Age", age_bands)?;
            }
            ReportBody::TreatmentSummary {
                total_visits,
                patients_with_visits,
                rows,
            } => {
                writeln!(
                    f,
                    "{total_visits} visits across {patients_with_visits} patients"
                )?;
                for row in rows {
                    writeln!(
                        f,
                        "  {:<16} {:<24} {:>3}  {}",
                        row.reg_no, row.name, row.visits, row.last_treatment
                    )?;
                }
            }
            ReportBody::MedicalHistory { profile, visits } => {
                writeln!(f, "{} ({})", profile.name, profile.reg_no)?;
                writeln!(f, "{}", profile.age_sex)?;
                writeln!(f, "Blood group: {}", profile.blood_group)?;
                writeln!(f, "Leprosy classification: {}", profile.leprosy_class)?;
                writeln!(f, "Status: {}", profile.status)?;
                if !profile.ailments.is_empty() {
                    writeln!(f, "Ailments: {}", profile.ailments.join(", "))?;
                }
                writeln!(f)?;
                if visits.is_empty() {
                    writeln!(f, "No visits recorded.")?;
                }
                for visit in visits {
                    writeln!(f, "{}", visit.date)?;
                    writeln!(f, "  Investigation: {}", visit.investigation)?;
                    writeln!(f, "  Treatment: {}", visit.treatment_given)?;
                }
            }
        }
        Ok(())
    }
}
