//! New-patient registration wizard.
//!
//! Three linear steps over one shared form. Moving between steps never validates;
//! required fields are checked once, at submit, before any request is made.

use crate::models::{Ailment, NewVisit, OtherAilments, Patient, Visit};
use crate::notice::Notice;
use crate::service::RecordsApi;
use crate::{RecordsError, RecordsResult};
use chrono::{SecondsFormat, Utc};
use healthrecs_types::RegNo;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    #[default]
    Personal = 1,
    Contact = 2,
    Medical = 3,
}

impl Step {
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Step for `n`, clamped to the first and last step.
    pub fn clamped(n: i64) -> Self {
        match n {
            i64::MIN..=1 => Step::Personal,
            2 => Step::Contact,
            _ => Step::Medical,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Personal => "Personal Information",
            Step::Contact => "Contact Details",
            Step::Medical => "Medical Information",
        }
    }

    /// Wire names of the fields collected on this step.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Step::Personal => &[
                "regNo",
                "name",
                "dob",
                "age",
                "sex",
                "caste",
                "mothersName",
                "relatives",
                "previousOccupation",
                "dateOfAdmission",
            ],
            Step::Contact => &["mobileNo", "aadharNo", "address"],
            Step::Medical => &[
                "bloodGroup",
                "mbOrPbStatus",
                "deformityStatus",
                "durationOfDisease",
                "disablitiyStatus",
                "otherAilments",
            ],
        }
    }
}

/// Editable registration form. Every field is raw text as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub reg_no: String,
    pub name: String,
    pub dob: String,
    pub age: String,
    pub sex: String,
    pub caste: String,
    pub mothers_name: String,
    pub relatives: String,
    pub previous_occupation: String,
    pub date_of_admission: String,
    pub mobile_no: String,
    pub aadhar_no: String,
    pub address: String,
    pub blood_group: String,
    pub mb_or_pb_status: String,
    pub deformity_status: String,
    pub duration_of_disease: String,
    pub disability_status: String,
    pub other_ailments: OtherAilments,
    /// Optional first visit recorded together with the registration.
    pub first_visit: Option<NewVisit>,
}

impl PatientForm {
    pub fn toggle_ailment(&mut self, ailment: Ailment) {
        let present = self.other_ailments.has(ailment);
        self.other_ailments.set(ailment, !present);
    }

    /// Check the required fields and assemble the record to post.
    ///
    /// # Errors
    ///
    /// - `RecordsError::MissingField` for a blank `regNo`, `name`, `age`, `sex` or `mobileNo`.
    /// - `RecordsError::Text` if the registration number cannot be used in a route.
    /// - `RecordsError::InvalidInput` if `age` is not a non-negative whole number.
    pub fn to_patient(&self) -> RecordsResult<Patient> {
        let required = [
            ("regNo", &self.reg_no),
            ("name", &self.name),
            ("age", &self.age),
            ("sex", &self.sex),
            ("mobileNo", &self.mobile_no),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(RecordsError::MissingField(*field));
        }

        let reg_no = RegNo::parse(&self.reg_no)?;
        let age: u32 = self.age.trim().parse().map_err(|_| {
            RecordsError::InvalidInput(format!(
                "age must be a non-negative whole number: {:?}",
                self.age
            ))
        })?;

        let visits = self
            .first_visit
            .iter()
            .filter(|v| !v.investigation.trim().is_empty() || !v.treatment_given.trim().is_empty())
            .map(|v| Visit {
                id: None,
                date: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
                investigation: v.investigation.trim().to_string(),
                treatment_given: v.treatment_given.trim().to_string(),
            })
            .collect();

        Ok(Patient {
            id: None,
            reg_no: reg_no.as_str().to_string(),
            name: self.name.trim().to_string(),
            dob: self.dob.trim().to_string(),
            age: Some(age),
            sex: self.sex.trim().to_string(),
            caste: self.caste.trim().to_string(),
            mobile_no: self.mobile_no.trim().to_string(),
            aadhar_no: self.aadhar_no.trim().to_string(),
            address: self.address.trim().to_string(),
            date_of_admission: self.date_of_admission.trim().to_string(),
            mothers_name: self.mothers_name.trim().to_string(),
            relatives: self.relatives.trim().to_string(),
            blood_group: self.blood_group.trim().to_string(),
            mb_or_pb_status: self.mb_or_pb_status.trim().to_string(),
            deformity_status: self.deformity_status.trim().to_string(),
            duration_of_disease: self.duration_of_disease.trim().to_string(),
            previous_occupation: self.previous_occupation.trim().to_string(),
            disability_status: self.disability_status.trim().to_string(),
            other_ailments: Some(self.other_ailments.clone()),
            visits,
            created_at: None,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WizardState {
    #[default]
    Editing,
    /// Registration succeeded; holds the registration number that was submitted.
    Confirmed { reg_no: String },
}

#[derive(Clone, Debug, Default)]
pub struct RegistrationWizard {
    step: Step,
    form: PatientForm,
    state: WizardState,
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn form(&self) -> &PatientForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PatientForm {
        &mut self.form
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn next(&mut self) -> Step {
        self.go_to(i64::from(self.step.number()) + 1)
    }

    pub fn back(&mut self) -> Step {
        self.go_to(i64::from(self.step.number()) - 1)
    }

    pub fn go_to(&mut self, n: i64) -> Step {
        self.step = Step::clamped(n);
        self.step
    }

    /// Replace the form with one mapped from an extraction result.
    pub fn apply_extracted(&mut self, form: PatientForm) -> Notice {
        self.form = form;
        Notice::success("Data imported successfully").with_description(
            "The form has been populated with the extracted data. Please review and update if needed.",
        )
    }

    /// Validate and post the form. One attempt per call.
    ///
    /// On any failure the step and the form are left as they were.
    pub async fn submit(&mut self, api: &dyn RecordsApi) -> RecordsResult<Notice> {
        let patient = self.form.to_patient()?;
        let created = api.create_patient(&patient).await.map_err(|e| {
            tracing::error!("failed to register patient {}: {}", patient.reg_no, e);
            RecordsError::Api(e)
        })?;
        tracing::info!(
            "registered patient {} (server id {:?})",
            patient.reg_no,
            created.id
        );

        self.state = WizardState::Confirmed {
            reg_no: patient.reg_no,
        };
        Ok(Notice::success("Patient registered successfully!")
            .with_description("The patient has been added to the system."))
    }
}
