//! Visit entry for one patient.

use crate::models::NewVisit;
use crate::notice::Notice;
use crate::service::RecordsApi;
use crate::{RecordsError, RecordsResult};
use healthrecs_types::{NonEmptyText, RegNo};

/// Form appending a visit to the patient identified by `reg_no`.
///
/// The registration number comes from the route or the caller's navigation state
/// and may be absent; that is only rejected on submit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisitForm {
    reg_no: Option<String>,
    pub investigation: String,
    pub treatment_given: String,
}

impl VisitForm {
    pub fn new(reg_no: Option<&str>) -> Self {
        Self {
            reg_no: reg_no.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn reg_no(&self) -> Option<&str> {
        self.reg_no.as_deref()
    }

    /// Post the visit.
    ///
    /// Success clears both text fields; failure keeps them for resubmission.
    ///
    /// # Errors
    ///
    /// Returns `RecordsError::MissingRegNo` for an absent or blank registration number
    /// and `RecordsError::MissingField` for blank text, in both cases before any
    /// request is made.
    pub async fn submit(&mut self, api: &dyn RecordsApi) -> RecordsResult<Notice> {
        let raw = self
            .reg_no
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(RecordsError::MissingRegNo)?;
        let reg_no = RegNo::parse(raw)?;

        let investigation = NonEmptyText::new(&self.investigation)
            .map_err(|_| RecordsError::MissingField("investigation"))?;
        let treatment_given = NonEmptyText::new(&self.treatment_given)
            .map_err(|_| RecordsError::MissingField("treatmentGiven"))?;

        let visit = NewVisit {
            investigation: investigation.to_string(),
            treatment_given: treatment_given.to_string(),
        };
        api.add_visit(&reg_no, &visit).await.map_err(|e| {
            tracing::error!("failed to add visit for {}: {}", reg_no, e);
            RecordsError::Api(e)
        })?;
        tracing::info!("added visit for {}", reg_no);

        self.investigation.clear();
        self.treatment_given.clear();
        Ok(Notice::success("Visit added successfully"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_patients, FakeRecords};

    fn filled(reg_no: Option<&str>) -> VisitForm {
        VisitForm {
            investigation: "Nerve conduction".into(),
            treatment_given: "Rifampicin".into(),
            ..VisitForm::new(reg_no)
        }
    }

    #[tokio::test]
    async fn test_missing_reg_no_rejected_before_request() {
        let api = FakeRecords::with_patients(sample_patients());

        for reg_no in [None, Some(""), Some("   ")] {
            let mut form = filled(reg_no);
            let err = form.submit(&api).await.expect_err("should be rejected");
            assert!(matches!(err, RecordsError::MissingRegNo));
            assert_eq!(err.to_string(), "Registration number is missing.");
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_success_clears_form() {
        let api = FakeRecords::with_patients(sample_patients());
        let mut form = filled(Some("REG-2023-0039"));

        let notice = form.submit(&api).await.expect("should succeed");
        assert_eq!(notice.title, "Visit added successfully");
        assert!(form.investigation.is_empty());
        assert!(form.treatment_given.is_empty());
        assert_eq!(form.reg_no(), Some("REG-2023-0039"));
        assert_eq!(api.calls(), vec!["visit REG-2023-0039"]);
        assert_eq!(api.patients()[1].visits.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_preserves_text() {
        let api = FakeRecords::default();
        api.set_failing(true);
        let mut form = filled(Some("REG-1"));

        assert!(form.submit(&api).await.is_err());
        assert_eq!(form, filled(Some("REG-1")));
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected() {
        let api = FakeRecords::default();
        let mut form = VisitForm {
            investigation: "Review".into(),
            ..VisitForm::new(Some("REG-1"))
        };
        let err = form.submit(&api).await.expect_err("should be rejected");
        assert!(matches!(err, RecordsError::MissingField("treatmentGiven")));
        assert!(api.calls().is_empty());
    }
}
