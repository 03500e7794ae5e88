//! Treatment page: find a patient in the fetched list, then record a visit.

use super::visit::VisitForm;
use super::{LoadState, PatientList};
use crate::directory::{SearchField, SearchOutcome};
use crate::models::Patient;
use crate::service::RecordsApi;
use crate::{RecordsError, RecordsResult};

#[derive(Debug, Default)]
pub struct TreatmentPage {
    list: PatientList,
}

impl TreatmentPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, api: &dyn RecordsApi) -> RecordsResult<()> {
        self.list.load(api).await
    }

    pub fn state(&self) -> &LoadState {
        &self.list.state
    }

    /// First patient matching the query, with a visit form opened for them.
    ///
    /// # Errors
    ///
    /// Returns `RecordsError::PatientNotFound` when nothing matches, including for a
    /// blank query.
    pub fn find(&self, query: &str, field: SearchField) -> RecordsResult<(&Patient, VisitForm)> {
        let found = match self.list.directory.search(query, field) {
            SearchOutcome::Results(found) => found.into_iter().next(),
            SearchOutcome::Inactive => None,
        };
        let patient = found.ok_or(RecordsError::PatientNotFound)?;
        Ok((patient, VisitForm::new(Some(&patient.reg_no))))
    }
}
