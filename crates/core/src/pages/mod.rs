//! Page workflows.
//!
//! Each page owns the state its screen needs between user actions and talks to the
//! remote services only through [`crate::service`]. Pages never render; they hand
//! view data and [`Notice`]s back to the caller.

pub mod dashboard;
pub mod detail;
pub mod extraction;
pub mod patients;
pub mod registration;
pub mod reports;
pub mod treatment;
pub mod visit;

use crate::directory::PatientDirectory;
use crate::error::{ApiAction, ApiError};
use crate::models::Patient;
use crate::notice::Notice;
use crate::service::RecordsApi;
use crate::{RecordsError, RecordsResult};

/// Fetch state of a page that loads the patient list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded,
    /// The fetch failed; holds the message shown next to the retry control.
    Failed(String),
}

/// The patient list a page has fetched, with the state of the last fetch.
#[derive(Debug, Default)]
pub(crate) struct PatientList {
    pub(crate) directory: PatientDirectory,
    pub(crate) state: LoadState,
}

impl PatientList {
    /// Fetch the patient list once. On failure the previous list is kept and the
    /// state moves to [`LoadState::Failed`].
    pub(crate) async fn load(&mut self, api: &dyn RecordsApi) -> RecordsResult<()> {
        match fetch_patients(api).await {
            Ok(patients) => {
                self.directory = PatientDirectory::new(patients);
                self.state = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                self.state = LoadState::Failed(e.user_message(ApiAction::Load).to_string());
                Err(e.into())
            }
        }
    }
}

/// Notice for a failed page action.
///
/// Service failures collapse to the generic load or save wording; validation and
/// session errors are shown as-is.
pub fn failure_notice(err: &RecordsError, action: ApiAction) -> Notice {
    match err {
        RecordsError::Api(api) => Notice::error(api.user_message(action)),
        other => Notice::error(other.to_string()),
    }
}

/// Fetch the full patient list, logging the failure before handing it back.
pub(crate) async fn fetch_patients(api: &dyn RecordsApi) -> Result<Vec<Patient>, ApiError> {
    let patients = api.list_patients().await.inspect_err(|e| {
        tracing::error!("failed to fetch patients: {}", e);
    })?;
    tracing::debug!("fetched {} patients", patients.len());
    Ok(patients)
}
