//! Patients page: tabbed triage view with field search.

use super::{LoadState, PatientList};
use crate::directory::{SearchField, SearchOutcome, Tab, TabCounts};
use crate::models::Patient;
use crate::service::RecordsApi;
use crate::RecordsResult;

#[derive(Debug, Default)]
pub struct PatientsPage {
    list: PatientList,
    tab: Tab,
    query: String,
    field: SearchField,
}

impl PatientsPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the patient list once. On failure the previous list is kept and the
    /// page moves to [`LoadState::Failed`] until [`retry`](Self::retry) succeeds.
    pub async fn load(&mut self, api: &dyn RecordsApi) -> RecordsResult<()> {
        self.list.load(api).await
    }

    pub async fn retry(&mut self, api: &dyn RecordsApi) -> RecordsResult<()> {
        self.load(api).await
    }

    pub fn state(&self) -> &LoadState {
        &self.list.state
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn search(&mut self, query: &str, field: SearchField) {
        self.query = query.to_string();
        self.field = field;
    }

    pub fn clear_search(&mut self) {
        self.query.clear();
    }

    pub fn is_searching(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Search results while a query is active, otherwise the selected tab.
    pub fn displayed(&self) -> Vec<&Patient> {
        match self.list.directory.search(&self.query, self.field) {
            SearchOutcome::Results(found) => found,
            SearchOutcome::Inactive => self.list.directory.by_tab(self.tab),
        }
    }

    pub fn tab_counts(&self) -> TabCounts {
        self.list.directory.tab_counts()
    }
}
