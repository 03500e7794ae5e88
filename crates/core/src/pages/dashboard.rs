//! Dashboard: headline counts, most recent registrations and quick links.

use super::{LoadState, PatientList};
use crate::auth::{nav_items, NavItem, Page, Role};
use crate::condition::{classify_patient, Condition};
use crate::config::CoreConfig;
use crate::directory::{SearchField, SearchOutcome};
use crate::models::{recent_patients, Patient};
use crate::service::RecordsApi;
use crate::RecordsResult;
use serde::Serialize;

pub const NO_RECENT_PATIENTS: &str = "No recent patients found.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub critical: usize,
    pub follow_up: usize,
}

#[derive(Debug)]
pub struct DashboardPage {
    list: PatientList,
    recent_limit: usize,
}

impl DashboardPage {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            list: PatientList::default(),
            recent_limit: cfg.recent_limit(),
        }
    }

    pub async fn load(&mut self, api: &dyn RecordsApi) -> RecordsResult<()> {
        self.list.load(api).await
    }

    pub fn state(&self) -> &LoadState {
        &self.list.state
    }

    pub fn stats(&self) -> DashboardStats {
        let patients = self.list.directory.patients();
        let count = |condition| {
            patients
                .iter()
                .filter(|p| classify_patient(p) == condition)
                .count()
        };
        DashboardStats {
            total: patients.len(),
            critical: count(Condition::Critical),
            follow_up: count(Condition::FollowUp),
        }
    }

    /// The newest registrations, up to the configured limit.
    pub fn recent(&self) -> Vec<&Patient> {
        recent_patients(self.list.directory.patients(), self.recent_limit)
    }

    pub fn search(&self, query: &str, field: SearchField) -> SearchOutcome<'_> {
        self.list.directory.search(query, field)
    }
}

/// Quick-link cards: every navigation entry except the dashboard itself.
pub fn quick_links(role: Role) -> Vec<NavItem> {
    nav_items(role)
        .into_iter()
        .filter(|item| item.page != Page::Dashboard)
        .collect()
}
