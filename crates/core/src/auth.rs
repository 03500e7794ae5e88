//! Demo authentication, roles and role-based navigation.
//!
//! Credentials are checked against a fixed in-process table after a simulated
//! delay; there is no network call. The session lives in memory only and is
//! dropped on logout.

use crate::config::CoreConfig;
use crate::notice::Notice;
use crate::{RecordsError, RecordsResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RecordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "doctor" => Ok(Role::Doctor),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            other => Err(RecordsError::InvalidInput(format!("unknown role: {other}"))),
        }
    }
}

/// The signed-in user. Never carries the password.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub department: Option<String>,
}

struct DemoUser {
    username: &'static str,
    password: &'static str,
    id: &'static str,
    name: &'static str,
    role: Role,
    department: &'static str,
}

const DEMO_USERS: [DemoUser; 3] = [
    DemoUser {
        username: "doctor1",
        password: "password",
        id: "1",
        name: "Dr. Sanjay Gupta",
        role: Role::Doctor,
        department: "General Medicine",
    },
    DemoUser {
        username: "staff1",
        password: "password",
        id: "2",
        name: "Neha Sharma",
        role: Role::Staff,
        department: "Reception",
    },
    DemoUser {
        username: "admin1",
        password: "password",
        id: "3",
        name: "Raj Patel",
        role: Role::Admin,
        department: "Administration",
    },
];

// ============================================================================
// NAVIGATION
// ============================================================================

/// Screens of the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Patients,
    PatientDetail,
    NewPatient,
    Treatment,
    Reports,
    Settings,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Patients => "Patients",
            Page::PatientDetail => "Patient Details",
            Page::NewPatient => "New Patient",
            Page::Treatment => "Treatment",
            Page::Reports => "Reports",
            Page::Settings => "Settings",
        }
    }

    /// Pages reachable from the navigation are gated by the role's menu; the detail
    /// and registration screens are open to every signed-in user.
    pub fn is_accessible_to(self, role: Role) -> bool {
        match self {
            Page::PatientDetail | Page::NewPatient => true,
            page => nav_items(role).iter().any(|item| item.page == page),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
    pub page: Page,
}

const DASHBOARD: NavItem = NavItem {
    label: "Dashboard",
    path: "/",
    page: Page::Dashboard,
};
const PATIENTS: NavItem = NavItem {
    label: "Patients",
    path: "/patients",
    page: Page::Patients,
};
const TREATMENT: NavItem = NavItem {
    label: "Treatment",
    path: "/treatment",
    page: Page::Treatment,
};
const REPORTS: NavItem = NavItem {
    label: "Reports",
    path: "/reports",
    page: Page::Reports,
};
const SETTINGS: NavItem = NavItem {
    label: "Settings",
    path: "/settings",
    page: Page::Settings,
};

pub fn nav_items(role: Role) -> Vec<NavItem> {
    match role {
        Role::Admin => vec![DASHBOARD, PATIENTS, REPORTS, SETTINGS],
        Role::Doctor => vec![DASHBOARD, PATIENTS, TREATMENT, REPORTS],
        Role::Staff => vec![DASHBOARD, PATIENTS],
    }
}

/// Roles offered in the switch-role menu.
pub fn role_switch_options(current: Role) -> Vec<Role> {
    let mut options = vec![Role::Doctor, Role::Staff];
    if current != Role::Admin {
        options.push(Role::Admin);
    }
    options
}

// ============================================================================
// SESSION SERVICE
// ============================================================================

#[derive(Clone, Debug)]
pub struct SessionService {
    login_delay: Duration,
    user: Option<User>,
}

impl SessionService {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            login_delay: cfg.login_delay(),
            user: None,
        }
    }

    /// Checks the credentials against the demo table after the configured delay.
    ///
    /// # Errors
    ///
    /// Returns `RecordsError::InvalidCredentials` for an unknown user or wrong password.
    /// A failed attempt leaves any existing session untouched.
    pub async fn login(&mut self, username: &str, password: &str) -> RecordsResult<Notice> {
        tokio::time::sleep(self.login_delay).await;

        let record = DEMO_USERS
            .iter()
            .find(|u| u.username == username.trim() && u.password == password)
            .ok_or_else(|| {
                tracing::info!("rejected login for {:?}", username);
                RecordsError::InvalidCredentials
            })?;

        let user = User {
            id: record.id.to_string(),
            username: record.username.to_string(),
            name: record.name.to_string(),
            role: record.role,
            department: Some(record.department.to_string()),
        };
        tracing::info!("{} signed in as {}", user.username, user.role);
        let notice = Notice::success(format!("Welcome back, {}", user.name));
        self.user = Some(user);
        Ok(notice)
    }

    pub fn logout(&mut self) -> Notice {
        if let Some(user) = self.user.take() {
            tracing::info!("{} signed out", user.username);
        }
        Notice::info("You have been logged out")
    }

    /// Replaces the current user's role. Does nothing when nobody is signed in.
    pub fn switch_role(&mut self, role: Role) -> Option<Notice> {
        let user = self.user.as_mut()?;
        tracing::info!("{} switched role {} -> {}", user.username, user.role, role);
        user.role = role;
        Some(Notice::success(format!("Switched to {role} role")))
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The signed-in user, if they may open `page`.
    pub fn require(&self, page: Page) -> RecordsResult<&User> {
        let user = self.user.as_ref().ok_or(RecordsError::NotAuthenticated)?;
        if !page.is_accessible_to(user.role) {
            return Err(RecordsError::AccessDenied {
                role: user.role.to_string(),
                page: page.title().to_string(),
            });
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_cfg;

    fn session() -> SessionService {
        SessionService::new(&test_cfg(std::path::Path::new("unused")))
    }

    #[tokio::test]
    async fn test_login_with_demo_credentials() {
        let mut session = session();
        let notice = session
            .login("doctor1", "password")
            .await
            .expect("login should succeed");

        assert_eq!(notice.title, "Welcome back, Dr. Sanjay Gupta");
        let user = session.current_user().expect("user should be set");
        assert_eq!(user.role, Role::Doctor);
        assert_eq!(user.department.as_deref(), Some("General Medicine"));
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let mut session = session();
        let err = session
            .login("staff1", "letmein")
            .await
            .expect_err("login should fail");

        assert!(matches!(err, RecordsError::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid username or password");
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_switch_role_and_logout() {
        let mut session = session();
        assert!(session.switch_role(Role::Admin).is_none());

        session.login("staff1", "password").await.unwrap();
        let notice = session.switch_role(Role::Admin).expect("should switch");
        assert_eq!(notice.title, "Switched to admin role");
        assert_eq!(session.current_user().unwrap().role, Role::Admin);

        let notice = session.logout();
        assert_eq!(notice.title, "You have been logged out");
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_nav_items_follow_role() {
        let labels = |role| -> Vec<&'static str> { nav_items(role).iter().map(|n| n.label).collect() };

        assert_eq!(labels(Role::Staff), vec!["Dashboard", "Patients"]);
        assert_eq!(
            labels(Role::Doctor),
            vec!["Dashboard", "Patients", "Treatment", "Reports"]
        );
        assert_eq!(
            labels(Role::Admin),
            vec!["Dashboard", "Patients", "Reports", "Settings"]
        );
    }

    #[test]
    fn test_page_access_gating() {
        assert!(Page::Treatment.is_accessible_to(Role::Doctor));
        assert!(!Page::Treatment.is_accessible_to(Role::Admin));
        assert!(!Page::Reports.is_accessible_to(Role::Staff));
        assert!(Page::NewPatient.is_accessible_to(Role::Staff));
        assert!(Page::PatientDetail.is_accessible_to(Role::Staff));
    }

    #[tokio::test]
    async fn test_require_reports_access_denied_for_staff() {
        let mut session = session();
        assert!(matches!(
            session.require(Page::Dashboard),
            Err(RecordsError::NotAuthenticated)
        ));

        session.login("staff1", "password").await.unwrap();
        let err = session.require(Page::Reports).expect_err("staff cannot see reports");
        assert_eq!(err.to_string(), "the staff role cannot open Reports");
    }

    #[test]
    fn test_role_switch_menu_hides_admin_for_admins() {
        assert_eq!(role_switch_options(Role::Admin), vec![Role::Doctor, Role::Staff]);
        assert_eq!(
            role_switch_options(Role::Staff),
            vec![Role::Doctor, Role::Staff, Role::Admin]
        );
    }
}
