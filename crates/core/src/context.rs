//! Application context: everything a page needs, created once at start-up.

use crate::auth::{Page, SessionService, User};
use crate::config::CoreConfig;
use crate::notice::Notice;
use crate::service::{ExtractionApi, RecordsApi};
use crate::theme::ThemeService;
use crate::RecordsResult;
use std::sync::Arc;

pub struct AppContext {
    cfg: Arc<CoreConfig>,
    session: SessionService,
    theme: ThemeService,
    records: Arc<dyn RecordsApi>,
    extraction: Arc<dyn ExtractionApi>,
}

impl AppContext {
    /// Build the context and re-apply the saved theme.
    ///
    /// # Errors
    ///
    /// Returns an error if the local store exists but cannot be read.
    pub fn new(
        cfg: CoreConfig,
        records: Arc<dyn RecordsApi>,
        extraction: Arc<dyn ExtractionApi>,
    ) -> RecordsResult<Self> {
        let theme = ThemeService::load(&cfg)?;
        tracing::debug!("theme on start-up: {}", theme.current());
        Ok(Self {
            session: SessionService::new(&cfg),
            cfg: Arc::new(cfg),
            theme,
            records,
            extraction,
        })
    }

    pub fn cfg(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionService {
        &mut self.session
    }

    pub fn theme(&self) -> &ThemeService {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeService {
        &mut self.theme
    }

    pub fn records(&self) -> &dyn RecordsApi {
        self.records.as_ref()
    }

    pub fn extraction(&self) -> &dyn ExtractionApi {
        self.extraction.as_ref()
    }

    /// The signed-in user, provided their role may open `page`.
    pub fn open(&self, page: Page) -> RecordsResult<&User> {
        self.session.require(page)
    }

    pub fn logout(&mut self) -> Notice {
        self.session.logout()
    }
}
