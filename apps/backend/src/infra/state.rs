use std::sync::Arc;

use db_infra::{bootstrap_db, DbKind};

use crate::error::AppError;
use crate::services::generation::TextGenerator;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for `AppState` (used in both tests and main).
pub struct StateBuilder {
    security_config: SecurityConfig,
    db_kind: Option<DbKind>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::for_tests(),
            db_kind: None,
            generator: None,
        }
    }

    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = Some(kind);
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let state = if let Some(kind) = self.db_kind {
            // single entrypoint: connect + migrate
            let conn = bootstrap_db(kind).await?;
            AppState::new(conn, self.security_config)
        } else {
            AppState::new_without_db(self.security_config)
        };
        Ok(state.with_generator(self.generator))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
