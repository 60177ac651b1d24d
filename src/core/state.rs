// Application state (AppState)

use crate::classifier::TextClassifier;
use crate::core::config::Config;
use crate::security::session::SessionManager;
use crate::stores::{complaint_store::ComplaintStore, user_store::UserStore};
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

/// Shared application state
///
/// Everything a handler touches is injected from here; there is no global
/// connection or session object.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,

    pub complaints: Arc<ComplaintStore>,

    /// Category model, loaded once at startup
    pub classifier: Arc<dyn TextClassifier>,

    pub sessions: Arc<SessionManager>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        config: Config,
        pool: SqlitePool,
        classifier: Arc<dyn TextClassifier>,
        sessions: SessionManager,
    ) -> Self {
        Self {
            users: Arc::new(UserStore::new(pool.clone())),
            complaints: Arc::new(ComplaintStore::new(pool)),
            classifier,
            sessions: Arc::new(sessions),
            config: Arc::new(config),
        }
    }
}
