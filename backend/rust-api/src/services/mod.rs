use std::sync::Arc;

use crate::config::Config;
use crate::store::SubmissionStore;

pub mod catalog;
pub mod progress_service;
pub mod session_service;

pub use catalog::ProblemCatalog;
pub use progress_service::ProgressService;
pub use session_service::SessionService;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn SubmissionStore>,
    pub catalog: ProblemCatalog,
    pub sessions: SessionService,
    pub progress: ProgressService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn SubmissionStore>) -> Self {
        Self {
            config,
            store: store.clone(),
            catalog: ProblemCatalog::default(),
            sessions: SessionService::new(),
            progress: ProgressService::new(store),
        }
    }

    pub fn with_catalog(
        config: Config,
        store: Arc<dyn SubmissionStore>,
        catalog: ProblemCatalog,
    ) -> Self {
        Self {
            config,
            store: store.clone(),
            catalog,
            sessions: SessionService::new(),
            progress: ProgressService::new(store),
        }
    }
}
