use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::resolver::AnswerResolver;
use crate::session::Workspace;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub resolver: Arc<AnswerResolver>,
    /// Store and open sessions. Held for the whole of each field resolution,
    /// so fields are processed strictly one at a time.
    pub workspace: Arc<Mutex<Workspace>>,
}

impl AppState {
    pub fn new(config: Config, resolver: AnswerResolver, workspace: Workspace) -> Self {
        Self {
            config,
            resolver: Arc::new(resolver),
            workspace: Arc::new(Mutex::new(workspace)),
        }
    }
}
