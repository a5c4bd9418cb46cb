pub mod config;
pub mod errors;
pub mod list;
pub mod middleware;
pub mod models;
pub mod services;
pub mod session;

use std::sync::Arc;

use errors::FetchError;
use list::debounce::{self, DebounceInput, Debouncer};
use services::client::ApiClient;
use session::{FileCredentialStore, SessionContext};

/// Shared client state handed to every screen or command.
#[derive(Debug, Clone)]
pub struct AdminState {
    pub config: config::ClientConfig,
    pub session: Arc<SessionContext>,
    pub api: ApiClient,
}

impl AdminState {
    /// Restore the session from `config.session_file` and build the API client.
    pub fn from_config(config: config::ClientConfig) -> Result<Self, FetchError> {
        let store = FileCredentialStore::new(config.session_file.clone());
        let session = Arc::new(SessionContext::restore(Box::new(store)));
        Self::with_session(config, session)
    }

    pub fn with_session(
        config: config::ClientConfig,
        session: Arc<SessionContext>,
    ) -> Result<Self, FetchError> {
        let api = ApiClient::new(&config, session.clone())?;
        Ok(Self {
            config,
            session,
            api,
        })
    }

    /// Debounced channel for search input, using the configured quiet period.
    pub fn search_input(&self) -> (DebounceInput<String>, Debouncer<String>) {
        debounce::debounce(self.config.search_debounce())
    }
}
