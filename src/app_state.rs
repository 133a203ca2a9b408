use crate::client::RemoteClient;
use crate::configuration::{DisplaySettings, Settings};
use crate::errors::Error;
use crate::mapper::Mapper;
use crate::orchestrator::Orchestrator;
use crate::storage::{self, KeyValueStore};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub display: Arc<DisplaySettings>,
}

impl AppState {
    pub fn init(settings: &Settings) -> Result<Self, Error> {
        let store = storage::from_settings(&settings.storage)?;
        Self::with_store(settings, store)
    }

    pub fn with_store(settings: &Settings, store: Arc<dyn KeyValueStore>) -> Result<Self, Error> {
        let client = RemoteClient::new(settings.backend.base_url.clone())?;
        let mapper = Mapper::new(&settings.display.placeholder_image);
        Ok(Self {
            orchestrator: Arc::new(Orchestrator::new(client, mapper, store)),
            display: Arc::new(settings.display.clone()),
        })
    }

    /// Runs the initial product fetch in the background so the page can
    /// show its loading state meanwhile.
    pub fn mount_in_background(&self) {
        let orchestrator = Arc::clone(&self.orchestrator);
        tokio::spawn(async move { orchestrator.mount().await });
    }
}
