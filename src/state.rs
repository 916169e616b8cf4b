use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::process::PipelineOptions;
use crate::store::UploadStore;

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: UploadStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = UploadStore::new(config.upload_dir.clone());
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &UploadStore {
        &self.store
    }

    /// Fresh options for one request; the cancel flag is never shared.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            policy: self.config.field_policy,
            ..Default::default()
        }
    }
}
