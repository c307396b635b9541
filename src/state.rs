use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::CompanyStore;
use crate::validation::{SchemaError, SchemaRegistry};

/// Shared handles for every request. Cloning is cheap; nothing in here is mutated by handlers.
#[derive(Clone)]
pub struct AppState {
    pub companies: Arc<dyn CompanyStore>,
    pub schemas: Arc<SchemaRegistry>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(companies: Arc<dyn CompanyStore>, config: AppConfig) -> Result<Self, SchemaError> {
        Ok(Self {
            companies,
            schemas: Arc::new(SchemaRegistry::load()?),
            config: Arc::new(config),
        })
    }
}
