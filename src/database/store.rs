use async_trait::async_trait;
use thiserror::Error;

use crate::filter::FilterError;
use crate::models::{Company, CompanyPatch, CompanySearchFilters, CompanyWithJobs, NewCompany};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<FilterError> for StoreError {
    fn from(err: FilterError) -> Self {
        StoreError::Query(err.to_string())
    }
}

impl StoreError {
    pub fn company_not_found(handle: &str) -> Self {
        StoreError::NotFound(format!("No company: {}", handle))
    }

    pub fn duplicate_handle(handle: &str) -> Self {
        StoreError::Conflict(format!("Duplicate company: {}", handle))
    }

    pub fn duplicate_name(name: &str) -> Self {
        StoreError::Conflict(format!("Duplicate company name: {}", name))
    }
}

/// Persistence for companies. Handlers only ever talk to this trait.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Fails with `Conflict` when the handle or name is already taken.
    async fn create(&self, company: NewCompany) -> Result<Company, StoreError>;

    /// Companies matching every present filter, ordered by name.
    async fn find_all(&self, filters: &CompanySearchFilters) -> Result<Vec<Company>, StoreError>;

    async fn get(&self, handle: &str) -> Result<CompanyWithJobs, StoreError>;

    /// An empty patch returns the current record unchanged.
    async fn update(&self, handle: &str, patch: CompanyPatch) -> Result<Company, StoreError>;

    async fn remove(&self, handle: &str) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
