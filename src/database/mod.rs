pub mod manager;
pub mod memory;
pub mod postgres;
pub mod query_builder;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryCompanyStore;
pub use postgres::PgCompanyStore;
pub use store::{CompanyStore, StoreError};
