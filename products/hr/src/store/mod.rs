//! Storage capabilities consumed by the HR slice.

mod db;
mod memory;

use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

use crate::model::{Compensation, Employee};

pub use db::DbStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] DbErr),
    #[error("stored record could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn create(&self, employee: Employee) -> StoreResult<Employee>;

    /// `Ok(None)` when no employee has this identifier.
    async fn read_by_id(&self, employee_id: &str) -> StoreResult<Option<Employee>>;

    /// Writes the record under its identifier, creating it when absent.
    async fn update(&self, employee: Employee) -> StoreResult<Employee>;
}

#[async_trait]
pub trait CompensationStore: Send + Sync {
    /// Upsert keyed by employee id.
    async fn create(&self, compensation: Compensation) -> StoreResult<Compensation>;

    async fn read_by_id(&self, employee_id: &str) -> StoreResult<Option<Compensation>>;
}
