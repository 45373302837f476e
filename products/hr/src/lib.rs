//! HR vertical slice.
//!
//! Employees form a direct-report graph that may share sub-trees or contain
//! cycles. [`hierarchy::count_reports`] walks it with an explicit worklist;
//! [`compensation`] validates submissions before they reach a store.
//! Persistence goes through the [`store::EmployeeStore`] and
//! [`store::CompensationStore`] capabilities.

pub mod compensation;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod seed;
pub mod service;
pub mod store;

pub use error::{HrError, HrResult, ValidationErrors};
pub use model::{Compensation, CompensationSubmission, DirectReport, Employee, ReportingStructure};
pub use service::HrService;
pub use store::{CompensationStore, DbStore, EmployeeStore, MemoryStore, StoreError, StoreResult};
