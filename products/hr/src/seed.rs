//! Bundled fixture hierarchy.

use tracing::info;

use crate::error::HrResult;
use crate::model::Employee;
use crate::store::EmployeeStore;

const EMPLOYEE_SEED: &str = include_str!("../seed/employee_database.json");

pub fn seed_employees() -> Result<Vec<Employee>, serde_json::Error> {
    serde_json::from_str(EMPLOYEE_SEED)
}

/// Upserts the fixture employees, so running it twice is harmless.
pub async fn seed_store<S>(store: &S) -> HrResult<usize>
where
    S: EmployeeStore + ?Sized,
{
    let employees = seed_employees().map_err(crate::store::StoreError::from)?;
    let count = employees.len();
    for employee in employees {
        store.update(employee).await?;
    }
    info!(count, "seed employees loaded");
    Ok(count)
}
