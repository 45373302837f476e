use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::compensation::create_compensation;
use crate::error::{HrError, HrResult};
use crate::hierarchy::count_reports;
use crate::model::{Compensation, CompensationSubmission, Employee, ReportingStructure};
use crate::store::{CompensationStore, EmployeeStore};

/// Entry point for the request layers.
#[derive(Clone)]
pub struct HrService {
    employees: Arc<dyn EmployeeStore>,
    compensations: Arc<dyn CompensationStore>,
}

impl HrService {
    pub fn new(employees: Arc<dyn EmployeeStore>, compensations: Arc<dyn CompensationStore>) -> Self {
        Self {
            employees,
            compensations,
        }
    }

    /// Uses one store for both capabilities.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: EmployeeStore + CompensationStore + 'static,
    {
        Self {
            employees: store.clone(),
            compensations: store,
        }
    }

    /// Stores a new employee under a freshly assigned identifier.
    #[instrument(name = "hr.employee.create", skip_all)]
    pub async fn create_employee(&self, mut employee: Employee) -> HrResult<Employee> {
        employee.employee_id = Uuid::new_v4().to_string();
        let created = self.employees.create(employee).await?;
        info!(employee_id = %created.employee_id, "employee created");
        Ok(created)
    }

    #[instrument(name = "hr.employee.read", skip(self))]
    pub async fn employee(&self, employee_id: &str) -> HrResult<Option<Employee>> {
        Ok(self.employees.read_by_id(employee_id).await?)
    }

    /// Replaces an existing employee; the path identifier wins over the body.
    #[instrument(name = "hr.employee.update", skip(self, employee))]
    pub async fn update_employee(&self, employee_id: &str, mut employee: Employee) -> HrResult<Employee> {
        if self.employees.read_by_id(employee_id).await?.is_none() {
            return Err(HrError::EmployeeNotFound(employee_id.to_string()));
        }
        employee.employee_id = employee_id.to_string();
        Ok(self.employees.update(employee).await?)
    }

    /// `None` when the employee does not exist.
    #[instrument(name = "hr.reporting_structure", skip(self))]
    pub async fn reporting_structure(&self, employee_id: &str) -> HrResult<Option<ReportingStructure>> {
        let Some(employee) = self.employees.read_by_id(employee_id).await? else {
            debug!("employee not found");
            return Ok(None);
        };
        let number_of_reports = count_reports(self.employees.as_ref(), &employee).await?;
        debug!(number_of_reports, "reporting structure computed");
        Ok(Some(ReportingStructure {
            employee,
            number_of_reports,
        }))
    }

    #[instrument(
        name = "hr.compensation.create",
        skip_all,
        fields(employee_id = submission.employee_id.as_deref().unwrap_or(""))
    )]
    pub async fn create_compensation(&self, submission: &CompensationSubmission) -> HrResult<Compensation> {
        create_compensation(
            self.employees.as_ref(),
            self.compensations.as_ref(),
            submission,
            Utc::now(),
        )
        .await
    }

    #[instrument(name = "hr.compensation.read", skip(self))]
    pub async fn compensation(&self, employee_id: &str) -> HrResult<Option<Compensation>> {
        Ok(self.compensations.read_by_id(employee_id).await?)
    }
}
