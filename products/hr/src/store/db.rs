use async_trait::async_trait;
use chrono::Utc;
use entity::{compensation, employee};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait};
use serde_json::Value;

use super::{CompensationStore, EmployeeStore, StoreResult};
use crate::model::{Compensation, DirectReport, Employee};

/// SeaORM-backed store over the `employee` and `compensation` tables.
#[derive(Clone, Debug)]
pub struct DbStore {
    db: DatabaseConnection,
}

impl DbStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn employee_active_model(employee: &Employee, now: DateTimeWithTimeZone) -> employee::ActiveModel {
    let reports = employee
        .report_ids()
        .map(|id| Value::String(id.to_string()))
        .collect();
    employee::ActiveModel {
        employee_id: Set(employee.employee_id.clone()),
        first_name: Set(employee.first_name.clone()),
        last_name: Set(employee.last_name.clone()),
        position: Set(employee.position.clone()),
        department: Set(employee.department.clone()),
        direct_reports: Set(Value::Array(reports)),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

fn employee_from_model(model: employee::Model) -> StoreResult<Employee> {
    let report_ids: Vec<String> = serde_json::from_value(model.direct_reports)?;
    Ok(Employee {
        employee_id: model.employee_id,
        first_name: model.first_name,
        last_name: model.last_name,
        position: model.position,
        department: model.department,
        direct_reports: report_ids.into_iter().map(DirectReport::new).collect(),
    })
}

impl From<compensation::Model> for Compensation {
    fn from(model: compensation::Model) -> Self {
        Self {
            employee_id: model.employee_id,
            salary: model.salary,
            effective_date: model.effective_date.with_timezone(&Utc),
        }
    }
}

#[async_trait]
impl EmployeeStore for DbStore {
    async fn create(&self, employee: Employee) -> StoreResult<Employee> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        employee::Entity::insert(employee_active_model(&employee, now))
            .exec_without_returning(&self.db)
            .await?;
        Ok(employee)
    }

    async fn read_by_id(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
        employee::Entity::find_by_id(employee_id.to_owned())
            .one(&self.db)
            .await?
            .map(employee_from_model)
            .transpose()
    }

    async fn update(&self, employee: Employee) -> StoreResult<Employee> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        employee::Entity::insert(employee_active_model(&employee, now))
            .on_conflict(
                OnConflict::column(employee::Column::EmployeeId)
                    .update_columns([
                        employee::Column::FirstName,
                        employee::Column::LastName,
                        employee::Column::Position,
                        employee::Column::Department,
                        employee::Column::DirectReports,
                        employee::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(employee)
    }
}

#[async_trait]
impl CompensationStore for DbStore {
    async fn create(&self, compensation: Compensation) -> StoreResult<Compensation> {
        let model = compensation::ActiveModel {
            employee_id: Set(compensation.employee_id.clone()),
            salary: Set(compensation.salary),
            effective_date: Set(compensation.effective_date.into()),
            updated_at: Set(Utc::now().into()),
        };
        compensation::Entity::insert(model)
            .on_conflict(
                OnConflict::column(compensation::Column::EmployeeId)
                    .update_columns([
                        compensation::Column::Salary,
                        compensation::Column::EffectiveDate,
                        compensation::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(compensation)
    }

    async fn read_by_id(&self, employee_id: &str) -> StoreResult<Option<Compensation>> {
        let record = compensation::Entity::find_by_id(employee_id.to_owned())
            .one(&self.db)
            .await?;
        Ok(record.map(Compensation::from))
    }
}
