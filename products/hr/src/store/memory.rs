use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CompensationStore, EmployeeStore, StoreResult};
use crate::model::{Compensation, Employee};

/// Map-backed store for tests and the `memory` backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    employees: RwLock<HashMap<String, Employee>>,
    compensations: RwLock<HashMap<String, Compensation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let map = employees
            .into_iter()
            .map(|employee| (employee.employee_id.clone(), employee))
            .collect();
        Self {
            employees: RwLock::new(map),
            compensations: RwLock::default(),
        }
    }

    pub async fn employee_count(&self) -> usize {
        self.employees.read().await.len()
    }

    pub async fn compensation_count(&self) -> usize {
        self.compensations.read().await.len()
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn create(&self, employee: Employee) -> StoreResult<Employee> {
        self.employees
            .write()
            .await
            .insert(employee.employee_id.clone(), employee.clone());
        Ok(employee)
    }

    async fn read_by_id(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
        Ok(self.employees.read().await.get(employee_id).cloned())
    }

    async fn update(&self, employee: Employee) -> StoreResult<Employee> {
        EmployeeStore::create(self, employee).await
    }
}

#[async_trait]
impl CompensationStore for MemoryStore {
    async fn create(&self, compensation: Compensation) -> StoreResult<Compensation> {
        self.compensations
            .write()
            .await
            .insert(compensation.employee_id.clone(), compensation.clone());
        Ok(compensation)
    }

    async fn read_by_id(&self, employee_id: &str) -> StoreResult<Option<Compensation>> {
        Ok(self.compensations.read().await.get(employee_id).cloned())
    }
}
