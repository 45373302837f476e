//! Compensation validation and creation.
//!
//! A submission is checked field by field before any store is touched, and
//! every failing field is reported. Only then is the employee looked up; a
//! missing employee is a referential failure, distinct from a field failure.
//!
//! Effective dates are accepted when they are now or later, and are kept to
//! microsecond precision so a stored record reads back as it was returned.

use chrono::{DateTime, Timelike, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{HrError, HrResult, ValidationErrors};
use crate::model::{Compensation, CompensationSubmission};
use crate::store::{CompensationStore, EmployeeStore};

pub const EMPLOYEE_ID_FIELD: &str = "employeeId";
pub const SALARY_FIELD: &str = "salary";
pub const EFFECTIVE_DATE_FIELD: &str = "effectiveDate";

pub const EMPLOYEE_ID_REQUIRED: &str = "Employee ID is required";
pub const SALARY_NOT_POSITIVE: &str = "Salary must be a positive number";
pub const EFFECTIVE_DATE_REQUIRED: &str = "Effective date is required";
pub const EFFECTIVE_DATE_IN_PAST: &str = "Effective date must be in the present or future";

pub const EMPLOYEE_ID_MALFORMED: &str = "Employee ID must be a string";
pub const SALARY_MALFORMED: &str = "Salary must be a number";
pub const EFFECTIVE_DATE_MALFORMED: &str = "Effective date must be an RFC 3339 timestamp";

impl CompensationSubmission {
    /// Reads a submission from a JSON document one field at a time, so a value
    /// of the wrong type is reported against its own field. Missing and `null`
    /// fields are left empty for [`CompensationSubmission::validate_at`].
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let submission = Self {
            employee_id: read_field(body, EMPLOYEE_ID_FIELD, EMPLOYEE_ID_MALFORMED, &mut errors),
            salary: read_field(body, SALARY_FIELD, SALARY_MALFORMED, &mut errors),
            effective_date: read_field(
                body,
                EFFECTIVE_DATE_FIELD,
                EFFECTIVE_DATE_MALFORMED,
                &mut errors,
            ),
        };
        if errors.is_empty() {
            Ok(submission)
        } else {
            Err(errors)
        }
    }

    /// Checks every field against `now` and returns the record to persist.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<Compensation, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        // trimmed for the blank check only
        let employee_id = self
            .employee_id
            .as_deref()
            .filter(|id| !id.trim().is_empty());
        if employee_id.is_none() {
            errors.insert(EMPLOYEE_ID_FIELD, EMPLOYEE_ID_REQUIRED);
        }

        // an absent salary is zero
        let salary = self.salary.unwrap_or(0.0);
        if !(salary.is_finite() && salary > 0.0) {
            errors.insert(SALARY_FIELD, SALARY_NOT_POSITIVE);
        }

        match self.effective_date {
            None => errors.insert(EFFECTIVE_DATE_FIELD, EFFECTIVE_DATE_REQUIRED),
            Some(date) if date < now => errors.insert(EFFECTIVE_DATE_FIELD, EFFECTIVE_DATE_IN_PAST),
            Some(_) => {}
        }

        match (employee_id, self.effective_date) {
            (Some(employee_id), Some(effective_date)) if errors.is_empty() => Ok(Compensation {
                employee_id: employee_id.to_string(),
                salary,
                effective_date: to_micros(effective_date),
            }),
            _ => Err(errors),
        }
    }
}

fn read_field<T: DeserializeOwned>(
    body: &Value,
    name: &str,
    message: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    let raw = body.get(name)?;
    match Option::<T>::deserialize(raw) {
        Ok(value) => value,
        Err(_) => {
            errors.insert(name, message);
            None
        }
    }
}

/// Drops sub-microsecond digits, the finest precision `timestamptz` keeps.
fn to_micros(date: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = date.nanosecond();
    date.with_nanosecond(nanos - nanos % 1_000).unwrap_or(date)
}

/// Validates, confirms the employee exists, then upserts the record.
pub async fn create_compensation<E, C>(
    employees: &E,
    compensations: &C,
    submission: &CompensationSubmission,
    now: DateTime<Utc>,
) -> HrResult<Compensation>
where
    E: EmployeeStore + ?Sized,
    C: CompensationStore + ?Sized,
{
    let compensation = submission.validate_at(now).map_err(|errors| {
        warn!(%errors, "compensation submission rejected");
        HrError::Validation(errors)
    })?;

    if employees
        .read_by_id(&compensation.employee_id)
        .await?
        .is_none()
    {
        warn!(employee_id = %compensation.employee_id, "compensation references unknown employee");
        return Err(HrError::UnknownEmployee(compensation.employee_id));
    }

    let stored = compensations.create(compensation).await?;
    info!(employee_id = %stored.employee_id, "compensation stored");
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::model::Employee;
    use crate::store::MemoryStore;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
    }

    fn submission(id: &str, salary: f64, date: DateTime<Utc>) -> CompensationSubmission {
        CompensationSubmission {
            employee_id: Some(id.to_string()),
            salary: Some(salary),
            effective_date: Some(date),
        }
    }

    fn store_with(id: &str) -> MemoryStore {
        MemoryStore::with_employees([Employee {
            employee_id: id.to_string(),
            ..Employee::default()
        }])
    }

    #[test]
    fn valid_submission_passes() {
        let compensation = submission("a", 10_000.0, now()).validate_at(now()).unwrap();
        assert_eq!(compensation.employee_id, "a");
        assert_eq!(compensation.salary, 10_000.0);
        assert_eq!(compensation.effective_date, now());
    }

    #[test]
    fn zero_and_negative_salary_fail_on_salary() {
        for salary in [0.0, -1.5, f64::NAN] {
            let errors = submission("a", salary, now()).validate_at(now()).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.get(SALARY_FIELD), Some(SALARY_NOT_POSITIVE));
        }
    }

    #[test]
    fn past_date_fails_on_effective_date() {
        let past = now() - Duration::seconds(1);
        let errors = submission("a", 1.0, past).validate_at(now()).unwrap_err();
        assert_eq!(errors.get(EFFECTIVE_DATE_FIELD), Some(EFFECTIVE_DATE_IN_PAST));
        assert!(!errors.contains(SALARY_FIELD));
    }

    #[test]
    fn future_date_passes() {
        let future = now() + Duration::days(30);
        assert!(submission("a", 1.0, future).validate_at(now()).is_ok());
    }

    #[test]
    fn blank_id_fails_on_employee_id() {
        let errors = submission("   ", 1.0, now()).validate_at(now()).unwrap_err();
        assert_eq!(errors.get(EMPLOYEE_ID_FIELD), Some(EMPLOYEE_ID_REQUIRED));
    }

    #[test]
    fn employee_id_is_kept_as_submitted() {
        let compensation = submission(" a ", 1.0, now()).validate_at(now()).unwrap();
        assert_eq!(compensation.employee_id, " a ");
    }

    #[tokio::test]
    async fn padded_id_is_looked_up_verbatim() {
        let store = store_with("a");
        let err = create_compensation(&store, &store, &submission(" a ", 1.0, now()), now())
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::UnknownEmployee(ref id) if id == " a "));
    }

    #[test]
    fn effective_date_is_truncated_to_microseconds() {
        let submitted = now() + Duration::nanoseconds(123_456_789);
        let compensation = submission("a", 1.0, submitted).validate_at(now()).unwrap();
        assert_eq!(
            compensation.effective_date,
            now() + Duration::microseconds(123_456)
        );
    }

    #[test]
    fn from_json_reads_well_typed_fields() {
        let body = serde_json::json!({
            "employeeId": "a",
            "salary": 10,
            "effectiveDate": "2030-01-01T00:00:00.5Z",
            "note": "ignored"
        });
        let parsed = CompensationSubmission::from_json(&body).unwrap();
        assert_eq!(parsed.employee_id.as_deref(), Some("a"));
        assert_eq!(parsed.salary, Some(10.0));
        assert!(parsed.effective_date.is_some());

        let empty = CompensationSubmission::from_json(&serde_json::json!({"salary": null})).unwrap();
        assert_eq!(empty, CompensationSubmission::default());
    }

    #[test]
    fn from_json_reports_each_malformed_field() {
        let body = serde_json::json!({
            "employeeId": 7,
            "salary": "x",
            "effectiveDate": "2030-01-01"
        });
        let errors = CompensationSubmission::from_json(&body).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(EMPLOYEE_ID_FIELD), Some(EMPLOYEE_ID_MALFORMED));
        assert_eq!(errors.get(SALARY_FIELD), Some(SALARY_MALFORMED));
        assert_eq!(errors.get(EFFECTIVE_DATE_FIELD), Some(EFFECTIVE_DATE_MALFORMED));
    }

    #[test]
    fn all_violations_are_reported_together() {
        let past = now() - Duration::days(1);
        let errors = submission("", -5.0, past).validate_at(now()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(EMPLOYEE_ID_FIELD));
        assert!(errors.contains(SALARY_FIELD));
        assert!(errors.contains(EFFECTIVE_DATE_FIELD));
    }

    #[test]
    fn empty_submission_reports_required_fields() {
        let errors = CompensationSubmission::default()
            .validate_at(now())
            .unwrap_err();
        assert_eq!(errors.get(EMPLOYEE_ID_FIELD), Some(EMPLOYEE_ID_REQUIRED));
        assert_eq!(errors.get(SALARY_FIELD), Some(SALARY_NOT_POSITIVE));
        assert_eq!(errors.get(EFFECTIVE_DATE_FIELD), Some(EFFECTIVE_DATE_REQUIRED));
    }

    #[tokio::test]
    async fn unknown_employee_is_referential_and_stores_nothing() {
        let store = MemoryStore::new();
        let err = create_compensation(&store, &store, &submission("ghost", 1.0, now()), now())
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::UnknownEmployee(ref id) if id == "ghost"));
        assert_eq!(store.compensation_count().await, 0);
    }

    #[tokio::test]
    async fn invalid_submission_is_structural_even_for_unknown_employee() {
        let store = MemoryStore::new();
        let err = create_compensation(&store, &store, &submission("ghost", 0.0, now()), now())
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::Validation(_)));
    }

    #[tokio::test]
    async fn created_compensation_reads_back() {
        let store = store_with("a");
        let date = now() + Duration::days(1);
        let created = create_compensation(&store, &store, &submission("a", 1234.56, date), now())
            .await
            .unwrap();
        let read = CompensationStore::read_by_id(&store, "a")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(read, created);
        assert!((read.salary - 1234.56).abs() < 0.001);
        assert_eq!(read.effective_date, date);
    }
}
