use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// An employee record. Direct reports are held as unresolved references.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub department: String,
    #[serde(default, deserialize_with = "deserialize_reports")]
    pub direct_reports: Vec<DirectReport>,
}

impl Employee {
    pub fn report_ids(&self) -> impl Iterator<Item = &str> {
        self.direct_reports
            .iter()
            .map(|report| report.employee_id.as_str())
    }
}

/// Reference to another employee by identifier. Any other fields sent
/// alongside the identifier are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectReport {
    pub employee_id: String,
}

impl DirectReport {
    pub fn new(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
        }
    }
}

/// Accepts `null`, a missing field, and `null` entries inside the list.
fn deserialize_reports<'de, D>(deserializer: D) -> Result<Vec<DirectReport>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<DirectReport>>>::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().flatten().collect())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingStructure {
    pub employee: Employee,
    pub number_of_reports: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compensation {
    pub employee_id: String,
    pub salary: f64,
    pub effective_date: DateTime<Utc>,
}

/// Unvalidated compensation as received from a caller.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompensationSubmission {
    pub employee_id: Option<String>,
    pub salary: Option<f64>,
    pub effective_date: Option<DateTime<Utc>>,
}
