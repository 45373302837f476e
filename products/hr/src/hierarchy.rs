use std::collections::HashSet;

use tracing::debug;

use crate::model::{DirectReport, Employee};
use crate::store::{EmployeeStore, StoreResult};

/// Counts the distinct employees reachable from `root` through direct reports.
///
/// Each identifier is expanded at most once, so shared sub-trees and cycles
/// terminate and count once. References that do not resolve in the store are
/// counted but not expanded. The visited set starts empty, so the root only
/// counts when a cycle leads back to it.
pub async fn count_reports<S>(store: &S, root: &Employee) -> StoreResult<usize>
where
    S: EmployeeStore + ?Sized,
{
    let mut visited: HashSet<String> = HashSet::new();
    let mut pending: Vec<String> = Vec::new();
    enqueue_unvisited(&root.direct_reports, &mut visited, &mut pending);

    while let Some(employee_id) = pending.pop() {
        match store.read_by_id(&employee_id).await? {
            Some(report) => enqueue_unvisited(&report.direct_reports, &mut visited, &mut pending),
            None => debug!(%employee_id, "direct report does not resolve; not expanded"),
        }
    }

    Ok(visited.len())
}

fn enqueue_unvisited(
    reports: &[DirectReport],
    visited: &mut HashSet<String>,
    pending: &mut Vec<String>,
) {
    for report in reports {
        if visited.insert(report.employee_id.clone()) {
            pending.push(report.employee_id.clone());
        }
    }
}
