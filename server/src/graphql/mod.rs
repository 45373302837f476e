use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, ID, InputObject, Object, Schema, SimpleObject,
};
use chrono::{DateTime, Utc};
use platform_api::{ApiError, internal_error};
use products_hr::{
    Compensation, CompensationSubmission, DirectReport, Employee, HrError, HrService,
    ReportingStructure,
};
use serde::Serialize;
use tracing::instrument;

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(hr: HrService) -> SchemaType {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(hr)
        .finish()
}

#[derive(Default)]
pub struct QueryRoot;

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self) -> HealthPayload {
        HealthPayload { ok: true }
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    #[instrument(name = "graphql.employee", skip(self, ctx))]
    async fn employee(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<EmployeeNode>> {
        let employee = hr(ctx)?.employee(id.as_str()).await.map_err(api_error)?;
        Ok(employee.map(EmployeeNode::from))
    }

    #[instrument(name = "graphql.reporting_structure", skip(self, ctx))]
    async fn reporting_structure(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<ReportingStructureNode>> {
        let structure = hr(ctx)?
            .reporting_structure(id.as_str())
            .await
            .map_err(api_error)?;
        Ok(structure.map(ReportingStructureNode::from))
    }

    #[instrument(name = "graphql.compensation", skip(self, ctx))]
    async fn compensation(
        &self,
        ctx: &Context<'_>,
        employee_id: ID,
    ) -> async_graphql::Result<Option<CompensationNode>> {
        let compensation = hr(ctx)?
            .compensation(employee_id.as_str())
            .await
            .map_err(api_error)?;
        Ok(compensation.map(CompensationNode::from))
    }
}

#[Object]
impl MutationRoot {
    #[instrument(name = "graphql.create_employee", skip_all)]
    async fn create_employee(
        &self,
        ctx: &Context<'_>,
        input: EmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let created = hr(ctx)?
            .create_employee(input.into_employee(String::new()))
            .await
            .map_err(api_error)?;
        Ok(created.into())
    }

    #[instrument(name = "graphql.update_employee", skip(self, ctx, input))]
    async fn update_employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: EmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let updated = hr(ctx)?
            .update_employee(id.as_str(), input.into_employee(id.to_string()))
            .await
            .map_err(api_error)?;
        Ok(updated.into())
    }

    #[instrument(name = "graphql.create_compensation", skip_all)]
    async fn create_compensation(
        &self,
        ctx: &Context<'_>,
        input: CompensationInput,
    ) -> async_graphql::Result<CompensationNode> {
        let created = hr(ctx)?
            .create_compensation(&input.into())
            .await
            .map_err(api_error)?;
        Ok(created.into())
    }
}

#[derive(Clone, Debug, SimpleObject, Serialize)]
pub struct HealthPayload {
    pub ok: bool,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Employee")]
pub struct EmployeeNode {
    pub employee_id: ID,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub department: String,
    pub direct_reports: Vec<ID>,
}

impl From<Employee> for EmployeeNode {
    fn from(employee: Employee) -> Self {
        Self {
            direct_reports: employee.report_ids().map(ID::from).collect(),
            employee_id: ID(employee.employee_id),
            first_name: employee.first_name,
            last_name: employee.last_name,
            position: employee.position,
            department: employee.department,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "ReportingStructure")]
pub struct ReportingStructureNode {
    pub employee: EmployeeNode,
    pub number_of_reports: i64,
}

impl From<ReportingStructure> for ReportingStructureNode {
    fn from(structure: ReportingStructure) -> Self {
        Self {
            employee: structure.employee.into(),
            number_of_reports: structure.number_of_reports as i64,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Compensation")]
pub struct CompensationNode {
    pub employee_id: ID,
    pub salary: f64,
    pub effective_date: DateTime<Utc>,
}

impl From<Compensation> for CompensationNode {
    fn from(compensation: Compensation) -> Self {
        Self {
            employee_id: ID(compensation.employee_id),
            salary: compensation.salary,
            effective_date: compensation.effective_date,
        }
    }
}

#[derive(Clone, Debug, InputObject)]
pub struct EmployeeInput {
    #[graphql(default)]
    pub first_name: String,
    #[graphql(default)]
    pub last_name: String,
    #[graphql(default)]
    pub position: String,
    #[graphql(default)]
    pub department: String,
    #[graphql(default)]
    pub direct_reports: Vec<ID>,
}

impl EmployeeInput {
    fn into_employee(self, employee_id: String) -> Employee {
        Employee {
            employee_id,
            first_name: self.first_name,
            last_name: self.last_name,
            position: self.position,
            department: self.department,
            direct_reports: self
                .direct_reports
                .into_iter()
                .map(|id| DirectReport::new(id.0))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, InputObject)]
pub struct CompensationInput {
    pub employee_id: Option<String>,
    pub salary: Option<f64>,
    pub effective_date: Option<DateTime<Utc>>,
}

impl From<CompensationInput> for CompensationSubmission {
    fn from(input: CompensationInput) -> Self {
        Self {
            employee_id: input.employee_id,
            salary: input.salary,
            effective_date: input.effective_date,
        }
    }
}

fn hr<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a HrService> {
    ctx.data::<HrService>()
        .map_err(|_| internal_error(anyhow::anyhow!("missing HR service")))
}

fn api_error(err: HrError) -> async_graphql::Error {
    match err {
        HrError::Validation(errors) => ApiError::Validation(errors.into_inner()).extend(),
        HrError::UnknownEmployee(_) => ApiError::InvalidInput(err.to_string()).extend(),
        HrError::EmployeeNotFound(_) => ApiError::NotFound.extend(),
        HrError::Store(inner) => internal_error(inner),
    }
}
