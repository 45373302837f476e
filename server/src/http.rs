use std::{
    collections::BTreeMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use platform_db::DbPool;
use products_hr::{
    Compensation, CompensationSubmission, Employee, HrError, HrService, ReportingStructure,
};
use serde::Serialize;
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug, error, info};

use crate::{config::AppConfig, graphql::SchemaType};

#[derive(Clone)]
pub struct AppState {
    pub hr: HrService,
    pub schema: SchemaType,
    pub config: Arc<AppConfig>,
    /// Present when records live in the database.
    pub pool: Option<DbPool>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "hr server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/employee", post(create_employee))
        .route("/employee/{id}", get(read_employee).put(update_employee))
        .route("/employee/reportingStructure/{id}", get(reporting_structure))
        .route("/employee/compensation", post(create_compensation))
        .route("/employee/compensation/{employee_id}", get(read_compensation))
        .route("/graphql", post(graphql_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<Employee>, JsonRejection>,
) -> HttpResult<Json<Employee>> {
    let Json(employee) = payload?;
    debug!(?employee, "received employee create request");
    Ok(Json(state.hr.create_employee(employee).await?))
}

async fn read_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HttpResult<Json<Employee>> {
    debug!(%id, "received employee read request");
    state
        .hr
        .employee(&id)
        .await?
        .map(Json)
        .ok_or_else(|| HttpError::not_found("employee not found"))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Employee>, JsonRejection>,
) -> HttpResult<Json<Employee>> {
    let Json(employee) = payload?;
    debug!(%id, ?employee, "received employee update request");
    Ok(Json(state.hr.update_employee(&id, employee).await?))
}

async fn reporting_structure(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HttpResult<Json<ReportingStructure>> {
    debug!(%id, "received reporting structure request");
    state
        .hr
        .reporting_structure(&id)
        .await?
        .map(Json)
        .ok_or_else(|| HttpError::not_found("employee not found"))
}

async fn create_compensation(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> HttpResult<(StatusCode, Json<Compensation>)> {
    let Json(body) = payload?;
    let submission = CompensationSubmission::from_json(&body).map_err(HrError::Validation)?;
    debug!(?submission, "received compensation create request");
    let created = state.hr.create_compensation(&submission).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn read_compensation(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> HttpResult<Json<Compensation>> {
    debug!(%employee_id, "received compensation read request");
    state
        .hr
        .compensation(&employee_id)
        .await?
        .map(Json)
        .ok_or_else(|| HttpError::not_found("compensation not found"))
}

async fn graphql_handler(State(state): State<AppState>, request: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(request.into_inner()).await.into()
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store_ok = match &state.pool {
        Some(pool) => platform_db::ping(pool).await,
        None => true,
    };
    Json(HealthResponse {
        ok: store_ok,
        store_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    store_ok: bool,
    version: &'static str,
}

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    body: Value,
}

impl HttpError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            body: json!({ "ErrorMessage": msg }),
        }
    }

    fn not_found(msg: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    fn fields(fields: BTreeMap<String, String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!(fields),
        }
    }
}

impl From<HrError> for HttpError {
    fn from(err: HrError) -> Self {
        match err {
            HrError::Validation(errors) => HttpError::fields(errors.into_inner()),
            HrError::UnknownEmployee(_) => HttpError::new(StatusCode::BAD_REQUEST, &err.to_string()),
            HrError::EmployeeNotFound(_) => HttpError::not_found(&err.to_string()),
            HrError::Store(inner) => {
                error!(error = %inner, "store failure");
                HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection, "request body rejected");
        HttpError::new(StatusCode::BAD_REQUEST, &rejection.body_text())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
