// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::Local;
use clap::Parser;
use fieldwork_api::{
    AddAttachmentRequest, ApiError, AuthenticatedAgent, CreateWorkOrderRequest, ImportPlan,
    ImportProgress, ImportReport, ListWorkOrdersRequest, ListWorkOrdersResponse, MessageResponse,
    Role, StatsResponse, UpdateWorkOrderRequest, UpdateWorkOrderStatusRequest, WorkOrderDto,
    add_attachment, authenticate_stub, create_work_order, delete_work_order,
    execute_import_batch, export_csv, export_xlsx, fetch_all_for_export, get_work_order,
    get_work_order_by_number, get_work_order_stats, list_work_orders, update_work_order,
    update_work_order_status,
};
use fieldwork_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{error, info};

/// Fieldwork Server - HTTP server for the field-service work-order system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// `SQLite` busy timeout in milliseconds for file-based databases
    #[arg(long, default_value_t = 5000)]
    busy_timeout_ms: u32,
}

/// Registry of running and finished import jobs.
///
/// Jobs stay queryable after they finish so a client can fetch the final
/// report at its own pace.
#[derive(Debug, Default)]
struct ImportRegistry {
    next_id: AtomicU64,
    jobs: Mutex<HashMap<u64, Arc<ImportProgress>>>,
}

impl ImportRegistry {
    async fn register(&self, progress: Arc<ImportProgress>) -> u64 {
        let id: u64 = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut jobs = self.jobs.lock().await;
        jobs.insert(id, progress);
        id
    }

    async fn get(&self, id: u64) -> Option<Arc<ImportProgress>> {
        let jobs = self.jobs.lock().await;
        jobs.get(&id).cloned()
    }
}

/// Application state shared across handlers.
///
/// The persistence layer is wrapped in a Mutex to allow safe concurrent
/// access; import batches take the same lock, so they interleave with
/// regular requests at batch granularity.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for work orders and attachments.
    persistence: Arc<Mutex<Persistence>>,
    /// Running and finished bulk imports.
    imports: Arc<ImportRegistry>,
}

/// Query parameters identifying the acting agent.
#[derive(Debug, Deserialize)]
struct ActorQuery {
    /// The agent ID performing this action.
    agent_id: String,
    /// Display name stamped into audit fields.
    agent_name: Option<String>,
    /// The agent's role: "admin" or "agent". Defaults to "agent".
    agent_role: Option<String>,
}

/// Query parameters for the export endpoint.
#[derive(Debug, Deserialize)]
struct ExportQuery {
    /// Export format: "csv" or "xlsx". Defaults to "csv".
    format: Option<String>,
}

/// Query parameters for starting an import.
#[derive(Debug, Deserialize)]
struct ImportQuery {
    /// The uploaded file's name; the extension selects the parser.
    file_name: String,
}

/// API response for a started import.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ImportStartedResponse {
    /// The job ID to poll and cancel with.
    import_id: u64,
    /// Total data rows found in the file.
    total: usize,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ValidationFailed { .. }
            | ApiError::InvalidInput { .. }
            | ApiError::InvalidFileFormat { .. } => StatusCode::BAD_REQUEST,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %err, "Internal error");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Resolves the acting agent from the request's query parameters.
fn resolve_agent(query: &ActorQuery) -> Result<AuthenticatedAgent, HttpError> {
    let role: Role = match query.agent_role.as_deref() {
        None | Some("agent") => Role::Agent,
        Some("admin") => Role::Admin,
        Some(other) => {
            return Err(HttpError {
                status: StatusCode::BAD_REQUEST,
                message: format!("Invalid role: '{other}'. Must be 'admin' or 'agent'"),
            });
        }
    };
    authenticate_stub(
        query.agent_id.clone(),
        query.agent_name.clone().unwrap_or_default(),
        role,
    )
    .map_err(|e| HttpError {
        status: StatusCode::UNAUTHORIZED,
        message: e.to_string(),
    })
}

/// Handler for POST `/work_orders` endpoint.
///
/// Creates a new work order, generating a number unless one is supplied.
async fn handle_create_work_order(
    AxumState(app_state): AxumState<AppState>,
    Query(actor): Query<ActorQuery>,
    Json(req): Json<CreateWorkOrderRequest>,
) -> Result<Json<WorkOrderDto>, HttpError> {
    info!(
        agent_id = %actor.agent_id,
        customer = %req.customer_name,
        "Handling create_work_order request"
    );

    let agent: AuthenticatedAgent = resolve_agent(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let dto: WorkOrderDto = create_work_order(&mut persistence, &req, &agent)?;
    drop(persistence);

    Ok(Json(dto))
}

/// Handler for GET `/work_orders` endpoint.
///
/// Lists work orders matching the filter, newest first, paginated.
async fn handle_list_work_orders(
    AxumState(app_state): AxumState<AppState>,
    Query(actor): Query<ActorQuery>,
    Query(req): Query<ListWorkOrdersRequest>,
) -> Result<Json<ListWorkOrdersResponse>, HttpError> {
    let agent: AuthenticatedAgent = resolve_agent(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ListWorkOrdersResponse = list_work_orders(&mut persistence, &req, &agent)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/work_orders/{id}` endpoint.
async fn handle_get_work_order(
    AxumState(app_state): AxumState<AppState>,
    Query(actor): Query<ActorQuery>,
    Path(id): Path<i64>,
) -> Result<Json<WorkOrderDto>, HttpError> {
    let agent: AuthenticatedAgent = resolve_agent(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let dto: WorkOrderDto = get_work_order(&mut persistence, id, &agent)?;
    drop(persistence);

    Ok(Json(dto))
}

/// Handler for GET `/work_orders/number/{number}` endpoint.
async fn handle_get_work_order_by_number(
    AxumState(app_state): AxumState<AppState>,
    Query(actor): Query<ActorQuery>,
    Path(number): Path<String>,
) -> Result<Json<WorkOrderDto>, HttpError> {
    let agent: AuthenticatedAgent = resolve_agent(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let dto: WorkOrderDto = get_work_order_by_number(&mut persistence, &number, &agent)?;
    drop(persistence);

    Ok(Json(dto))
}

/// Handler for PUT `/work_orders/{id}` endpoint.
///
/// Full update of an editable work order.
async fn handle_update_work_order(
    AxumState(app_state): AxumState<AppState>,
    Query(actor): Query<ActorQuery>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateWorkOrderRequest>,
) -> Result<Json<WorkOrderDto>, HttpError> {
    info!(agent_id = %actor.agent_id, id = id, "Handling update_work_order request");

    let agent: AuthenticatedAgent = resolve_agent(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let dto: WorkOrderDto = update_work_order(&mut persistence, id, &req, &agent)?;
    drop(persistence);

    Ok(Json(dto))
}

/// Handler for POST `/work_orders/{id}/status` endpoint.
///
/// Applies a lifecycle status transition.
async fn handle_update_work_order_status(
    AxumState(app_state): AxumState<AppState>,
    Query(actor): Query<ActorQuery>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateWorkOrderStatusRequest>,
) -> Result<Json<WorkOrderDto>, HttpError> {
    info!(
        agent_id = %actor.agent_id,
        id = id,
        status = %req.status,
        "Handling update_work_order_status request"
    );

    let agent: AuthenticatedAgent = resolve_agent(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let dto: WorkOrderDto = update_work_order_status(&mut persistence, id, &req, &agent)?;
    drop(persistence);

    Ok(Json(dto))
}

/// Handler for DELETE `/work_orders/{id}` endpoint.
///
/// Soft-deletes a work order. Admin only.
async fn handle_delete_work_order(
    AxumState(app_state): AxumState<AppState>,
    Query(actor): Query<ActorQuery>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(agent_id = %actor.agent_id, id = id, "Handling delete_work_order request");

    let agent: AuthenticatedAgent = resolve_agent(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = delete_work_order(&mut persistence, id, &agent)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/work_orders/{id}/attachments` endpoint.
async fn handle_add_attachment(
    AxumState(app_state): AxumState<AppState>,
    Query(actor): Query<ActorQuery>,
    Path(id): Path<i64>,
    Json(req): Json<AddAttachmentRequest>,
) -> Result<Json<WorkOrderDto>, HttpError> {
    info!(agent_id = %actor.agent_id, id = id, "Handling add_attachment request");

    let agent: AuthenticatedAgent = resolve_agent(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let dto: WorkOrderDto = add_attachment(&mut persistence, id, &req, &agent)?;
    drop(persistence);

    Ok(Json(dto))
}

/// Handler for GET `/work_orders/stats` endpoint.
///
/// Returns aggregate statistics over the filtered, non-deleted set.
async fn handle_get_work_order_stats(
    AxumState(app_state): AxumState<AppState>,
    Query(actor): Query<ActorQuery>,
    Query(req): Query<ListWorkOrdersRequest>,
) -> Result<Json<StatsResponse>, HttpError> {
    let agent: AuthenticatedAgent = resolve_agent(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let stats: StatsResponse = get_work_order_stats(&mut persistence, &req, &agent)?;
    drop(persistence);

    Ok(Json(stats))
}

/// Handler for GET `/work_orders/export` endpoint.
///
/// Exports the filtered set as CSV or a styled spreadsheet.
async fn handle_export_work_orders(
    AxumState(app_state): AxumState<AppState>,
    Query(actor): Query<ActorQuery>,
    Query(format): Query<ExportQuery>,
    Query(req): Query<ListWorkOrdersRequest>,
) -> Result<Response, HttpError> {
    let agent: AuthenticatedAgent = resolve_agent(&actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let orders = fetch_all_for_export(&mut persistence, &req, &agent)?;
    drop(persistence);

    info!(count = orders.len(), "Exporting work orders");

    match format.format.as_deref() {
        None | Some("csv") => {
            let bytes: Vec<u8> = export_csv(&orders)?;
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"work_orders.csv\"",
                    ),
                ],
                bytes,
            )
                .into_response())
        }
        Some("xlsx") => {
            let bytes: Vec<u8> = export_xlsx(&orders)?;
            Ok((
                [
                    (
                        header::CONTENT_TYPE,
                        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                    ),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"work_orders.xlsx\"",
                    ),
                ],
                bytes,
            )
                .into_response())
        }
        Some(other) => Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid export format: '{other}'. Must be 'csv' or 'xlsx'"),
        }),
    }
}

/// Handler for POST `/work_orders/import` endpoint.
///
/// Parses the uploaded file up front, registers a job, and spawns the batch
/// driver. The response carries the job ID for polling and cancellation.
async fn handle_start_import(
    AxumState(app_state): AxumState<AppState>,
    Query(actor): Query<ActorQuery>,
    Query(query): Query<ImportQuery>,
    body: Bytes,
) -> Result<Json<ImportStartedResponse>, HttpError> {
    info!(
        agent_id = %actor.agent_id,
        file_name = %query.file_name,
        size = body.len(),
        "Handling import request"
    );

    let agent: AuthenticatedAgent = resolve_agent(&actor)?;

    let plan: ImportPlan =
        ImportPlan::prepare(&query.file_name, &body, Local::now().date_naive())?;
    let total: usize = plan.total;

    let progress: Arc<ImportProgress> = Arc::new(ImportProgress::new(total));
    let import_id: u64 = app_state.imports.register(Arc::clone(&progress)).await;

    let state: AppState = app_state.clone();
    tokio::spawn(async move {
        for batch in plan.batches() {
            if progress.is_cancelled() {
                break;
            }
            let mut persistence = state.persistence.lock().await;
            execute_import_batch(&mut persistence, batch, &agent, &progress);
            drop(persistence);
        }
        progress.mark_finished();
        info!(import_id = import_id, "Import finished");
    });

    Ok(Json(ImportStartedResponse { import_id, total }))
}

/// Handler for GET `/imports/{id}` endpoint.
///
/// Returns the job's current report; valid mid-flight and after completion.
async fn handle_get_import_report(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ImportReport>, HttpError> {
    let progress: Arc<ImportProgress> =
        app_state.imports.get(id).await.ok_or_else(|| HttpError {
            status: StatusCode::NOT_FOUND,
            message: format!("No import job with ID {id}"),
        })?;

    Ok(Json(progress.snapshot()))
}

/// Handler for POST `/imports/{id}/cancel` endpoint.
///
/// Requests cooperative cancellation; the batch in flight still completes.
async fn handle_cancel_import(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, HttpError> {
    let progress: Arc<ImportProgress> =
        app_state.imports.get(id).await.ok_or_else(|| HttpError {
            status: StatusCode::NOT_FOUND,
            message: format!("No import job with ID {id}"),
        })?;

    progress.request_cancel();
    info!(import_id = id, "Import cancellation requested");

    Ok(Json(MessageResponse {
        message: format!("Cancellation requested for import {id}"),
    }))
}

/// Handler for GET /health endpoint.
async fn handle_health() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: String::from("ok"),
    })
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/work_orders", post(handle_create_work_order))
        .route("/work_orders", get(handle_list_work_orders))
        .route("/work_orders/stats", get(handle_get_work_order_stats))
        .route("/work_orders/export", get(handle_export_work_orders))
        .route("/work_orders/import", post(handle_start_import))
        .route(
            "/work_orders/number/{number}",
            get(handle_get_work_order_by_number),
        )
        .route("/work_orders/{id}", get(handle_get_work_order))
        .route("/work_orders/{id}", put(handle_update_work_order))
        .route("/work_orders/{id}", delete(handle_delete_work_order))
        .route(
            "/work_orders/{id}/status",
            post(handle_update_work_order_status),
        )
        .route("/work_orders/{id}/attachments", post(handle_add_attachment))
        .route("/imports/{id}", get(handle_get_import_report))
        .route("/imports/{id}/cancel", post(handle_cancel_import))
        .route("/health", get(handle_health))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Fieldwork Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path, args.busy_timeout_ms)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        imports: Arc::new(ImportRegistry::default()),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
