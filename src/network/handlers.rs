// Route handlers and middleware

use crate::model::{GetMunroResponse, Munro};
use crate::pagination::{PaginatedData, PaginationError};
use crate::query::ListParams;
use crate::service::{MunroService, ServiceError, ServiceResult};
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{error, info, warn};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

pub type AppState = Arc<MunroService>;

/// Error returned from a handler, rendered as `{"error": message}`
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::MalformedFilter(_) => StatusCode::BAD_REQUEST,
            ServiceError::Pagination(PaginationError::FilterRequired) => StatusCode::BAD_REQUEST,
            ServiceError::Pagination(PaginationError::QueryExecutionFailed(_))
            | ServiceError::QueryExecutionFailed(_)
            | ServiceError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn inner(&self) -> &ServiceError {
        &self.0
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Build the application router.
///
/// At most `max_connections` requests are handled at once; the rest wait for
/// a permit.
pub fn router(service: AppState, max_connections: usize) -> Router {
    limited_router(service, Arc::new(Semaphore::new(max_connections.max(1))))
}

/// Build the application router around an existing request limiter. A closed
/// limiter answers every request with 503.
pub fn limited_router(service: AppState, limiter: Arc<Semaphore>) -> Router {
    Router::new()
        .route("/munro/:name", get(get_munro))
        .route("/munro", get(list_names))
        .route("/munros", get(list_munros))
        .layer(middleware::from_fn(log_request))
        .layer(middleware::from_fn_with_state(limiter, limit_concurrency))
        .with_state(service)
}

pub async fn get_munro(
    State(service): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<GetMunroResponse>, ApiError> {
    let response = run_blocking(service, move |service| service.get_munro(&name)).await?;
    Ok(Json(response))
}

pub async fn list_names(State(service): State<AppState>) -> Json<Vec<String>> {
    Json(service.list_names())
}

pub async fn list_munros(
    State(service): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PaginatedData<Vec<Munro>>>, ApiError> {
    let page = run_blocking(service, move |service| service.list_munros(&params)).await?;
    Ok(Json(page))
}

/// Run a store-bound service call on the blocking pool
async fn run_blocking<T, F>(service: AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&MunroService) -> ServiceResult<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| ApiError::from(ServiceError::Worker(e.to_string())))?;
    Ok(result?)
}

async fn limit_concurrency(
    State(limiter): State<Arc<Semaphore>>,
    request: Request,
    next: Next,
) -> Response {
    let _permit = match limiter.acquire().await {
        Ok(permit) => permit,
        Err(_) => {
            error!("Failed to acquire connection permit");
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
    };
    next.run(request).await
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} {} {:?}",
        method,
        uri,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}
