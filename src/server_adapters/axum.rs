//! Axum router for the gateway
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use adi_gateway::{Gateway, GatewayConfig};
//! use adi_gateway::server_adapters::axum::router;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = Arc::new(Gateway::new(GatewayConfig::from_env()?)?);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, router(gateway)).await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use super::ErrorBody;
use crate::error::{ErrorCode, NormalizedError};
use crate::gateway::Gateway;
use crate::types::ProcessRequest;

/// A [`NormalizedError`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub NormalizedError);

impl From<NormalizedError> for ApiError {
    fn from(err: NormalizedError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(ErrorBody::from(&self.0))).into_response();
        if let Some(wait) = self.0.retry_after {
            let secs = wait.as_secs().saturating_add(u64::from(wait.subsec_nanos() > 0));
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListModelsQuery {
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
}

/// Build the router with permissive CORS.
pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route(
            "/api/process",
            post(process)
                .options(preflight)
                .fallback(|| method_not_allowed("POST")),
        )
        .route(
            "/api/list-models",
            get(list_models)
                .options(preflight)
                .fallback(|| method_not_allowed("GET")),
        )
        .route(
            "/api/providers",
            get(providers)
                .options(preflight)
                .fallback(|| method_not_allowed("GET")),
        )
        .layer(CorsLayer::permissive())
        .with_state(gateway)
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed(allowed: &'static str) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody::method_not_allowed(allowed)),
    )
        .into_response()
}

async fn process(
    State(gateway): State<Arc<Gateway>>,
    body: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        NormalizedError::invalid(ErrorCode::InvalidRequest, rejection.body_text())
    })?;
    let result = gateway.handle_process(request).await?;
    Ok(Json(result).into_response())
}

async fn list_models(
    State(gateway): State<Arc<Gateway>>,
    Query(query): Query<ListModelsQuery>,
) -> Result<Response, ApiError> {
    let models = gateway.list_models(query.api_key.as_deref()).await?;
    Ok(Json(models).into_response())
}

async fn providers(State(gateway): State<Arc<Gateway>>) -> Response {
    Json(gateway.providers()).into_response()
}
