//! HTTP routes of the registration service

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use super::error::{RegistrationError, RegistrationResult};
use super::service::RegistrationService;

/// Body of `POST /store_user_data`
///
/// Fields are optional at the wire level so that a missing field is reported
/// as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
}

async fn handle_store_user_data(
    State(service): State<RegistrationService>,
    payload: Result<Json<StoreUserRequest>, JsonRejection>,
) -> RegistrationResult<Json<Value>> {
    let Json(request) =
        payload.map_err(|_| RegistrationError::validation("Invalid JSON data"))?;

    let message = service.register(
        request.name.as_deref().unwrap_or_default(),
        request.email.as_deref().unwrap_or_default(),
        request.dob.as_deref().unwrap_or_default(),
    )?;

    Ok(Json(json!({ "status": "success", "message": message })))
}

async fn handle_fetch_all_users(
    State(service): State<RegistrationService>,
) -> RegistrationResult<Json<Value>> {
    let users = service.list()?;
    Ok(Json(json!({ "status": "success", "users": users })))
}

/// Build the service router
pub fn router(service: RegistrationService) -> Router {
    Router::new()
        .route("/store_user_data", post(handle_store_user_data))
        .route("/fetch_all_users", post(handle_fetch_all_users))
        .with_state(service)
}

/// Serve the registration API on an already bound listener until shutdown
pub async fn serve(listener: TcpListener, service: RegistrationService) -> std::io::Result<()> {
    axum::serve(listener, router(service)).await
}
