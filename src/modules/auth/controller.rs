use axum::{Json, extract::State};
use tracing::instrument;
use utoipa::ToSchema;

use clearance_core::AppError;
use clearance_models::{LoginRequest, LoginResponse};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::AuthService;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Login and receive an access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Bad request - malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(
        state.store.as_ref(),
        &state.jwt_maker,
        state.access_token_ttl,
        dto,
    )
    .await?;

    Ok(Json(response))
}
