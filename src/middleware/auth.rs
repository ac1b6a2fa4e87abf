use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use clearance_auth::{JwtMaker, Payload};
use clearance_core::AppError;
use clearance_models::StaffUserId;

use crate::metrics::track_jwt_validation;
use crate::state::AppState;

/// The verified token payload of the caller.
///
/// Inserted into request extensions by [`require_auth`]; handlers behind that
/// layer take it as an extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Payload);

impl AuthUser {
    pub fn staff_id(&self) -> StaffUserId {
        StaffUserId::new(self.0.user_id)
    }

    pub fn role(&self) -> &str {
        &self.0.role
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("missing token payload"))
    }
}

const MISSING_HEADER: &str = "missing authorization header";
const INVALID_FORMAT: &str = "invalid authorization header format";

/// Validates an `Authorization` header value: exactly two whitespace
/// separated fields, the first being `bearer` in any case.
pub fn authenticate_header(header: Option<&str>, maker: &JwtMaker) -> Result<Payload, AppError> {
    let header = header
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::unauthorized(MISSING_HEADER))?;

    let fields: Vec<&str> = header.split_whitespace().collect();
    let token = match fields.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => *token,
        _ => return Err(AppError::unauthorized(INVALID_FORMAT)),
    };

    maker
        .verify_token(token)
        .map_err(|e| AppError::unauthorized(e.to_string()))
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // A header that is present but not visible ASCII is malformed, not missing
    let payload = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| AppError::unauthorized(INVALID_FORMAT))
        })
        .transpose()
        .and_then(|auth_header| authenticate_header(auth_header, &state.jwt_maker));
    track_jwt_validation(payload.is_ok());
    let payload = payload?;

    req.extensions_mut().insert(AuthUser(payload));
    Ok(next.run(req).await)
}
