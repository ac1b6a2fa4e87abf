//! Role-based authorization.
//!
//! These stages run after [`require_auth`](crate::middleware::auth::require_auth)
//! and read the payload it attached. A missing payload fails closed with 401.

use axum::{extract::Request, middleware::Next, response::Response};

use clearance_auth::Payload;
use clearance_core::AppError;
use clearance_models::roles;

use crate::metrics::track_authorization_check;
use crate::middleware::auth::AuthUser;

pub fn check_role(payload: &Payload, role: &str) -> bool {
    payload.role == role
}

pub fn check_any_role(payload: &Payload, allowed: &[&str]) -> bool {
    allowed.iter().any(|role| check_role(payload, role))
}

pub async fn require_roles(
    req: Request,
    next: Next,
    allowed: &[&str],
) -> Result<Response, AppError> {
    let auth_user = req
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| AppError::unauthorized("missing token payload"))?;

    let allowed_role = check_any_role(&auth_user.0, allowed);
    track_authorization_check(allowed_role, auth_user.role());

    if !allowed_role {
        return Err(AppError::forbidden("forbidden: insufficient role permissions"));
    }

    Ok(next.run(req).await)
}

/// Only `admin`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    require_roles(req, next, roles::ADMIN_ROLES).await
}

/// `admin` or `staff`.
pub async fn require_staff(req: Request, next: Next) -> Result<Response, AppError> {
    require_roles(req, next, roles::STAFF_ROLES).await
}
