use chrono::Duration;
use tracing::{info, instrument};

use clearance_auth::JwtMaker;
use clearance_core::{AppError, verify_password};
use clearance_db::Store;
use clearance_models::{LoginRequest, LoginResponse};

use crate::metrics::{track_staff_login_failure, track_staff_login_success};

const INVALID_CREDENTIALS: &str = "invalid username or password";

pub struct AuthService;

impl AuthService {
    /// Verifies staff credentials and mints an access token carrying the
    /// user's id and role. Unknown users and wrong passwords are
    /// indistinguishable to the caller.
    #[instrument(skip(store, jwt_maker, dto), fields(username = %dto.username))]
    pub async fn login(
        store: &dyn Store,
        jwt_maker: &JwtMaker,
        access_token_ttl: Duration,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let credentials = match store.get_staff_user_by_username(&dto.username).await {
            Ok(credentials) => credentials,
            Err(e) if e.is_not_found() => {
                track_staff_login_failure("unknown_user");
                return Err(AppError::unauthorized(INVALID_CREDENTIALS));
            }
            Err(e) => return Err(e.into()),
        };

        if !verify_password(&dto.password, &credentials.password_hash)? {
            track_staff_login_failure("wrong_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let (access_token, payload) = jwt_maker
            .create_token(
                credentials.user.id.get(),
                &credentials.role,
                access_token_ttl,
            )
            .map_err(AppError::internal)?;

        track_staff_login_success(&credentials.role);
        info!(user_id = %credentials.user.id, role = %credentials.role, "Staff user logged in");

        Ok(LoginResponse {
            access_token,
            payload,
            user: credentials.user,
        })
    }
}
