//! Request guards.
//!
//! - [`auth`]: bearer token verification and the [`AuthUser`](auth::AuthUser) extractor
//! - [`role`]: role gates layered after authentication
//!
//! # Layering
//!
//! `route_layer` wraps outward, so the role gate is added first and the
//! authentication layer last:
//!
//! ```ignore
//! init_clearance_records_router()
//!     .route_layer(middleware::from_fn(require_staff))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
//! ```

pub mod auth;
pub mod role;
