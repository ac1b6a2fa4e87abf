//! # Clearance Core
//!
//! Foundational types shared by every crate in the Clearance API:
//!
//! - [`errors`]: the application error taxonomy and its HTTP rendering
//! - [`password`]: password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use clearance_core::{AppError, ErrorKind};
//! use clearance_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("student not found"));
//! assert_eq!(error.kind, ErrorKind::NotFound);
//!
//! let hash = hash_password("secure_password")?;
//! assert!(verify_password("secure_password", &hash)?);
//! ```

pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorKind};
pub use password::{hash_password, verify_password};
