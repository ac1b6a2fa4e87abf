//! # Clearance CLI
//!
//! Administrative operations that have no HTTP surface: creating staff
//! accounts, opening and activating clearance sessions, and seeding demo
//! data for local development.
//!
//! ```ignore
//! use clearance_cli::admin::{activate_session, create_session};
//!
//! let session = create_session(&pool, "2024/2025", false).await?;
//! activate_session(&pool, session.id).await?;
//! ```

pub mod admin;
pub mod seeder;
