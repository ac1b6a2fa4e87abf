pub mod auth;
pub mod clearance_records;
pub mod clearance_requests;
pub mod notifications;
