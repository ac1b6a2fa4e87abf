pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_clearance_records_router, init_session_records_router};
pub use service::ClearanceRecordService;
