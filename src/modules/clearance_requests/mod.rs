pub mod controller;
pub mod router;
pub mod service;

pub use router::init_clearance_requests_router;
pub use service::ClearanceRequestService;
