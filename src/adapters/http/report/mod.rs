//! HTTP adapter for sales report endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::ReportResponse;
pub use handlers::ReportHandlers;
pub use routes::report_routes;
