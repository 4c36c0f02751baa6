//! Profile reporting module.

mod model;
mod repository;

pub use model::ProfileReport;
pub use repository::ReportRepository;
