pub mod schedule;
pub mod service;

pub use service::JobsService;
