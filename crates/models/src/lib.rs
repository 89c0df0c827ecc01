//! Entity definitions for the scheduling schema.
//!
//! Tables are created by the `migration` crate; the entities here mirror them
//! column for column. Field-level validators live next to the entity they
//! guard and are shared by the service layer.

pub mod errors;
pub mod db;
pub mod validation;
pub mod client;
pub mod job_type;
pub mod job;

#[cfg(test)]
mod tests;
