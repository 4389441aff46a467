//! Data Transfer Objects for the remote pipeline API
//!
//! Wire shapes returned by or sent to the pipeline API. They are converted
//! into domain types at the client boundary.

pub mod job;
pub mod report;
