//! Core domain types
//!
//! These types describe a server-tracked, multi-stage job as the client sees
//! it. The remote system of record owns the job; the client only ever holds
//! the last observed copy.

pub mod job;
pub mod report;
pub mod status;
