//! Pipewatch Core
//!
//! Core types shared by the Pipewatch client, engine and CLI.
//!
//! This crate contains:
//! - Domain types: jobs, stages, statuses and snapshots, firm reports
//! - Classifier: which statuses keep a watcher alive and which silence it
//! - DTOs: request/response bodies for the remote pipeline API

pub mod classifier;
pub mod domain;
pub mod dto;
