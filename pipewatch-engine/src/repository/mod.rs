//! Repository layer
//!
//! Repositories abstract the remote pipeline API behind traits so the
//! coordinator can be driven by the real HTTP client or by a test double.

mod status;

pub use status::{ClientStatusSource, StatusSource};
