//! Error orchestrator. Every failure the projection engine can report lives in
//! `types`; callers import `ProjectionError` and `Result` from here.

mod types;

pub use types::{ProjectionError, Result};
