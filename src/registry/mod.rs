//! Projection registry orchestrator: binds record types to layout strategies
//! and serves `project` as the single call surface for live data.

mod core;

pub use self::core::{BindingInfo, ProjectionRegistry};
