//! Thin delivery shell around the projection engine.
//!
//! Routes map a request path to a handler producing a JSON body. The socket
//! driver speaks newline-delimited JSON over TCP so demos and tests can fetch
//! trees without an HTTP stack.

pub mod config;
pub mod socket;

pub use config::ShellConfig;
pub use socket::{
    SduiShell, ShellError, ShellResult, projection_route, records_route, strategy_route,
};
