//! Server-driven UI projection engine.
//!
//! Typed records are projected into a renderer-agnostic tree of named
//! components with props and children. A [`ProjectionRegistry`] binds each
//! record type to one [`LayoutStrategy`]; the built-in strategies are a
//! hand-authored [`ManualTree`], the schema-driven [`DerivedTable`] and the
//! [`NiceTable`] shorthand. The `shell` module is a thin delivery layer that
//! serves projected trees as JSON.

pub mod error;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod record;
pub mod registry;
pub mod render;
pub mod shell;
pub mod tree;
pub mod width;

#[cfg(test)]
mod fixtures;

pub use error::{ProjectionError, Result};
pub use layout::{
    DerivedTable, DerivedTableOptions, LayoutStrategy, ManualTree, NiceTable, project_with,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, NullSink,
};
pub use metrics::{MetricSnapshot, ProjectionMetrics};
pub use record::{
    Field, FieldDef, FieldKind, FieldType, FieldValue, Record, Schema, describe, record_json,
    values,
};
pub use registry::{BindingInfo, ProjectionRegistry};
pub use render::{PreviewSettings, TablePreview};
pub use shell::{SduiShell, ShellConfig, ShellError, ShellResult};
pub use tree::{Children, ComponentNode, ComponentTree, Props};
pub use width::display_width;
