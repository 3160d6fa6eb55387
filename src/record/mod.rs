//! Record model orchestrator.
//!
//! Typed records describe their shape once through a [`Schema`]; the engine
//! reads instance values back in schema order. The `record!` macro declares a
//! struct and its `Record` impl in one go.

mod core;
mod macros;

pub use self::core::{
    Field, FieldDef, FieldKind, FieldType, FieldValue, Record, Schema, conform, describe,
    record_json, values,
};
