//! Layout strategies turn a schema plus records into a component tree.
//!
//! `core` holds the strategy trait, the hand-authored `ManualTree` and the
//! registry-free `project_with` entry point; `table` and `nice_table` hold the
//! schema-driven built-ins.

mod core;
pub mod nice_table;
pub mod table;

pub use self::core::{LayoutStrategy, ManualTree, project_with, validate_records};
pub use nice_table::NiceTable;
pub use table::{DerivedTable, DerivedTableOptions};
