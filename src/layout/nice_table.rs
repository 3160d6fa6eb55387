//! Shorthand table: a single `NiceTable` node carrying headings and raw rows
//! as props, for renderers that know how to draw a table on their own.

use serde_json::Value;

use crate::error::Result;
use crate::record::{Record, Schema, record_json};
use crate::tree::{ComponentNode, ComponentTree};

use super::LayoutStrategy;

pub const NICE_TABLE: &str = "NiceTable";

/// Headings are field names unless `with_labels` is set, in which case each
/// field's label is used where it has one. Row keys are always field names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NiceTable {
    use_labels: bool,
}

impl NiceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels() -> Self {
        Self { use_labels: true }
    }

    pub fn uses_labels(&self) -> bool {
        self.use_labels
    }

    fn headings(&self, schema: &Schema) -> Vec<Value> {
        schema
            .fields()
            .iter()
            .map(|def| {
                let heading = if self.use_labels {
                    def.heading()
                } else {
                    def.name.as_str()
                };
                Value::String(heading.to_string())
            })
            .collect()
    }
}

impl<R: Record> LayoutStrategy<R> for NiceTable {
    fn name(&self) -> &str {
        if self.use_labels {
            "nice_table_labelled"
        } else {
            "nice_table"
        }
    }

    fn layout(&self, schema: &Schema, records: &[R]) -> Result<ComponentTree> {
        let rows = records
            .iter()
            .map(|record| record_json(schema, record))
            .collect::<Result<Vec<_>>>()?;

        Ok(ComponentTree::single(
            ComponentNode::new(NICE_TABLE)
                .prop("headings", self.headings(schema))
                .prop("rows", rows),
        ))
    }
}
