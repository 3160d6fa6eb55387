//! Schema-driven table strategy.
//!
//! Headings come from schema field names and each record becomes one body row
//! with one cell per field, in schema order. Nothing is authored per field.

use serde_json::json;

use crate::error::Result;
use crate::record::{FieldDef, FieldValue, Record, Schema, conform};
use crate::tree::{ComponentNode, ComponentTree, Props};

use super::LayoutStrategy;

pub const TABLE_CONTAINER: &str = "TableContainer";
pub const TABLE: &str = "Table";
pub const TABLE_HEAD: &str = "TableHead";
pub const TABLE_BODY: &str = "TableBody";
pub const TABLE_ROW: &str = "TableRow";
pub const TABLE_CELL: &str = "TableCell";

/// Presentation knobs for [`DerivedTable`]. None of them add, drop or reorder
/// cells.
#[derive(Debug, Clone)]
pub struct DerivedTableOptions {
    /// Props placed on the outer container node.
    pub container_props: Props,
    /// Mark the first body cell of each row as a row header.
    pub row_header: bool,
    /// Right-align cells of numeric fields.
    pub align_numeric: bool,
    /// Use field labels instead of raw names as headings.
    pub use_labels: bool,
}

impl Default for DerivedTableOptions {
    fn default() -> Self {
        let mut container_props = Props::new();
        container_props.insert("component".to_string(), json!("Paper"));
        Self {
            container_props,
            row_header: true,
            align_numeric: true,
            use_labels: false,
        }
    }
}

impl DerivedTableOptions {
    /// No props on any node; only structure and text.
    pub fn plain() -> Self {
        Self {
            container_props: Props::new(),
            row_header: false,
            align_numeric: false,
            use_labels: false,
        }
    }

    pub fn with_labels(mut self, enabled: bool) -> Self {
        self.use_labels = enabled;
        self
    }

    pub fn with_row_header(mut self, enabled: bool) -> Self {
        self.row_header = enabled;
        self
    }

    pub fn with_align_numeric(mut self, enabled: bool) -> Self {
        self.align_numeric = enabled;
        self
    }
}

/// `TableContainer > Table > TableHead/TableBody > TableRow > TableCell`.
#[derive(Debug, Clone, Default)]
pub struct DerivedTable {
    options: DerivedTableOptions,
}

impl DerivedTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DerivedTableOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DerivedTableOptions {
        &self.options
    }

    fn heading_cell(&self, def: &FieldDef) -> ComponentNode {
        let heading = if self.options.use_labels {
            def.heading()
        } else {
            def.name.as_str()
        };
        ComponentNode::new(TABLE_CELL).text(heading)
    }

    fn body_cell(&self, column: usize, def: &FieldDef, value: &FieldValue) -> ComponentNode {
        let cell = ComponentNode::new(TABLE_CELL);
        let cell = if column == 0 && self.options.row_header {
            cell.prop("component", "th").prop("scope", "row")
        } else if self.options.align_numeric && def.kind.is_numeric() {
            cell.prop("align", "right")
        } else {
            cell
        };
        cell.text(value.display_text())
    }

    fn body_row<R: Record>(&self, schema: &Schema, record: &R, index: usize) -> Result<ComponentNode> {
        let values = conform(schema, record, index)?;
        let cells = schema
            .fields()
            .iter()
            .zip(values.iter())
            .enumerate()
            .map(|(column, (def, value))| self.body_cell(column, def, value));
        Ok(ComponentNode::new(TABLE_ROW).children(cells))
    }
}

impl<R: Record> LayoutStrategy<R> for DerivedTable {
    fn name(&self) -> &str {
        "derived_table"
    }

    fn layout(&self, schema: &Schema, records: &[R]) -> Result<ComponentTree> {
        let header_row = ComponentNode::new(TABLE_ROW)
            .children(schema.fields().iter().map(|def| self.heading_cell(def)));

        let body_rows = records
            .iter()
            .enumerate()
            .map(|(index, record)| self.body_row(schema, record, index))
            .collect::<Result<Vec<_>>>()?;

        let table = ComponentNode::new(TABLE)
            .child(ComponentNode::new(TABLE_HEAD).child(header_row))
            .child(ComponentNode::new(TABLE_BODY).children(body_rows));

        Ok(ComponentTree::single(
            ComponentNode::new(TABLE_CONTAINER)
                .with_props(self.options.container_props.clone())
                .child(table),
        ))
    }
}
