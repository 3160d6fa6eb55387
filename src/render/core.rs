use std::io::Write;

use serde_json::Value;

use crate::error::Result;
use crate::layout::nice_table::NICE_TABLE;
use crate::layout::table::{TABLE_BODY, TABLE_HEAD};
use crate::tree::{ComponentNode, ComponentTree};
use crate::width::{display_width, pad_to_width, truncate_to_width};

/// Preview parameters.
#[derive(Debug, Clone)]
pub struct PreviewSettings {
    pub max_column_width: Option<usize>,
    pub separator: String,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            max_column_width: Some(32),
            separator: " | ".to_string(),
        }
    }
}

/// Renders the first table found in a tree as aligned text columns.
///
/// Understands both the generic `TableHead`/`TableBody` shape and the
/// `NiceTable` shorthand.
pub struct TablePreview {
    settings: PreviewSettings,
}

impl TablePreview {
    pub fn new(settings: PreviewSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(PreviewSettings::default())
    }

    pub fn settings_mut(&mut self) -> &mut PreviewSettings {
        &mut self.settings
    }

    /// Text preview, or `None` when the tree holds no table.
    pub fn preview(&self, tree: &ComponentTree) -> Option<String> {
        let (headings, rows) = extract_table(tree)?;
        Some(self.format(&headings, &rows))
    }

    pub fn render(&self, writer: &mut impl Write, tree: &ComponentTree) -> Result<()> {
        match self.preview(tree) {
            Some(text) => writer.write_all(text.as_bytes())?,
            None => writer.write_all(b"(no table)\n")?,
        }
        writer.flush()?;
        Ok(())
    }

    fn format(&self, headings: &[String], rows: &[Vec<String>]) -> String {
        let clip = |text: &str| match self.settings.max_column_width {
            Some(max) => truncate_to_width(text, max),
            None => text.to_string(),
        };

        let headings: Vec<String> = headings.iter().map(|h| clip(h.as_str())).collect();
        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(|cell| clip(cell.as_str())).collect())
            .collect();

        let mut widths: Vec<usize> = headings.iter().map(|h| display_width(h)).collect();
        for row in &rows {
            for (column, cell) in row.iter().enumerate() {
                if column < widths.len() {
                    widths[column] = widths[column].max(display_width(cell));
                }
            }
        }

        let mut out = String::new();
        out.push_str(&self.line(&headings, &widths));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&self.line(&rule, &widths).replace(' ', "-"));
        for row in &rows {
            out.push_str(&self.line(row, &widths));
        }
        out
    }

    fn line(&self, cells: &[String], widths: &[usize]) -> String {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(column, width)| {
                let cell = cells.get(column).map(String::as_str).unwrap_or("");
                pad_to_width(cell, *width)
            })
            .collect();
        let mut line = padded.join(&self.settings.separator).trim_end().to_string();
        line.push('\n');
        line
    }
}

type Table = (Vec<String>, Vec<Vec<String>>);

fn extract_table(tree: &ComponentTree) -> Option<Table> {
    if let Some(head) = tree.find(TABLE_HEAD) {
        let headings = head
            .child_nodes()
            .first()
            .map(row_texts)
            .unwrap_or_default();
        let rows: Vec<Vec<String>> = tree
            .find(TABLE_BODY)
            .map(|body| body.child_nodes().iter().map(row_texts).collect())
            .unwrap_or_default();
        return Some((headings, rows));
    }

    let nice = tree.find(NICE_TABLE)?;
    let headings: Vec<String> = nice
        .props
        .get("headings")?
        .as_array()?
        .iter()
        .map(value_text)
        .collect();
    let rows: Vec<Vec<String>> = nice
        .props
        .get("rows")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .map(|row| headings.iter().map(|h| value_text(&row[h.as_str()])).collect())
                .collect()
        })
        .unwrap_or_default();
    Some((headings, rows))
}

fn row_texts(row: &ComponentNode) -> Vec<String> {
    row.child_nodes()
        .iter()
        .map(|cell| cell.text_content().unwrap_or_default())
        .collect()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Dessert, desserts};
    use crate::layout::{DerivedTable, NiceTable, project_with};

    #[test]
    fn derived_table_preview_aligns_columns() {
        let tree = project_with::<Dessert>(&DerivedTable::new(), &desserts()[..2]).unwrap();
        let text = TablePreview::with_default().preview(&tree).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "name               | calories | fat | carbs | protein"
        );
        assert!(lines[1].starts_with("-------------------|-"));
        assert_eq!(
            lines[3],
            "Ice cream sandwich | 237      | 9   | 37    | 4.3"
        );
    }

    #[test]
    fn nice_table_preview_reads_props() {
        let tree = project_with::<Dessert>(&NiceTable::new(), &desserts()[2..3]).unwrap();
        let text = TablePreview::with_default().preview(&tree).unwrap();
        assert!(text.lines().nth(2).unwrap().starts_with("Eclair | 262"));
    }

    #[test]
    fn render_reports_missing_table() {
        let mut out = Vec::new();
        TablePreview::with_default()
            .render(&mut out, &ComponentTree::single(ComponentNode::new("Text")))
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "(no table)\n");
    }

    #[test]
    fn long_cells_are_clipped() {
        let mut preview = TablePreview::with_default();
        preview.settings_mut().max_column_width = Some(6);
        let tree = project_with::<Dessert>(&DerivedTable::new(), &desserts()[1..2]).unwrap();
        let text = preview.preview(&tree).unwrap();
        assert!(text.lines().nth(2).unwrap().starts_with("Ice c…"));
    }
}
