//! Dessert nutrition demo served over the newline-delimited JSON shell.
//!
//! Run with `cargo run --example dessert_server [config.json]`, then send
//! `{"path":"/nice_table_demo/_sdui"}` lines to the bound address.

use std::net::TcpListener;
use std::sync::Arc;

use sdui_projection::layout::table::{
    TABLE, TABLE_BODY, TABLE_CELL, TABLE_CONTAINER, TABLE_HEAD, TABLE_ROW,
};
use sdui_projection::shell::{projection_route, records_route, strategy_route};
use sdui_projection::{
    ComponentNode, ComponentTree, ManualTree, NiceTable, ProjectionRegistry, Schema, SduiShell,
    ShellConfig, ShellResult, TablePreview, project_with,
};

sdui_projection::record! {
    #[derive(Debug, Clone)]
    pub struct CalorieInformation {
        pub name: String => "Dessert (100g serving)",
        pub calories: i64 => "Calories",
        pub fat: f64 => "Fat (g)",
        pub carbs: i64 => "Carbs (g)",
        pub protein: f64 => "Protein (g)",
    }
}

fn dessert(name: &str, calories: i64, fat: f64, carbs: i64, protein: f64) -> CalorieInformation {
    CalorieInformation {
        name: name.to_string(),
        calories,
        fat,
        carbs,
        protein,
    }
}

fn rows() -> Vec<CalorieInformation> {
    vec![
        dessert("Frozen yoghurt", 159, 6.0, 24, 4.0),
        dessert("Ice cream sandwich", 237, 9.0, 37, 4.3),
        dessert("Eclair", 262, 16.0, 24, 6.0),
        dessert("Cupcake", 305, 3.7, 67, 4.3),
        dessert("Gingerbread", 356, 16.0, 49, 3.9),
    ]
}

fn numeric_cell(text: String) -> ComponentNode {
    ComponentNode::new(TABLE_CELL).prop("align", "right").text(text)
}

/// Hand-authored table: labelled headings, one cell per nutrient.
fn raw_structure(schema: &Schema, rows: &[CalorieInformation]) -> ComponentTree {
    let headings = schema
        .fields()
        .iter()
        .map(|def| ComponentNode::new(TABLE_CELL).text(def.heading()));

    let body = rows.iter().map(|row| {
        ComponentNode::new(TABLE_ROW)
            .child(
                ComponentNode::new(TABLE_CELL)
                    .prop("component", "th")
                    .prop("scope", "row")
                    .text(row.name.as_str()),
            )
            .child(numeric_cell(row.calories.to_string()))
            .child(numeric_cell(row.fat.to_string()))
            .child(numeric_cell(row.carbs.to_string()))
            .child(numeric_cell(row.protein.to_string()))
    });

    ComponentTree::single(
        ComponentNode::new(TABLE_CONTAINER)
            .prop("component", "Paper")
            .child(
                ComponentNode::new(TABLE)
                    .child(
                        ComponentNode::new(TABLE_HEAD)
                            .child(ComponentNode::new(TABLE_ROW).children(headings)),
                    )
                    .child(ComponentNode::new(TABLE_BODY).children(body)),
            ),
    )
}

fn main() -> ShellResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => ShellConfig::from_json_file(path)?,
        None => ShellConfig::default(),
    };
    let logger = config.logger()?;

    let mut registry = ProjectionRegistry::new();
    if let Some(logger) = &logger {
        registry = registry.with_logger(logger.clone());
    }
    registry.bind::<CalorieInformation, _>(NiceTable::new())?;
    registry.seal()?;
    let registry = Arc::new(registry);

    let manual = ManualTree::new("raw_structure", raw_structure);
    let preview = project_with::<CalorieInformation>(&manual, &rows())?;
    if let Some(text) = TablePreview::with_default().preview(&preview) {
        print!("{text}");
    }

    let mut shell = SduiShell::new()
        .route("/api/data", records_route(rows))
        .route("/raw_structure_demo/_sdui", strategy_route(manual, rows))
        .route(
            "/nice_table_demo/_sdui",
            strategy_route(NiceTable::with_labels(), rows),
        )
        .route(
            "/decorator_demo/_sdui",
            projection_route(Arc::clone(&registry), rows),
        );
    if let Some(logger) = logger {
        shell = shell.with_logger(logger);
    }

    let listener = TcpListener::bind(&config.bind_addr)?;
    println!("serving {:?} on {}", shell.paths(), config.bind_addr);
    shell.serve(listener)
}
