use sdui_projection::{
    ComponentNode, ComponentTree, DerivedTable, Field, FieldDef, FieldKind, NiceTable,
    ProjectionError, ProjectionRegistry, Record, Schema,
};
use serde_json::json;

sdui_projection::record! {
    #[derive(Debug, Clone)]
    struct Dessert {
        name: String,
        calories: i64,
        fat: f64,
        carbs: i64,
        protein: f64,
    }
}

sdui_projection::record! {
    #[derive(Debug, Clone)]
    struct Shorthand {
        name: String,
        calories: i64,
        fat: f64,
        carbs: i64,
        protein: f64,
    }
}

struct Empty;

impl Record for Empty {
    fn schema() -> Schema {
        Schema::new(Vec::new())
    }

    fn fields(&self) -> Vec<Field> {
        Vec::new()
    }
}

/// Stores fields newest-first; the schema still dictates column order.
struct Stacked {
    name: String,
    score: Option<f64>,
}

impl Record for Stacked {
    fn schema() -> Schema {
        Schema::new(vec![
            FieldDef::new("name", FieldKind::Text),
            FieldDef::new("score", FieldKind::Float),
        ])
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("score", self.score),
            Field::new("name", self.name.as_str()),
        ]
    }
}

const ROWS: [(&str, i64, f64, i64, f64); 5] = [
    ("Frozen yoghurt", 159, 6.0, 24, 4.0),
    ("Ice cream sandwich", 237, 9.0, 37, 4.3),
    ("Eclair", 262, 16.0, 24, 6.0),
    ("Cupcake", 305, 3.7, 67, 4.3),
    ("Gingerbread", 356, 16.0, 49, 3.9),
];

fn desserts() -> Vec<Dessert> {
    ROWS.iter()
        .map(|&(name, calories, fat, carbs, protein)| Dessert {
            name: name.to_string(),
            calories,
            fat,
            carbs,
            protein,
        })
        .collect()
}

fn shorthand() -> Vec<Shorthand> {
    desserts()
        .into_iter()
        .map(|d| Shorthand {
            name: d.name,
            calories: d.calories,
            fat: d.fat,
            carbs: d.carbs,
            protein: d.protein,
        })
        .collect()
}

fn registry() -> ProjectionRegistry {
    let registry = ProjectionRegistry::new();
    registry.bind::<Dessert, _>(DerivedTable::new()).unwrap();
    registry.bind::<Shorthand, _>(NiceTable::new()).unwrap();
    registry.bind::<Stacked, _>(DerivedTable::new()).unwrap();
    registry
}

fn texts(row: &ComponentNode) -> Vec<String> {
    row.child_nodes()
        .iter()
        .map(|cell| cell.text_content().unwrap())
        .collect()
}

fn head_and_body(tree: &ComponentTree) -> (Vec<String>, Vec<Vec<String>>) {
    let head = texts(&tree.find("TableHead").unwrap().child_nodes()[0]);
    let body = tree
        .find("TableBody")
        .unwrap()
        .child_nodes()
        .iter()
        .map(texts)
        .collect();
    (head, body)
}

#[test]
fn derived_table_for_five_desserts() {
    let tree = registry().project(&desserts()).unwrap();
    let (head, body) = head_and_body(&tree);

    assert_eq!(head, vec!["name", "calories", "fat", "carbs", "protein"]);
    assert_eq!(
        body,
        vec![
            vec!["Frozen yoghurt", "159", "6", "24", "4"],
            vec!["Ice cream sandwich", "237", "9", "37", "4.3"],
            vec!["Eclair", "262", "16", "24", "6"],
            vec!["Cupcake", "305", "3.7", "67", "4.3"],
            vec!["Gingerbread", "356", "16", "49", "3.9"],
        ]
    );
}

#[test]
fn generic_table_nesting_is_fixed() {
    let value = registry().project(&desserts()[..1]).unwrap().to_value().unwrap();
    assert_eq!(value[0]["component"], "TableContainer");
    let table = &value[0]["children"][0];
    assert_eq!(table["component"], "Table");
    assert_eq!(table["children"][0]["component"], "TableHead");
    assert_eq!(table["children"][1]["component"], "TableBody");
    assert_eq!(table["children"][1]["children"][0]["component"], "TableRow");
    assert_eq!(
        table["children"][1]["children"][0]["children"][0]["component"],
        "TableCell"
    );
}

#[test]
fn shorthand_table_for_five_desserts() {
    let value = registry().project(&shorthand()).unwrap().to_value().unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert_eq!(value[0]["component"], "NiceTable");
    assert_eq!(
        value[0]["props"]["headings"],
        json!(["name", "calories", "fat", "carbs", "protein"])
    );
    let rows = value[0]["props"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(
        rows[2],
        json!({"name": "Eclair", "calories": 262, "fat": 16.0, "carbs": 24, "protein": 6.0})
    );
    assert!(value[0].get("children").is_none());
}

#[test]
fn storage_order_does_not_leak_into_columns() {
    let records = vec![
        Stacked {
            name: "alpha".into(),
            score: Some(1.5),
        },
        Stacked {
            name: "beta".into(),
            score: None,
        },
    ];
    let (head, body) = head_and_body(&registry().project(&records).unwrap());
    assert_eq!(head, vec!["name", "score"]);
    assert_eq!(body, vec![vec!["alpha", "1.5"], vec!["beta", ""]]);
}

#[test]
fn empty_collection_keeps_header_and_body() {
    let tree = registry().project::<Dessert>(&[]).unwrap();
    let (head, body) = head_and_body(&tree);
    assert_eq!(head.len(), 5);
    assert!(body.is_empty());
}

#[test]
fn repeated_projection_is_identical() {
    let registry = registry();
    let first = registry.project(&desserts()).unwrap();
    let second = registry.project(&desserts()).unwrap();
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn empty_schema_is_rejected() {
    let registry = registry();
    registry.bind::<Empty, _>(DerivedTable::new()).unwrap();
    let err = registry.project(&[Empty]).unwrap_err();
    assert!(matches!(err, ProjectionError::Schema { .. }));
    assert_eq!(registry.metrics().projections, 0);
}

#[test]
fn second_bind_is_rejected() {
    let registry = registry();
    let err = registry.bind::<Dessert, _>(NiceTable::new()).unwrap_err();
    assert!(matches!(err, ProjectionError::Rebind { .. }));
    let tree = registry.project(&desserts()).unwrap();
    assert!(tree.find("TableContainer").is_some());
    assert!(tree.find("NiceTable").is_none());
}

sdui_projection::record! {
    struct Snack {
        name: String,
        protein: f32,
    }
}

#[test]
fn f32_fields_render_their_declared_precision() {
    let rows = [Snack {
        name: "Cupcake".into(),
        protein: 4.3,
    }];

    let tree = sdui_projection::project_with::<Snack>(&DerivedTable::new(), &rows).unwrap();
    let (_, body) = head_and_body(&tree);
    assert_eq!(body, vec![vec!["Cupcake", "4.3"]]);

    let value = sdui_projection::project_with::<Snack>(&NiceTable::new(), &rows)
        .unwrap()
        .to_value()
        .unwrap();
    assert_eq!(
        value[0]["props"]["rows"],
        json!([{"name": "Cupcake", "protein": 4.3}])
    );
}
