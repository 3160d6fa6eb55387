//! Shared records for unit tests.

use crate::record::{Field, FieldDef, FieldKind, Record, Schema};

crate::record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Dessert {
        pub name: String,
        pub calories: i64,
        pub fat: f64,
        pub carbs: i64,
        pub protein: f64,
    }
}

impl Dessert {
    pub fn new(name: &str, calories: i64, fat: f64, carbs: i64, protein: f64) -> Self {
        Self {
            name: name.to_string(),
            calories,
            fat,
            carbs,
            protein,
        }
    }
}

pub fn desserts() -> Vec<Dessert> {
    vec![
        Dessert::new("Frozen yoghurt", 159, 6.0, 24, 4.0),
        Dessert::new("Ice cream sandwich", 237, 9.0, 37, 4.3),
        Dessert::new("Eclair", 262, 16.0, 24, 6.0),
        Dessert::new("Cupcake", 305, 3.7, 67, 4.3),
        Dessert::new("Gingerbread", 356, 16.0, 49, 3.9),
    ]
}

/// Record type that declares no fields.
#[derive(Debug, Clone)]
pub struct Opaque;

impl Record for Opaque {
    fn schema() -> Schema {
        Schema::default()
    }

    fn fields(&self) -> Vec<Field> {
        Vec::new()
    }
}

/// Loosely built record whose instances may drift from the declared schema.
#[derive(Debug, Clone)]
pub struct Loose(pub Vec<Field>);

impl Record for Loose {
    fn schema() -> Schema {
        Schema::new(vec![
            FieldDef::new("title", FieldKind::Text),
            FieldDef::new("done", FieldKind::Boolean),
        ])
    }

    fn fields(&self) -> Vec<Field> {
        self.0.clone()
    }
}
