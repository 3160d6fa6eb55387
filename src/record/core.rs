use std::any::type_name;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{ProjectionError, Result};

/// Declared kind of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Float)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field value. `Null` is valid for every declared kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl FieldValue {
    /// Kind carried by the value, `None` for `Null`.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::Text(_) => Some(FieldKind::Text),
            FieldValue::Integer(_) => Some(FieldKind::Integer),
            FieldValue::Float(_) => Some(FieldKind::Float),
            FieldValue::Boolean(_) => Some(FieldKind::Boolean),
            FieldValue::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Text shown in a table cell.
    pub fn display_text(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Integer(value) => value.to_string(),
            FieldValue::Float(value) => format_float(*value),
            FieldValue::Boolean(value) => value.to_string(),
            FieldValue::Null => String::new(),
        }
    }

    /// Raw JSON value. Non-finite floats have no JSON form and become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::Integer(value) => Value::Number(Number::from(*value)),
            FieldValue::Float(value) => Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Boolean(value) => Value::Bool(*value),
            FieldValue::Null => Value::Null,
        }
    }
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        // f64's Display is the shortest round-trip form and drops a zero fraction.
        value.to_string()
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Maps a Rust field type onto a declared kind and its runtime value.
pub trait FieldType {
    const KIND: FieldKind;

    fn to_value(&self) -> FieldValue;
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::Text;

    fn to_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
}

impl FieldType for &'static str {
    const KIND: FieldKind = FieldKind::Text;

    fn to_value(&self) -> FieldValue {
        FieldValue::Text((*self).to_string())
    }
}

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn to_value(&self) -> FieldValue {
        FieldValue::Boolean(*self)
    }
}

macro_rules! integer_field_type {
    ($($ty:ty),*) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = FieldKind::Integer;

                fn to_value(&self) -> FieldValue {
                    FieldValue::Integer(i64::from(*self))
                }
            }
        )*
    };
}

integer_field_type!(i8, i16, i32, i64, u8, u16, u32);

impl FieldType for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl FieldType for f32 {
    const KIND: FieldKind = FieldKind::Float;

    /// Widens through the shortest decimal of the `f32`, so `4.3_f32` stays
    /// `4.3` rather than `4.300000190734863`.
    fn to_value(&self) -> FieldValue {
        let widened = self
            .to_string()
            .parse::<f64>()
            .unwrap_or(f64::from(*self));
        FieldValue::Float(widened)
    }
}

impl<T: FieldType> FieldType for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn to_value(&self) -> FieldValue {
        self.as_ref()
            .map(FieldType::to_value)
            .unwrap_or(FieldValue::Null)
    }
}

/// Named value as stored on a record instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Declared field of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Human heading, falling back to the field name.
    pub fn heading(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Ordered field descriptor of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|def| def.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|def| def.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|def| def.name == name)
    }

    /// Reject schemas a table cannot be built from.
    pub fn validate(&self, type_name: &'static str) -> Result<()> {
        if self.fields.is_empty() {
            return Err(ProjectionError::Schema {
                type_name,
                reason: "schema has no fields".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for def in &self.fields {
            if !seen.insert(def.name.as_str()) {
                return Err(ProjectionError::Schema {
                    type_name,
                    reason: format!("field `{}` declared twice", def.name),
                });
            }
        }
        Ok(())
    }
}

/// A displayable record type with a statically known schema.
pub trait Record: 'static {
    /// Type-level schema; must not depend on any instance.
    fn schema() -> Schema;

    /// Instance fields in storage order.
    fn fields(&self) -> Vec<Field>;
}

/// Schema of `R`, rejecting empty or ambiguous declarations.
pub fn describe<R: Record>() -> Result<Schema> {
    let schema = R::schema();
    schema.validate(type_name::<R>())?;
    Ok(schema)
}

/// Values of `record` in schema order.
pub fn values<R: Record>(schema: &Schema, record: &R) -> Result<Vec<FieldValue>> {
    conform(schema, record, 0)
}

/// Checks one record against `schema` and reorders its values.
///
/// Missing fields read as `Null`. Unknown fields, repeated fields and values
/// of the wrong kind are a mismatch reported against `index`.
pub fn conform<R: Record>(schema: &Schema, record: &R, index: usize) -> Result<Vec<FieldValue>> {
    let mismatch = |detail: String| ProjectionError::SchemaMismatch {
        type_name: type_name::<R>(),
        index,
        detail,
    };

    let mut slots: Vec<Option<FieldValue>> = vec![None; schema.len()];
    for field in record.fields() {
        let position = schema
            .position(&field.name)
            .ok_or_else(|| mismatch(format!("unknown field `{}`", field.name)))?;

        if slots[position].is_some() {
            return Err(mismatch(format!("field `{}` given twice", field.name)));
        }

        let declared = schema.fields[position].kind;
        if let Some(actual) = field.value.kind() {
            if actual != declared {
                return Err(mismatch(format!(
                    "field `{}` declared {} but holds {}",
                    field.name, declared, actual
                )));
            }
        }

        slots[position] = Some(field.value);
    }

    Ok(slots
        .into_iter()
        .map(|slot| slot.unwrap_or(FieldValue::Null))
        .collect())
}

/// JSON object of `record` with keys in schema order.
pub fn record_json<R: Record>(schema: &Schema, record: &R) -> Result<Value> {
    let values = values(schema, record)?;
    let mut object = Map::new();
    for (def, value) in schema.fields().iter().zip(values) {
        object.insert(def.name.clone(), value.to_json());
    }
    Ok(Value::Object(object))
}
