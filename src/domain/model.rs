use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::utils::error::{HydrateError, Result};

/// Classification tag of a value: the closed set of kinds hydration can tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RealType {
    Array,
    Date,
    Null,
    Object,
    String,
    Number,
    Boolean,
    Undefined,
}

impl RealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RealType::Array => "array",
            RealType::Date => "date",
            RealType::Null => "null",
            RealType::Object => "object",
            RealType::String => "string",
            RealType::Number => "number",
            RealType::Boolean => "boolean",
            RealType::Undefined => "undefined",
        }
    }
}

impl fmt::Display for RealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed field value: template defaults and hydrated output share this type.
///
/// `Number(f64::NAN)` is the invalid-number sentinel and `Date(None)` the
/// invalid-date sentinel; both serialize as `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Date(Option<DateTime<Utc>>),
    Array(Vec<Value>),
    Object(Map<String, Value>),
}

impl FieldValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, FieldValue::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Undefined | FieldValue::Null => Value::Null,
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Number(n) => number_to_json(*n),
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Date(Some(dt)) => {
                Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            FieldValue::Date(None) => Value::Null,
            FieldValue::Array(items) => Value::Array(items.clone()),
            FieldValue::Object(map) => Value::Object(map.clone()),
        }
    }

    /// Human-readable form used in error messages and CSV cells.
    pub fn to_display_string(&self) -> String {
        match self {
            FieldValue::Undefined => "undefined".to_string(),
            FieldValue::String(s) => s.clone(),
            other => other.to_json().to_string(),
        }
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) => FieldValue::Array(items),
            Value::Object(map) => FieldValue::Object(map),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Date(Some(value))
    }
}

impl From<Vec<Value>> for FieldValue {
    fn from(value: Vec<Value>) -> Self {
        FieldValue::Array(value)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Ordered field set with one default per field. The default's real type is
/// the field's expected kind; `FieldValue::Undefined` opts the field out of
/// compatibility checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    fields: Vec<(String, FieldValue)>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing the default of an already declared one.
    pub fn field(mut self, name: impl Into<String>, default: impl Into<FieldValue>) -> Self {
        self.insert(name, default);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, default: impl Into<FieldValue>) {
        let name = name.into();
        let default = default.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = default,
            None => self.fields.push((name, default)),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn default_of(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Hydration output: exactly the template's fields, in template order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HydratedEntity {
    fields: Vec<(String, FieldValue)>,
}

impl HydratedEntity {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &str, value: FieldValue) {
        self.fields.push((name.to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn take(&mut self, name: &str) -> Result<FieldValue> {
        let index = self
            .fields
            .iter()
            .position(|(k, _)| k == name)
            .ok_or_else(|| HydrateError::InvalidEntity {
                field: name.to_string(),
                message: "field is not part of the template".to_string(),
            })?;
        Ok(self.fields.remove(index).1)
    }

    pub fn take_string(&mut self, name: &str) -> Result<String> {
        match self.take(name)? {
            FieldValue::String(s) => Ok(s),
            other => Err(unexpected(name, "string", &other)),
        }
    }

    pub fn take_number(&mut self, name: &str) -> Result<f64> {
        match self.take(name)? {
            FieldValue::Number(n) => Ok(n),
            other => Err(unexpected(name, "number", &other)),
        }
    }

    pub fn take_bool(&mut self, name: &str) -> Result<bool> {
        match self.take(name)? {
            FieldValue::Boolean(b) => Ok(b),
            other => Err(unexpected(name, "boolean", &other)),
        }
    }

    pub fn take_date(&mut self, name: &str) -> Result<Option<DateTime<Utc>>> {
        match self.take(name)? {
            FieldValue::Date(dt) => Ok(dt),
            other => Err(unexpected(name, "date", &other)),
        }
    }

    pub fn take_array(&mut self, name: &str) -> Result<Vec<Value>> {
        match self.take(name)? {
            FieldValue::Array(items) => Ok(items),
            other => Err(unexpected(name, "array", &other)),
        }
    }

    pub fn take_object(&mut self, name: &str) -> Result<Map<String, Value>> {
        match self.take(name)? {
            FieldValue::Object(map) => Ok(map),
            other => Err(unexpected(name, "object", &other)),
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

fn unexpected(field: &str, expected: &str, found: &FieldValue) -> HydrateError {
    HydrateError::InvalidEntity {
        field: field.to_string(),
        message: format!("expected {}, found {}", expected, found.to_display_string()),
    }
}

impl Serialize for HydratedEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Well-known field holding the element sequence of a collection wrapper.
pub const COLLECTION_DATA_FIELD: &str = "data";

/// Collection wrapper: a data sequence plus sibling metadata fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection<T> {
    pub data: Vec<T>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> Collection<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_field_order_and_replacement() {
        let template = Template::new()
            .field("id", 0)
            .field("name", "")
            .field("id", 5);

        let names: Vec<&str> = template.fields().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["id", "name"]);
        assert_eq!(template.default_of("id"), Some(&FieldValue::Number(5.0)));
    }

    #[test]
    fn test_field_value_sentinels_serialize_as_null() {
        assert_eq!(FieldValue::Number(f64::NAN).to_json(), Value::Null);
        assert_eq!(FieldValue::Date(None).to_json(), Value::Null);
        assert_eq!(FieldValue::Number(42.0).to_json(), json!(42));
        assert_eq!(FieldValue::Number(1.5).to_json(), json!(1.5));
    }

    #[test]
    fn test_hydrated_entity_take_accessors() {
        let mut entity = HydratedEntity::default();
        entity.push("id", FieldValue::Number(7.0));
        entity.push("name", FieldValue::String("x".to_string()));

        assert_eq!(entity.take_number("id").unwrap(), 7.0);
        let err = entity.take_bool("name").unwrap_err();
        assert!(matches!(err, HydrateError::InvalidEntity { .. }));
        assert!(entity.take("missing").is_err());
    }

    #[test]
    fn test_collection_serializes_flat() {
        let collection = Collection::new(vec![1, 2]).with_extra("totalCount", json!(2));
        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json, json!({"data": [1, 2], "totalCount": 2}));
    }
}
