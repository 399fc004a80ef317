use crate::domain::model::{FieldValue, RealType};
use serde_json::Value;

/// Anything hydration can classify into a [`RealType`].
pub trait Classify {
    fn real_type(&self) -> RealType;
}

impl Classify for Value {
    fn real_type(&self) -> RealType {
        match self {
            Value::Array(_) => RealType::Array,
            Value::Null => RealType::Null,
            Value::Object(_) => RealType::Object,
            Value::String(_) => RealType::String,
            Value::Number(_) => RealType::Number,
            Value::Bool(_) => RealType::Boolean,
        }
    }
}

impl Classify for FieldValue {
    fn real_type(&self) -> RealType {
        // Arrays and dates are told apart from generic objects first.
        match self {
            FieldValue::Array(_) => RealType::Array,
            FieldValue::Date(_) => RealType::Date,
            FieldValue::Null => RealType::Null,
            FieldValue::Object(_) => RealType::Object,
            FieldValue::String(_) => RealType::String,
            FieldValue::Number(_) => RealType::Number,
            FieldValue::Boolean(_) => RealType::Boolean,
            FieldValue::Undefined => RealType::Undefined,
        }
    }
}

impl<T: Classify + ?Sized> Classify for &T {
    fn real_type(&self) -> RealType {
        (**self).real_type()
    }
}

impl<T: Classify> Classify for Option<T> {
    fn real_type(&self) -> RealType {
        match self {
            Some(value) => value.real_type(),
            None => RealType::Undefined,
        }
    }
}

pub fn classify<T: Classify + ?Sized>(value: &T) -> RealType {
    value.real_type()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_classify_json_values() {
        assert_eq!(classify(&json!([1, 2])), RealType::Array);
        assert_eq!(classify(&json!(null)), RealType::Null);
        assert_eq!(classify(&json!({"a": 1})), RealType::Object);
        assert_eq!(classify(&json!("x")), RealType::String);
        assert_eq!(classify(&json!(5)), RealType::Number);
        assert_eq!(classify(&json!(true)), RealType::Boolean);
    }

    #[test]
    fn test_classify_field_values() {
        assert_eq!(classify(&FieldValue::from(Utc::now())), RealType::Date);
        assert_eq!(classify(&FieldValue::Date(None)), RealType::Date);
        assert_eq!(classify(&FieldValue::Undefined), RealType::Undefined);
        assert_eq!(classify(&FieldValue::Array(vec![])), RealType::Array);
        assert_eq!(classify(&FieldValue::Number(f64::NAN)), RealType::Number);
    }

    #[test]
    fn test_absent_value_is_undefined() {
        let absent: Option<&Value> = None;
        assert_eq!(classify(&absent), RealType::Undefined);
        assert_eq!(classify(&Some(json!("x"))), RealType::String);
    }
}
