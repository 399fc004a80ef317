use serde_json::Value;

use crate::core::classifier::Classify;
use crate::core::coercion::{coerce, is_compatible};
use crate::core::keys::camelize;
use crate::domain::model::{HydratedEntity, Template};
use crate::domain::ports::Hydratable;
use crate::utils::error::{HydrateError, Result};

/// Hydrates one raw record against `template`.
///
/// Raw keys are camelized first. The template is an allow-list: only its
/// fields appear in the output, in template order. Absent fields take their
/// default, and a coerced `null` is replaced by the default as well.
///
/// # Errors
///
/// `TypeMismatch` when a non-null raw value is incompatible with a field
/// default that is not `Undefined`; `Coercion` when a boolean field receives
/// a value that does not look boolean; `InvalidRecord` when `raw` is not an
/// object.
pub fn hydrate_record(raw: &Value, template: &Template) -> Result<HydratedEntity> {
    let camelized = camelize(raw);
    let record = match &camelized {
        Value::Object(map) => map,
        other => {
            return Err(HydrateError::InvalidRecord {
                found: other.real_type().to_string(),
            })
        }
    };

    let mut entity = HydratedEntity::with_capacity(template.len());
    for (field, default) in template.fields() {
        let raw_value = record.get(field);

        if let Some(value) = raw_value {
            if !default.is_undefined() && !value.is_null() && !is_compatible(default, value) {
                return Err(HydrateError::TypeMismatch {
                    field: field.to_string(),
                    value: value.to_string(),
                    default: default.to_json().to_string(),
                });
            }
        }

        let coerced = coerce(raw_value, default)?;
        let value = if coerced.is_null() {
            default.clone()
        } else {
            coerced
        };
        entity.push(field, value);
    }

    Ok(entity)
}

/// Hydrates one raw record into a typed entity using its own template.
pub fn hydrate_entity<T: Hydratable>(raw: &Value) -> Result<T> {
    let entity = hydrate_record(raw, &T::template())?;
    T::from_entity(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FieldValue;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn user_template() -> Template {
        Template::new()
            .field("id", 0)
            .field("active", false)
            .field("name", "")
    }

    #[test]
    fn test_coerces_every_field() {
        let raw = json!({"id": "42", "active": "true", "name": 7});
        let entity = hydrate_record(&raw, &user_template()).unwrap();

        assert_eq!(entity.get("id"), Some(&FieldValue::Number(42.0)));
        assert_eq!(entity.get("active"), Some(&FieldValue::Boolean(true)));
        assert_eq!(entity.get("name"), Some(&FieldValue::from("7")));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let template = Template::new().field("id", 0).field("name", "anonymous");
        let entity = hydrate_record(&json!({"id": 3}), &template).unwrap();

        assert_eq!(entity.get("name"), Some(&FieldValue::from("anonymous")));
    }

    #[test]
    fn test_null_raw_values() {
        let template = Template::new()
            .field("id", 9)
            .field("tags", FieldValue::Array(vec![json!("default")]))
            .field("extra", FieldValue::Null);
        let raw = json!({"id": null, "tags": null, "extra": null});
        let entity = hydrate_record(&raw, &template).unwrap();

        // Numeric conversion of null is 0, not a null result.
        assert_eq!(entity.get("id"), Some(&FieldValue::Number(0.0)));
        assert_eq!(
            entity.get("tags"),
            Some(&FieldValue::Array(vec![json!("default")]))
        );
        assert_eq!(entity.get("extra"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_template_is_an_allow_list() {
        let raw = json!({"id": 1, "unexpected_field": "dropped"});
        let entity = hydrate_record(&raw, &user_template()).unwrap();

        let names: Vec<&str> = entity.field_names().collect();
        assert_eq!(names, vec!["id", "active", "name"]);
    }

    #[test]
    fn test_snake_case_input_keys() {
        let template = Template::new()
            .field("firstName", "")
            .field("createdAt", FieldValue::from(Utc::now()));
        let raw = json!({"first_name": "Ada", "created_at": "2020-01-02T03:04:05+00:00"});
        let entity = hydrate_record(&raw, &template).unwrap();

        assert_eq!(entity.get("firstName"), Some(&FieldValue::from("Ada")));
        assert_eq!(
            entity.get("createdAt"),
            Some(&FieldValue::Date(Some(
                Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap()
            )))
        );
    }

    #[test]
    fn test_non_numeric_string_degrades_to_nan() {
        let template = Template::new().field("count", 0);
        // A non-numeric string is not compatible with a number default.
        let err = hydrate_record(&json!({"count": "abc"}), &template).unwrap_err();
        assert!(matches!(err, HydrateError::TypeMismatch { ref field, .. } if field == "count"));

        // With the check opted out, coercion degrades to NaN silently.
        let opted_out = Template::new().field("count", FieldValue::Undefined);
        let entity = hydrate_record(&json!({"count": "abc"}), &opted_out).unwrap();
        assert_eq!(entity.get("count"), Some(&FieldValue::from("abc")));
    }

    #[test]
    fn test_type_mismatch_names_field_value_and_default() {
        let template = Template::new().field("tags", FieldValue::Array(vec![]));
        let err = hydrate_record(&json!({"tags": "a,b"}), &template).unwrap_err();

        match err {
            HydrateError::TypeMismatch {
                field,
                value,
                default,
            } => {
                assert_eq!(field, "tags");
                assert_eq!(value, "\"a,b\"");
                assert_eq!(default, "[]");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_flag_maybe_is_rejected() {
        let template = Template::new().field("flag", false);
        let err = hydrate_record(&json!({"flag": "maybe"}), &template).unwrap_err();
        assert!(err.is_record_error());
    }

    #[test]
    fn test_non_object_record() {
        let err = hydrate_record(&json!([1, 2]), &user_template()).unwrap_err();
        assert!(matches!(err, HydrateError::InvalidRecord { ref found } if found == "array"));
    }

    #[test]
    fn test_input_is_left_untouched() {
        let raw = json!({"user_id": "5"});
        let template = Template::new().field("userId", 0);
        let _ = hydrate_record(&raw, &template).unwrap();
        assert_eq!(raw, json!({"user_id": "5"}));
    }
}
