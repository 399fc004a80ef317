use heck::ToLowerCamelCase;
use serde_json::{Map, Value};

/// Default key function: snake_case, kebab-case, spaced and PascalCase keys
/// become lowerCamelCase. A letter after a digit starts a new word, so
/// `sha256sum` becomes `sha256Sum`.
pub fn to_camel_case(key: &str) -> String {
    split_after_digits(key).to_lower_camel_case()
}

fn split_after_digits(key: &str) -> String {
    let mut split = String::with_capacity(key.len() + 2);
    let mut after_digit = false;
    for c in key.chars() {
        if after_digit && c.is_alphabetic() {
            split.push('_');
        }
        split.push(c);
        after_digit = c.is_ascii_digit();
    }
    split
}

/// Rebuilds `value` with every object key passed through `key_fn`,
/// descending into nested arrays and objects. Leaves are cloned unchanged.
pub fn transform_keys<F>(value: &Value, key_fn: &F) -> Value
where
    F: Fn(&str) -> String + ?Sized,
{
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| transform_keys(item, key_fn))
                .collect(),
        ),
        Value::Object(map) => {
            let mut renamed = Map::with_capacity(map.len());
            for (key, inner) in map {
                renamed.insert(key_fn(key), transform_keys(inner, key_fn));
            }
            Value::Object(renamed)
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => value.clone(),
    }
}

pub fn camelize(value: &Value) -> Value {
    transform_keys(value, &to_camel_case)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snake_case_keys_become_camel_case() {
        let result = camelize(&json!({"snake_case_key": 1}));
        assert_eq!(result, json!({"snakeCaseKey": 1}));
    }

    #[test]
    fn test_other_casings() {
        let result = camelize(&json!({
            "kebab-case-key": 1,
            "space separated": 2,
            "Title": 3,
            "imdbID": 4,
            "alreadyCamel": 5
        }));
        assert_eq!(
            result,
            json!({
                "kebabCaseKey": 1,
                "spaceSeparated": 2,
                "title": 3,
                "imdbId": 4,
                "alreadyCamel": 5
            })
        );
    }

    #[test]
    fn test_nested_objects_and_arrays() {
        let input = json!({
            "outer_key": {"inner_key": [{"deep_key": true}, 3, null]},
            "list_of": [{"a_b": 1}, {"c_d": 2}]
        });
        let expected = json!({
            "outerKey": {"innerKey": [{"deepKey": true}, 3, null]},
            "listOf": [{"aB": 1}, {"cD": 2}]
        });
        assert_eq!(camelize(&input), expected);
    }

    #[test]
    fn test_transform_is_idempotent() {
        let input = json!({"user_name": "x", "user_tags": [{"tag_id": 1}]});
        let once = camelize(&input);
        assert_eq!(camelize(&once), once);
    }

    #[test]
    fn test_leaves_pass_through() {
        assert_eq!(camelize(&Value::Null), Value::Null);
        assert_eq!(camelize(&json!("some_string")), json!("some_string"));
        assert_eq!(camelize(&json!(42)), json!(42));
    }

    #[test]
    fn test_digit_letter_boundary() {
        assert_eq!(to_camel_case("foo2bar"), "foo2Bar");
        assert_eq!(to_camel_case("sha256sum"), "sha256Sum");
        assert_eq!(to_camel_case("address_line_2"), "addressLine2");
        assert_eq!(to_camel_case("sha256Sum"), "sha256Sum");
    }

    #[test]
    fn test_custom_key_fn() {
        let upper = |k: &str| k.to_uppercase();
        let result = transform_keys(&json!({"a": {"b": 1}}), &upper);
        assert_eq!(result, json!({"A": {"B": 1}}));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = json!({"snake_key": [1, 2]});
        let _ = camelize(&input);
        assert_eq!(input, json!({"snake_key": [1, 2]}));
    }
}
