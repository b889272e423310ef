//! Turn one decoded JSON value into a fresh type node

use super::merge::merge_types;
use crate::config::InferConfig;
use crate::error::{Error, Result};
use crate::types::{ObjectDef, Position, ScalarKind, TypeDef};
use indexmap::IndexMap;
use serde_json::{Number, Value};

/// Describe exactly `value`, observed at `position`
pub fn process_value(value: &Value, position: &Position, config: &InferConfig) -> Result<TypeDef> {
    match value {
        Value::String(s) => Ok(TypeDef::string(position.clone(), s.as_str(), config.value_limit)),
        Value::Number(n) => {
            let kind = number_kind(n).ok_or_else(|| Error::UnsupportedValueKind {
                position: position.clone(),
                value: n.to_string(),
            })?;
            Ok(TypeDef::scalar(position.clone(), kind))
        }
        Value::Bool(_) => Ok(TypeDef::scalar(position.clone(), ScalarKind::Bool)),
        Value::Null => Ok(TypeDef::scalar(position.clone(), ScalarKind::None)),
        Value::Object(obj) => {
            let mut properties = IndexMap::with_capacity(obj.len());
            for (key, value) in obj {
                let child = process_value(value, &position.field(key), config)?;
                properties.insert(key.clone(), child);
            }
            Ok(TypeDef::Object(ObjectDef::new(position.clone(), properties)))
        }
        Value::Array(arr) => {
            let items_position = position.items();
            let mut items = TypeDef::Never;
            for item in arr {
                items = merge_types(items, process_value(item, &items_position, config)?)?;
            }
            Ok(TypeDef::array(position.clone(), items))
        }
    }
}

fn number_kind(n: &Number) -> Option<ScalarKind> {
    if n.is_i64() || n.is_u64() {
        Some(ScalarKind::Int)
    } else if n.as_f64().is_some() {
        Some(ScalarKind::Float)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeEnum;
    use serde_json::json;

    fn classify(value: Value) -> TypeDef {
        process_value(&value, &Position::root(), &InferConfig::default()).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(classify(json!(1)).type_enum(), TypeEnum::Int);
        assert_eq!(classify(json!(u64::MAX)).type_enum(), TypeEnum::Int);
        assert_eq!(classify(json!(1.5)).type_enum(), TypeEnum::Float);
        assert_eq!(classify(json!(true)).type_enum(), TypeEnum::Bool);
        assert_eq!(classify(json!(null)).type_enum(), TypeEnum::None);
    }

    #[test]
    fn test_string_histogram() {
        let TypeDef::String(string) = classify(json!("hello")) else {
            panic!("expected a string node");
        };
        assert_eq!(string.values.values().collect::<Vec<_>>(), vec!["hello"]);
        assert_eq!(string.values.count("hello"), Some(1));
    }

    #[test]
    fn test_object_children_positions() {
        let TypeDef::Object(object) = classify(json!({"user": {"name": "Alice"}, "age": 3})) else {
            panic!("expected an object node");
        };

        assert_eq!(object.properties.keys().collect::<Vec<_>>(), vec!["user", "age"]);
        assert!(object.not_required.is_empty());
        assert_eq!(object.merge_count, 0);

        let TypeDef::Object(user) = &object.properties["user"] else {
            panic!("expected a nested object node");
        };
        assert_eq!(user.position.as_str(), "$/user");
        assert_eq!(
            user.properties["name"].position().map(Position::as_str),
            Some("$/user/name")
        );
    }

    #[test]
    fn test_array_folds_elements() {
        let TypeDef::Array(array) = classify(json!([1, 2.5, 3])) else {
            panic!("expected an array node");
        };
        assert_eq!(array.items.type_enum(), TypeEnum::Float);
        assert_eq!(array.items.position().map(Position::as_str), Some("$/*"));
    }

    #[test]
    fn test_empty_array_is_never() {
        let TypeDef::Array(array) = classify(json!([])) else {
            panic!("expected an array node");
        };
        assert!(array.items.is_never());
    }

    #[test]
    fn test_mixed_array_becomes_union() {
        let TypeDef::Array(array) = classify(json!([1, "a", null, "b"])) else {
            panic!("expected an array node");
        };
        let TypeDef::OneOf(union) = *array.items else {
            panic!("expected a union of element types");
        };
        let kinds: Vec<_> = union.items.iter().map(TypeDef::type_enum).collect();
        assert_eq!(kinds, vec![TypeEnum::Int, TypeEnum::String, TypeEnum::None]);
    }
}
