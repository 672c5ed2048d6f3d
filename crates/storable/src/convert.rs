//! Conversion of decoded values to `serde_json::Value`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{Map, Number, Value as JsonValue};

use crate::values::StorableValue;

/// Renders a decoded value as JSON.
///
/// Byte strings become base64 text; blessed values and backreferences
/// become tagged objects (`__class__`/`__data__` and `__backref__`), so the
/// rendition stays reversible by inspection. Non-finite doubles map to
/// `null`, which is all JSON numbers can carry.
pub fn to_json(value: &StorableValue) -> JsonValue {
    match value {
        StorableValue::Undef => JsonValue::Null,
        StorableValue::Bool(b) => JsonValue::Bool(*b),
        StorableValue::Integer(i) => JsonValue::Number(Number::from(*i)),
        StorableValue::Double(d) => Number::from_f64(*d)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        StorableValue::Str(s) => JsonValue::String(s.clone()),
        StorableValue::Bytes(b) => JsonValue::String(BASE64.encode(b)),
        StorableValue::Array(items) => JsonValue::Array(items.iter().map(to_json).collect()),
        StorableValue::Hash(map) => {
            let mut obj = Map::new();
            for (key, item) in map {
                obj.insert(key.clone(), to_json(item));
            }
            JsonValue::Object(obj)
        }
        StorableValue::Blessed(blessed) => {
            let mut obj = Map::new();
            obj.insert(
                "__class__".to_owned(),
                JsonValue::String(blessed.class.clone()),
            );
            obj.insert("__data__".to_owned(), to_json(&blessed.value));
            JsonValue::Object(obj)
        }
        StorableValue::Backref(index) => {
            let mut obj = Map::new();
            obj.insert(
                "__backref__".to_owned(),
                JsonValue::Number(Number::from(*index)),
            );
            JsonValue::Object(obj)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Blessed;
    use indexmap::IndexMap;
    use serde_json::json;

    #[test]
    fn scalars() {
        assert_eq!(to_json(&StorableValue::Undef), json!(null));
        assert_eq!(to_json(&StorableValue::Bool(true)), json!(true));
        assert_eq!(to_json(&StorableValue::Integer(-7)), json!(-7));
        assert_eq!(to_json(&StorableValue::Double(1.5)), json!(1.5));
        assert_eq!(to_json(&StorableValue::Double(f64::NAN)), json!(null));
        assert_eq!(to_json(&StorableValue::Str("cat".into())), json!("cat"));
        assert_eq!(
            to_json(&StorableValue::Bytes(vec![0xde, 0xad])),
            json!("3q0=")
        );
    }

    #[test]
    fn containers_preserve_order() {
        let mut map = IndexMap::new();
        map.insert("b".to_owned(), StorableValue::Integer(2));
        map.insert("a".to_owned(), StorableValue::Integer(1));
        let json = to_json(&StorableValue::Hash(map));
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn blessed_and_backref_are_tagged() {
        let blessed = StorableValue::Blessed(Box::new(Blessed::new(
            "My::Class",
            StorableValue::Array(vec![1.into()]),
        )));
        assert_eq!(
            to_json(&blessed),
            json!({"__class__": "My::Class", "__data__": [1]})
        );
        assert_eq!(
            to_json(&StorableValue::Backref(3)),
            json!({"__backref__": 3})
        );
    }
}
