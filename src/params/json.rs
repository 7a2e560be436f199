//! JSON body encoding.

use serde_json::{Map, Value};

use super::Params;
use crate::error::AppwriteError;

/// Encode parameters as a JSON object, skipping entries without a value.
pub fn to_json_object(params: &Params) -> Result<Map<String, Value>, AppwriteError> {
    let mut object = Map::new();
    for (name, value) in params.iter() {
        object.insert(name.to_string(), value.to_json_value()?);
    }
    Ok(object)
}

/// Encode parameters as JSON body bytes.
pub fn encode_json(params: &Params) -> Result<Vec<u8>, AppwriteError> {
    Ok(serde_json::to_vec(&to_json_object(params)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct Prefs {
        theme: &'static str,
        beta: bool,
    }

    #[test]
    fn encodes_each_value_kind() {
        let mut nested = Map::new();
        nested.insert("k".into(), json!([1, 2]));
        let params = Params::new()
            .with("name", "Ada")
            .with("age", 36)
            .with("ratio", 0.5)
            .with("active", true)
            .with("tags", vec!["a", "b"])
            .with("meta", nested)
            .with("prefs", ParamValue::encodable(Prefs { theme: "dark", beta: false }));

        let body: Value = serde_json::from_slice(&encode_json(&params).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "Ada",
                "age": 36,
                "ratio": 0.5,
                "active": true,
                "tags": ["a", "b"],
                "meta": {"k": [1, 2]},
                "prefs": {"theme": "dark", "beta": false}
            })
        );
    }

    #[test]
    fn none_values_are_excluded() {
        let params = Params::new()
            .with("kept", "yes")
            .with_opt::<i64>("dropped", None);
        let object = to_json_object(&params).unwrap();
        assert_eq!(object.len(), 1);
        assert!(!object.contains_key("dropped"));
    }

    #[test]
    fn empty_params_encode_to_empty_object() {
        assert_eq!(encode_json(&Params::new()).unwrap(), b"{}");
    }

    #[test]
    fn key_order_follows_insertion_order() {
        let params = Params::new().with("z", 1).with("a", 2);
        assert_eq!(encode_json(&params).unwrap(), br#"{"z":1,"a":2}"#);
    }
}
