//! 查询串序列化：把类型化参数结构展开为 key/value 对
//!
//! 缺省字段（None）与空字符串一律省略，不以 null / "" 占位发送。

use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;

/// 展开后的查询参数
pub type QueryPairs = Vec<(String, String)>;

/// 将参数结构序列化为查询对；参数结构应为扁平对象（数组展开为重复 key）
pub fn to_query<T: Serialize + ?Sized>(params: &T) -> Result<QueryPairs, ApiError> {
    let value = serde_json::to_value(params)
        .map_err(|e| ApiError::invalid_params(format!("Unserializable query parameters: {}", e)))?;

    let map = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => {
            return Err(ApiError::invalid_params(format!(
                "Query parameters must be an object, got {}",
                other
            )))
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(s) = scalar(&key, item)? {
                        pairs.push((key.clone(), s));
                    }
                }
            }
            other => {
                if let Some(s) = scalar(&key, other)? {
                    pairs.push((key, s));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar(key: &str, value: Value) -> Result<Option<String>, ApiError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err(ApiError::invalid_params(format!(
            "Nested value for query parameter '{}'",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Params {
        #[serde(skip_serializing_if = "Option::is_none")]
        page: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        search: Option<String>,
        status: Option<&'static str>,
        tags: Vec<&'static str>,
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let params = Params {
            page: None,
            search: Some(String::new()),
            status: None,
            tags: vec![],
        };
        assert!(to_query(&params).unwrap().is_empty());
    }

    #[test]
    fn test_present_fields_are_stringified() {
        let params = Params {
            page: Some(2),
            search: Some("forge".into()),
            status: Some("active"),
            tags: vec!["a", "b"],
        };
        let mut pairs = to_query(&params).unwrap();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "2".to_string()),
                ("search".to_string(), "forge".to_string()),
                ("status".to_string(), "active".to_string()),
                ("tags".to_string(), "a".to_string()),
                ("tags".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_unit_and_nested() {
        assert!(to_query(&()).unwrap().is_empty());
        let nested = serde_json::json!({ "filter": { "a": 1 } });
        assert!(to_query(&nested).is_err());
    }
}
