//! Deserializers for query-string parameters.
//!
//! Query strings arrive as text, and `#[serde(flatten)]` hides the target type
//! from `serde_urlencoded`, so numeric and id filters parse their own strings.
//! An empty value (`?rating=`) is treated as absent.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Parses an optional string with `FromStr` (numbers, typed ids).
pub fn deserialize_optional_parse<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse::<T>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Splits `a,b,c` into trimmed, non-empty items.
pub fn deserialize_comma_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt
        .map(|s| {
            s.split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|items| !items.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[derive(Deserialize)]
    struct Filters {
        #[serde(default, deserialize_with = "deserialize_optional_parse")]
        user: Option<Uuid>,
        #[serde(default, deserialize_with = "deserialize_optional_parse")]
        rating: Option<i32>,
        #[serde(default, deserialize_with = "deserialize_optional_parse")]
        low_price: Option<f64>,
        #[serde(default, deserialize_with = "deserialize_comma_list")]
        tags: Option<Vec<String>>,
    }

    #[test]
    fn test_parses_present_values() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{"user":"{id}","rating":"4","low_price":"9.5","tags":"rust, web,,sql"}}"#
        );
        let filters: Filters = serde_json::from_str(&json).unwrap();
        assert_eq!(filters.user, Some(id));
        assert_eq!(filters.rating, Some(4));
        assert_eq!(filters.low_price, Some(9.5));
        assert_eq!(
            filters.tags,
            Some(vec!["rust".to_string(), "web".to_string(), "sql".to_string()])
        );
    }

    #[test]
    fn test_empty_values_are_absent() {
        let json = r#"{"user":"","rating":"","low_price":" ","tags":" , "}"#;
        let filters: Filters = serde_json::from_str(json).unwrap();
        assert!(filters.user.is_none());
        assert!(filters.rating.is_none());
        assert!(filters.low_price.is_none());
        assert!(filters.tags.is_none());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Filters>(r#"{"rating":"five"}"#).is_err());
        assert!(serde_json::from_str::<Filters>(r#"{"user":"not-a-uuid"}"#).is_err());
    }
}
