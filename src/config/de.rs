//! Deserialization helpers for the shorthand forms `conda-forge.yml` allows

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::choices::PkgFormat;

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

/// List where a lone value stands for a one-element list
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

/// Version written as text or as a bare integer (`min_py_ver: 39`)
///
/// Floats are refused: `3.10` would silently read as `3.1`.
pub fn version_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) if number.is_u64() || number.is_i64() => Ok(number.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a version string or an integer, got {other}; quote the version"
        ))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPkgFormat {
    Named(PkgFormat),
    Number(u64),
}

/// Package format, also written as the bare numbers `1` and `2`; `null` is kept
pub fn pkg_format<'de, D>(deserializer: D) -> Result<Option<PkgFormat>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawPkgFormat>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawPkgFormat::Named(format)) => Ok(Some(format)),
        Some(RawPkgFormat::Number(1)) => Ok(Some(PkgFormat::V1)),
        Some(RawPkgFormat::Number(2)) => Ok(Some(PkgFormat::V2)),
        Some(RawPkgFormat::Number(other)) => {
            Err(D::Error::custom(format!("unknown package format {other}")))
        }
    }
}

/// Settings whose scalar values are handed on as strings
pub fn scalar_strings<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Map::<String, Value>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(_) => Ok((key, value)),
            Value::Bool(_) | Value::Number(_) => {
                let text = value.to_string();
                Ok((key, Value::String(text)))
            }
            other => Err(D::Error::custom(format!("{key}: expected a scalar, got {other}"))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Versions {
        #[serde(deserialize_with = "version_string")]
        version: String,
    }

    #[derive(Debug, Deserialize)]
    struct Formats {
        #[serde(deserialize_with = "pkg_format")]
        format: Option<PkgFormat>,
    }

    #[derive(Debug, Deserialize)]
    struct Lists {
        #[serde(deserialize_with = "one_or_many")]
        items: Vec<String>,
    }

    #[test]
    fn test_version_accepts_text_and_integers() {
        let text: Versions = serde_json::from_value(json!({"version": "3.10"})).unwrap();
        assert_eq!(text.version, "3.10");

        let number: Versions = serde_json::from_value(json!({"version": 39})).unwrap();
        assert_eq!(number.version, "39");
    }

    #[test]
    fn test_version_refuses_floats() {
        for float in [json!(3.10), json!(4.0)] {
            let err = serde_json::from_value::<Versions>(json!({"version": float})).unwrap_err();
            assert!(err.to_string().contains("quote the version"), "{err}");
        }
    }

    #[test]
    fn test_pkg_format_numbers_and_null() {
        let numbered: Formats = serde_json::from_value(json!({"format": 1})).unwrap();
        assert_eq!(numbered.format, Some(PkgFormat::V1));

        let named: Formats = serde_json::from_value(json!({"format": "tar"})).unwrap();
        assert_eq!(named.format, Some(PkgFormat::Tar));

        let null: Formats = serde_json::from_value(json!({"format": null})).unwrap();
        assert_eq!(null.format, None);

        assert!(serde_json::from_value::<Formats>(json!({"format": 3})).is_err());
    }

    #[test]
    fn test_lone_value_becomes_list() {
        let one: Lists = serde_json::from_value(json!({"items": "a"})).unwrap();
        assert_eq!(one.items, vec!["a"]);

        let many: Lists = serde_json::from_value(json!({"items": ["a", "b"]})).unwrap();
        assert_eq!(many.items, vec!["a", "b"]);
    }
}
