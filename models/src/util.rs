// models/src/util.rs

//! Lenient serde helpers for stored documents. Records written by older
//! clients may carry empty strings, `null`s or malformed lists; these read
//! them as "absent" instead of failing.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Reads an optional string field, mapping missing, `null` and blank values
/// to `None` and parsing everything else with `FromStr`.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Reads a set of strings. Anything other than an array is an empty set and
/// non-string members are skipped.
pub fn lenient_string_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => BTreeSet::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        phone: Option<String>,
        #[serde(default, deserialize_with = "lenient_string_set")]
        tags: BTreeSet<String>,
    }

    #[test]
    fn should_treat_blank_string_as_none() {
        let holder: Holder = serde_json::from_str(r#"{"phone": "  "}"#).unwrap();
        assert!(holder.phone.is_none());
    }

    #[test]
    fn should_default_missing_set_to_empty() {
        let holder: Holder = serde_json::from_str("{}").unwrap();
        assert!(holder.tags.is_empty());
        assert!(holder.phone.is_none());
    }

    #[test]
    fn should_treat_malformed_set_as_empty() {
        let holder: Holder = serde_json::from_str(r#"{"tags": "Cardiology"}"#).unwrap();
        assert!(holder.tags.is_empty());
        let holder: Holder = serde_json::from_str(r#"{"tags": null}"#).unwrap();
        assert!(holder.tags.is_empty());
    }

    #[test]
    fn should_skip_non_string_members() {
        let holder: Holder = serde_json::from_str(r#"{"tags": ["d1", 7, null, "d1", "d2"]}"#).unwrap();
        assert_eq!(holder.tags.into_iter().collect::<Vec<_>>(), vec!["d1", "d2"]);
    }
}
