//! Entry decoding: value resolution, JSON detection and expansion

use serde_json::Value;

use crate::normalize::{key_from_field, key_from_path};
use crate::stores::{RemoteStoreClient, StoreResult};
use crate::types::{DecodedValue, NormalizedPair, RawEntry};

/// Classify a resolved value
///
/// Only a JSON object root makes a value `Structured`. Parse failures and
/// any other JSON root (string, number, array, ...) keep the raw string as a
/// `Scalar`.
pub fn classify(raw: &str) -> DecodedValue {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => DecodedValue::Structured(
            fields
                .into_iter()
                .map(|(name, value)| (name, stringify(value)))
                .collect(),
        ),
        _ => DecodedValue::Scalar(raw.to_string()),
    }
}

/// Text form of a JSON field value
///
/// Strings are taken verbatim, `null` is empty, everything else is compact JSON.
pub fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Turn a decoded value into pairs, keyed per its classification
pub fn to_pairs(entry_name: &str, decoded: DecodedValue) -> Vec<NormalizedPair> {
    match decoded {
        DecodedValue::Scalar(value) => vec![NormalizedPair::new(key_from_path(entry_name), value)],
        DecodedValue::Structured(fields) => fields
            .into_iter()
            .map(|(field, value)| NormalizedPair::new(key_from_field(&field), value))
            .collect(),
    }
}

/// Decodes listed entries into normalized pairs
pub struct EntryDecoder<'a> {
    resolver: &'a dyn RemoteStoreClient,
}

impl<'a> EntryDecoder<'a> {
    /// Create a decoder that resolves missing values through `resolver`
    pub fn new(resolver: &'a dyn RemoteStoreClient) -> Self {
        Self { resolver }
    }

    /// Value of an entry: inline when present, otherwise looked up
    pub fn resolve(&self, entry: &RawEntry) -> StoreResult<String> {
        match &entry.inline_value {
            Some(value) => Ok(value.clone()),
            None => self.resolver.get_secret_value(&entry.name),
        }
    }

    /// Resolve, classify and expand a secret entry
    pub fn decode_secret(&self, entry: &RawEntry) -> StoreResult<Vec<NormalizedPair>> {
        let raw = self.resolve(entry)?;
        Ok(to_pairs(&entry.name, classify(&raw)))
    }

    /// Key a parameter entry by its name
    ///
    /// Parameter values are never expanded, even when they hold JSON.
    pub fn decode_parameter(&self, entry: &RawEntry) -> StoreResult<Vec<NormalizedPair>> {
        let raw = self.resolve(entry)?;
        Ok(to_pairs(&entry.name, DecodedValue::Scalar(raw)))
    }
}

impl std::fmt::Debug for EntryDecoder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryDecoder")
            .field("resolver", &self.resolver.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{MemoryRemoteStore, StoreError};

    fn pairs(items: &[(&str, &str)]) -> Vec<NormalizedPair> {
        items.iter().map(|(k, v)| NormalizedPair::new(*k, *v)).collect()
    }

    #[test]
    fn test_plain_text_is_scalar() {
        assert_eq!(classify("testString"), DecodedValue::Scalar("testString".into()));
    }

    #[test]
    fn test_object_is_structured() {
        let decoded = classify("{\"mySecret\": \"myPassword\"}");
        assert_eq!(
            decoded,
            DecodedValue::Structured(vec![("mySecret".into(), "myPassword".into())])
        );
    }

    #[test]
    fn test_malformed_object_stays_scalar() {
        assert_eq!(classify("{not json"), DecodedValue::Scalar("{not json".into()));
        assert_eq!(classify("{\"a\": 1,}"), DecodedValue::Scalar("{\"a\": 1,}".into()));
    }

    #[test]
    fn test_non_object_json_stays_scalar() {
        for raw in ["[1, 2]", "42", "\"quoted\"", "true", "null", ""] {
            assert_eq!(classify(raw), DecodedValue::Scalar(raw.to_string()), "{}", raw);
        }
    }

    #[test]
    fn test_fields_keep_document_order() {
        match classify(r#"{"zeta": "1", "alpha": "2", "mid": "3"}"#) {
            DecodedValue::Structured(fields) => {
                let names: Vec<&str> = fields.iter().map(|(n, _)| n.as_str()).collect();
                assert_eq!(names, vec!["zeta", "alpha", "mid"]);
            }
            other => panic!("expected structured, got {:?}", other),
        }
    }

    #[test]
    fn test_field_values_are_stringified() {
        let decoded = classify(
            r#"{"port": 5432, "ratio": 1.5, "enabled": true, "empty": null, "hosts": ["a", "b"], "nested": {"k": 1}}"#,
        );
        assert_eq!(
            to_pairs("ignored/path", decoded),
            pairs(&[
                ("PORT", "5432"),
                ("RATIO", "1.5"),
                ("ENABLED", "true"),
                ("EMPTY", ""),
                ("HOSTS", r#"["a","b"]"#),
                ("NESTED", r#"{"k":1}"#),
            ])
        );
    }

    #[test]
    fn test_scalar_keyed_by_leaf_name() {
        let out = to_pairs("product/dev/DB_PASSWORD", DecodedValue::Scalar("hunter2".into()));
        assert_eq!(out, pairs(&[("DB_PASSWORD", "hunter2")]));
    }

    #[test]
    fn test_decode_secret_resolves_value() {
        let store = MemoryRemoteStore::new();
        store.insert_secret("product/dev/creds", r#"{"user": "admin", "Password": "pw"}"#);
        store.insert_secret("product/dev/api_key", "abc123");
        let decoder = EntryDecoder::new(&store);

        let structured = decoder.decode_secret(&RawEntry::named("product/dev/creds")).unwrap();
        assert_eq!(structured, pairs(&[("USER", "admin"), ("PASSWORD", "pw")]));

        let scalar = decoder.decode_secret(&RawEntry::named("product/dev/api_key")).unwrap();
        assert_eq!(scalar, pairs(&[("API_KEY", "abc123")]));
        assert_eq!(store.lookups(), 2);
    }

    #[test]
    fn test_inline_value_skips_lookup() {
        let store = MemoryRemoteStore::new();
        let decoder = EntryDecoder::new(&store);

        let out = decoder
            .decode_secret(&RawEntry::with_value("svc/token", "inline"))
            .unwrap();
        assert_eq!(out, pairs(&[("TOKEN", "inline")]));
        assert_eq!(store.lookups(), 0);
    }

    #[test]
    fn test_parameter_json_not_expanded() {
        let store = MemoryRemoteStore::new();
        let decoder = EntryDecoder::new(&store);

        let out = decoder
            .decode_parameter(&RawEntry::with_value("/svc/config", r#"{"a": "b"}"#))
            .unwrap();
        assert_eq!(out, pairs(&[("CONFIG", r#"{"a": "b"}"#)]));
    }

    #[test]
    fn test_lookup_failure_propagates() {
        let store = MemoryRemoteStore::new();
        store.insert_secret("svc/broken", "x");
        store.fail_lookup("svc/broken");
        let decoder = EntryDecoder::new(&store);

        assert!(matches!(
            decoder.decode_secret(&RawEntry::named("svc/broken")),
            Err(StoreError::Lookup { .. })
        ));
    }
}
