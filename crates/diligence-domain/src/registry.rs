//! Raw registry results

use crate::RegistrySource;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error text recorded for a registry that has no entry for the identifier
pub const NOT_LISTED_MESSAGE: &str = "identifier not listed in this registry";

/// True for payloads that carry no registry data: `null`, `[]` and `{}`.
pub fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

/// Number of records in a payload: array length, 0 for `null`, 1 otherwise
pub fn payload_record_count(payload: &Value) -> usize {
    match payload {
        Value::Array(items) => items.len(),
        Value::Null => 0,
        _ => 1,
    }
}

/// What one sanctions list returned for one identifier.
///
/// The payload is the registry's JSON verbatim; its structure belongs to the
/// external service and is not validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryResult {
    /// List the payload came from
    pub source: RegistrySource,

    /// Parsed response body, typically an array
    pub payload: Value,

    /// Error text when the lookup did not produce data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegistryResult {
    /// Create a result from a successful fetch.
    ///
    /// An empty payload is recorded with [`NOT_LISTED_MESSAGE`] as its error.
    pub fn new(source: RegistrySource, payload: Value) -> Self {
        let error = is_empty_payload(&payload).then(|| NOT_LISTED_MESSAGE.to_string());
        Self {
            source,
            payload,
            error,
        }
    }

    /// The identifier is not listed in this source
    pub fn is_empty(&self) -> bool {
        is_empty_payload(&self.payload)
    }

    /// Number of records, when the payload is an array
    pub fn record_count(&self) -> usize {
        payload_record_count(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_payloads() {
        assert!(is_empty_payload(&Value::Null));
        assert!(is_empty_payload(&json!([])));
        assert!(is_empty_payload(&json!({})));
        assert!(!is_empty_payload(&json!([{"id": 1}])));
        assert!(!is_empty_payload(&json!({"ceisData": null})));
        assert!(!is_empty_payload(&json!("text")));
    }

    #[test]
    fn test_record_count() {
        let result = RegistryResult::new(RegistrySource::Ceis, json!([{"id": 1}, {"id": 2}]));
        assert_eq!(result.record_count(), 2);
        assert!(!result.is_empty());

        let empty = RegistryResult::new(RegistrySource::Cnep, json!([]));
        assert_eq!(empty.record_count(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_empty_payload_records_not_listed() {
        for payload in [Value::Null, json!([]), json!({})] {
            let result = RegistryResult::new(RegistrySource::Cepim, payload);
            assert_eq!(result.error.as_deref(), Some(NOT_LISTED_MESSAGE));

            let value = serde_json::to_value(&result).unwrap();
            assert_eq!(value["source"], "CEPIM");
            assert_eq!(value["error"], NOT_LISTED_MESSAGE);
        }

        let listed = RegistryResult::new(RegistrySource::Cepim, json!([{"id": 1}]));
        assert!(listed.error.is_none());
        assert!(serde_json::to_value(&listed).unwrap().get("error").is_none());
    }
}
