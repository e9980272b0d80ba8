//! Lookup envelopes and the consolidated four-source payload

use crate::{is_empty_payload, AnalysisOutcome, Identifier, RegistryResult, RegistrySource};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-call metadata attached to every envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupMetadata {
    /// Normalized identifier that was looked up
    #[serde(rename = "cnpj")]
    pub identifier: Identifier,

    /// When the envelope was assembled (RFC 3339)
    pub timestamp: String,

    /// Fresh correlation id for this lookup
    pub request_id: String,
}

impl LookupMetadata {
    /// Metadata stamped with the current time and a new correlation id
    pub fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            timestamp: crate::timestamp_now(),
            request_id: crate::correlation_id(),
        }
    }
}

/// Registry payload + analysis + metadata for one source.
///
/// Exactly one envelope is produced per source per search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupEnvelope {
    /// Source tag
    #[serde(rename = "api")]
    pub source: RegistrySource,

    /// Raw registry payload, verbatim
    pub portal_data: Value,

    /// Analysis of `portal_data`, or the error the analysis step returned
    pub analysis: AnalysisOutcome,

    /// Identifier, timestamp and correlation id
    pub metadata: LookupMetadata,
}

impl LookupEnvelope {
    /// Assemble an envelope from a registry result and its analysis
    pub fn new(registry: RegistryResult, analysis: AnalysisOutcome, identifier: Identifier) -> Self {
        Self {
            source: registry.source,
            portal_data: registry.payload,
            analysis,
            metadata: LookupMetadata::new(identifier),
        }
    }

    /// The registry returned no records for the identifier
    pub fn is_unlisted(&self) -> bool {
        is_empty_payload(&self.portal_data)
    }
}

/// One object keyed by source (`ceisData`, `cnepData`, `cepimData`,
/// `acordosData`), sent to the analysis endpoint for the consolidated opinion.
///
/// Sources without an entry are left out rather than set to `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsolidatedPayload(Map<String, Value>);

impl ConsolidatedPayload {
    /// Empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry for a source
    pub fn insert(&mut self, source: RegistrySource, entry: Value) {
        self.0.insert(source.consolidated_key().to_string(), entry);
    }

    /// Entry for a source
    pub fn get(&self, source: RegistrySource) -> Option<&Value> {
        self.0.get(source.consolidated_key())
    }

    /// Number of sources present
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No source present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// As a JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
