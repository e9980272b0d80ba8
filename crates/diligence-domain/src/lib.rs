//! Diligence Domain Layer
//!
//! Data model shared by the registry client, the analysis client, the HTTP
//! server and the aggregation SDK. Nothing here performs I/O.
//!
//! ## Key Concepts
//!
//! - **Identifier**: a CNPJ (14 digits) or CPF (11 digits), normalized to digits
//! - **RegistrySource**: one of the four sanctions lists (CEIS, CNEP, CEPIM, LENIENCIA)
//! - **RegistryResult**: the raw payload one list returned for one identifier
//! - **AnalysisResult**: the language-model opinion over a payload
//! - **LookupEnvelope**: registry payload + analysis + metadata, one per source per search

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod envelope;
pub mod identifier;
pub mod registry;
pub mod source;

// Re-exports for convenience
pub use analysis::{AnalysisMetadata, AnalysisOutcome, AnalysisResult, ErrorBody};
pub use envelope::{ConsolidatedPayload, LookupEnvelope, LookupMetadata};
pub use identifier::{Identifier, IdentifierError, IdentifierKind};
pub use registry::{is_empty_payload, payload_record_count, RegistryResult, NOT_LISTED_MESSAGE};
pub use source::{RegistrySource, UnknownSource};

/// Generate a fresh correlation id for a request.
pub fn correlation_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Current time as an RFC 3339 UTC timestamp with millisecond precision.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_ids_are_unique() {
        let a = correlation_id();
        let b = correlation_id();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let ts = timestamp_now();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
        assert!(ts.ends_with('Z'));
    }
}
