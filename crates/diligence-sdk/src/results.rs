//! Search results: per-source outcomes and their display form.

use diligence_domain::{
    payload_record_count, ConsolidatedPayload, Identifier, LookupEnvelope, LookupMetadata,
    RegistrySource,
};
use serde::{Deserialize, Serialize};

/// Shown for an unlisted source whose envelope carries no analysis text
pub use diligence_domain::NOT_LISTED_MESSAGE;

/// Settled result of one source's lookup.
///
/// Failures are values here; one failed source never aborts the others.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    /// Server returned an envelope
    Found(LookupEnvelope),
    /// Lookup failed; the reason is kept for display and logs
    Failed(String),
}

/// What the UI renders for one source.
///
/// Serializes to the shape the consolidated opinion request carries: the
/// full envelope for a listed identifier, or `{api, analysis, metadata}`
/// where `analysis` is the message text for an unlisted one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayEntry {
    /// Registry returned records
    Listed(LookupEnvelope),
    /// Registry returned nothing for the identifier
    NotListed {
        /// Source tag
        #[serde(rename = "api")]
        source: RegistrySource,
        /// Analysis error text, or the opinion, or [`NOT_LISTED_MESSAGE`]
        #[serde(rename = "analysis")]
        message: String,
        /// Envelope metadata
        metadata: LookupMetadata,
    },
}

impl DisplayEntry {
    /// Normalize an envelope for display
    pub fn from_envelope(envelope: LookupEnvelope) -> Self {
        if !envelope.is_unlisted() {
            return DisplayEntry::Listed(envelope);
        }

        let message = envelope
            .analysis
            .error_message()
            .or_else(|| envelope.analysis.opinion())
            .unwrap_or(NOT_LISTED_MESSAGE)
            .to_string();

        DisplayEntry::NotListed {
            source: envelope.source,
            message,
            metadata: envelope.metadata,
        }
    }

    /// Source this entry belongs to
    pub fn source(&self) -> RegistrySource {
        match self {
            DisplayEntry::Listed(envelope) => envelope.source,
            DisplayEntry::NotListed { source, .. } => *source,
        }
    }

    /// Whether the registry returned records
    pub fn is_listed(&self) -> bool {
        matches!(self, DisplayEntry::Listed(_))
    }

    /// Metadata of the underlying envelope
    pub fn metadata(&self) -> &LookupMetadata {
        match self {
            DisplayEntry::Listed(envelope) => &envelope.metadata,
            DisplayEntry::NotListed { metadata, .. } => metadata,
        }
    }

    /// Text shown under the source heading
    pub fn summary(&self) -> &str {
        match self {
            DisplayEntry::Listed(envelope) => envelope
                .analysis
                .opinion()
                .or_else(|| envelope.analysis.error_message())
                .unwrap_or(""),
            DisplayEntry::NotListed { message, .. } => message,
        }
    }

    /// Number of registry records behind this entry
    pub fn record_count(&self) -> usize {
        match self {
            DisplayEntry::Listed(envelope) => payload_record_count(&envelope.portal_data),
            DisplayEntry::NotListed { .. } => 0,
        }
    }
}

/// Outcome of a four-source search, in fixed source order.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    identifier: Identifier,
    outcomes: Vec<(RegistrySource, SourceOutcome)>,
}

impl SearchResults {
    /// Pair outcomes with [`RegistrySource::ALL`], position by position
    pub fn new(identifier: Identifier, outcomes: [SourceOutcome; 4]) -> Self {
        Self {
            identifier,
            outcomes: RegistrySource::ALL.into_iter().zip(outcomes).collect(),
        }
    }

    /// Identifier that was searched
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Every source with its settled outcome
    pub fn outcomes(&self) -> impl Iterator<Item = (RegistrySource, &SourceOutcome)> {
        self.outcomes.iter().map(|(source, outcome)| (*source, outcome))
    }

    /// Display entries for the sources that answered; failed sources are left out
    pub fn entries(&self) -> Vec<DisplayEntry> {
        self.outcomes
            .iter()
            .filter_map(|(_, outcome)| match outcome {
                SourceOutcome::Found(envelope) => Some(DisplayEntry::from_envelope(envelope.clone())),
                SourceOutcome::Failed(_) => None,
            })
            .collect()
    }

    /// Sources that failed, with their reasons
    pub fn failures(&self) -> Vec<(RegistrySource, &str)> {
        self.outcomes
            .iter()
            .filter_map(|(source, outcome)| match outcome {
                SourceOutcome::Failed(reason) => Some((*source, reason.as_str())),
                SourceOutcome::Found(_) => None,
            })
            .collect()
    }

    /// No source produced an entry ("not found")
    pub fn is_empty(&self) -> bool {
        self.outcomes
            .iter()
            .all(|(_, outcome)| matches!(outcome, SourceOutcome::Failed(_)))
    }

    /// Four-keyed object for the consolidated opinion request
    pub fn consolidated_payload(&self) -> ConsolidatedPayload {
        let mut payload = ConsolidatedPayload::new();
        for entry in self.entries() {
            if let Ok(value) = serde_json::to_value(&entry) {
                payload.insert(entry.source(), value);
            }
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diligence_domain::{AnalysisMetadata, AnalysisOutcome, AnalysisResult, ErrorBody};
    use serde_json::{json, Value};

    fn identifier() -> Identifier {
        Identifier::parse("11222333000181").unwrap()
    }

    fn envelope(source: RegistrySource, portal_data: Value, analysis: AnalysisOutcome) -> LookupEnvelope {
        LookupEnvelope {
            source,
            portal_data,
            analysis,
            metadata: LookupMetadata::new(identifier()),
        }
    }

    fn no_data() -> AnalysisOutcome {
        AnalysisOutcome::Failed(ErrorBody::new("no data provided for analysis"))
    }

    fn completed(text: &str) -> AnalysisOutcome {
        AnalysisOutcome::Completed(AnalysisResult {
            raw_data: json!([{"id": 1}]),
            ai_analysis: text.to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            request_id: "req".to_string(),
            metadata: AnalysisMetadata::default(),
        })
    }

    #[test]
    fn test_unlisted_entry_carries_analysis_error() {
        for source in RegistrySource::ALL {
            let entry = DisplayEntry::from_envelope(envelope(source, json!([]), no_data()));
            assert!(!entry.is_listed());
            assert_eq!(entry.source(), source);
            assert_eq!(entry.summary(), "no data provided for analysis");
        }
    }

    #[test]
    fn test_unlisted_entry_message_fallbacks() {
        let entry = DisplayEntry::from_envelope(envelope(
            RegistrySource::Cnep,
            json!({}),
            completed("nothing to report"),
        ));
        assert_eq!(entry.summary(), "nothing to report");
    }

    #[test]
    fn test_listed_entry() {
        let entry = DisplayEntry::from_envelope(envelope(
            RegistrySource::Ceis,
            json!([{"id": 1}, {"id": 2}]),
            completed("high risk"),
        ));
        assert!(entry.is_listed());
        assert_eq!(entry.summary(), "high risk");
        assert_eq!(entry.record_count(), 2);
    }

    #[test]
    fn test_not_listed_serialization() {
        let entry = DisplayEntry::from_envelope(envelope(RegistrySource::Cepim, json!([]), no_data()));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["api"], "CEPIM");
        assert_eq!(value["analysis"], "no data provided for analysis");
        assert_eq!(value["metadata"]["cnpj"], "11222333000181");
        assert!(value.get("portalData").is_none());
    }

    #[test]
    fn test_results_keep_source_order_and_skip_failures() {
        let results = SearchResults::new(
            identifier(),
            [
                SourceOutcome::Failed("timeout".to_string()),
                SourceOutcome::Found(envelope(RegistrySource::Cnep, json!([]), no_data())),
                SourceOutcome::Found(envelope(RegistrySource::Cepim, json!([{"id": 3}]), completed("x"))),
                SourceOutcome::Failed("HTTP 500".to_string()),
            ],
        );

        let sources: Vec<_> = results.entries().iter().map(DisplayEntry::source).collect();
        assert_eq!(sources, vec![RegistrySource::Cnep, RegistrySource::Cepim]);
        assert_eq!(
            results.failures(),
            vec![(RegistrySource::Ceis, "timeout"), (RegistrySource::Leniencia, "HTTP 500")]
        );
        assert!(!results.is_empty());

        let payload = results.consolidated_payload();
        assert_eq!(payload.len(), 2);
        assert!(payload.get(RegistrySource::Ceis).is_none());
        assert!(payload.get(RegistrySource::Cnep).is_some());
    }

    #[test]
    fn test_all_failed_is_empty() {
        let results = SearchResults::new(
            identifier(),
            std::array::from_fn(|i| SourceOutcome::Failed(format!("failure {}", i))),
        );
        assert!(results.is_empty());
        assert!(results.entries().is_empty());
        assert!(results.consolidated_payload().is_empty());
    }
}
