//! The four sanctions lists queried for every search

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A list name that is not one of the four registry sources
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown registry source: {0}")]
pub struct UnknownSource(pub String);

/// Registry source a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegistrySource {
    /// Cadastro de Empresas Inidôneas e Suspensas
    Ceis,
    /// Cadastro Nacional de Empresas Punidas
    Cnep,
    /// Cadastro de Entidades Privadas sem Fins Lucrativos Impedidas
    Cepim,
    /// Acordos de Leniência
    Leniencia,
}

impl RegistrySource {
    /// Every source, in fixed display order
    pub const ALL: [RegistrySource; 4] = [
        RegistrySource::Ceis,
        RegistrySource::Cnep,
        RegistrySource::Cepim,
        RegistrySource::Leniencia,
    ];

    /// Wire tag carried in lookup envelopes
    pub fn tag(&self) -> &'static str {
        match self {
            RegistrySource::Ceis => "CEIS",
            RegistrySource::Cnep => "CNEP",
            RegistrySource::Cepim => "CEPIM",
            RegistrySource::Leniencia => "LENIENCIA",
        }
    }

    /// Route segment of the lookup endpoint (`/api/{segment}`)
    pub fn segment(&self) -> &'static str {
        match self {
            RegistrySource::Ceis => "ceis",
            RegistrySource::Cnep => "cnep",
            RegistrySource::Cepim => "cepim",
            RegistrySource::Leniencia => "leniencia",
        }
    }

    /// Key under which this source appears in the consolidated payload
    pub fn consolidated_key(&self) -> &'static str {
        match self {
            RegistrySource::Ceis => "ceisData",
            RegistrySource::Cnep => "cnepData",
            RegistrySource::Cepim => "cepimData",
            RegistrySource::Leniencia => "acordosData",
        }
    }
}

impl fmt::Display for RegistrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for RegistrySource {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ceis" => Ok(RegistrySource::Ceis),
            "cnep" => Ok(RegistrySource::Cnep),
            "cepim" => Ok(RegistrySource::Cepim),
            "leniencia" | "acordos-leniencia" => Ok(RegistrySource::Leniencia),
            _ => Err(UnknownSource(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_order() {
        let tags: Vec<_> = RegistrySource::ALL.iter().map(|s| s.tag()).collect();
        assert_eq!(tags, ["CEIS", "CNEP", "CEPIM", "LENIENCIA"]);
    }

    #[test]
    fn test_parse_segments_and_tags() {
        for source in RegistrySource::ALL {
            assert_eq!(source.segment().parse::<RegistrySource>().unwrap(), source);
            assert_eq!(source.tag().parse::<RegistrySource>().unwrap(), source);
        }
        assert_eq!(
            "acordos-leniencia".parse::<RegistrySource>().unwrap(),
            RegistrySource::Leniencia
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "ofac".parse::<RegistrySource>().unwrap_err();
        assert_eq!(err, UnknownSource("ofac".to_string()));
    }

    #[test]
    fn test_serde_uses_tag() {
        let json = serde_json::to_string(&RegistrySource::Leniencia).unwrap();
        assert_eq!(json, "\"LENIENCIA\"");
        let back: RegistrySource = serde_json::from_str("\"CEPIM\"").unwrap();
        assert_eq!(back, RegistrySource::Cepim);
    }
}
