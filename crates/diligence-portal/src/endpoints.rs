//! Per-source endpoint table.
//!
//! | Source    | Path                              | Query parameter    |
//! |-----------|-----------------------------------|--------------------|
//! | CEIS      | `/api-de-dados/ceis`              | `codigoSancionado` |
//! | CNEP      | `/api-de-dados/cnep`              | `codigoSancionado` |
//! | CEPIM     | `/api-de-dados/cepim`             | `cnpjSancionado`   |
//! | LENIENCIA | `/api-de-dados/acordos-leniencia` | `cnpjSancionado`   |

use diligence_domain::{Identifier, RegistrySource};

const API_PREFIX: &str = "api-de-dados";

/// Where and how one source is queried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceEndpoint {
    /// Source this entry describes
    pub source: RegistrySource,
    /// Path segment after `/api-de-dados/`
    pub path: &'static str,
    /// Query parameter carrying the identifier
    pub param: &'static str,
}

impl SourceEndpoint {
    /// Table entry for a source
    pub fn for_source(source: RegistrySource) -> Self {
        let (path, param) = match source {
            RegistrySource::Ceis => ("ceis", "codigoSancionado"),
            RegistrySource::Cnep => ("cnep", "codigoSancionado"),
            RegistrySource::Cepim => ("cepim", "cnpjSancionado"),
            RegistrySource::Leniencia => ("acordos-leniencia", "cnpjSancionado"),
        };
        Self {
            source,
            path,
            param,
        }
    }

    /// Path relative to the base URL, e.g. `/api-de-dados/ceis`
    pub fn path(&self) -> String {
        format!("/{}/{}", API_PREFIX, self.path)
    }

    /// Full URL for the first result page of an identifier
    pub fn url(&self, base_url: &str, identifier: &Identifier) -> String {
        format!(
            "{}{}?{}={}&pagina=1",
            base_url.trim_end_matches('/'),
            self.path(),
            self.param,
            identifier.as_str()
        )
    }
}
