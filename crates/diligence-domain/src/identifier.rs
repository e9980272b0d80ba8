//! Taxpayer identifiers (CNPJ / CPF)

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Digits in a personal registration number (CPF)
pub const PERSONAL_LEN: usize = 11;

/// Digits in an organizational registration number (CNPJ)
pub const ORGANIZATION_LEN: usize = 14;

/// Identifier validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Nothing left after stripping non-digits
    #[error("identifier is empty")]
    Empty,

    /// Digit count is neither 11 nor 14
    #[error("identifier must have 11 (CPF) or 14 (CNPJ) digits, got {0}")]
    InvalidLength(usize),
}

/// Which kind of registration number an identifier is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// CPF, 11 digits
    Personal,
    /// CNPJ, 14 digits
    Organization,
}

/// A validated, digits-only registration number.
///
/// No checksum validation is performed; only the digit count is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Strip every non-digit character.
    ///
    /// ```
    /// use diligence_domain::Identifier;
    ///
    /// assert_eq!(Identifier::normalize("11.222.333/0001-81"), "11222333000181");
    /// ```
    pub fn normalize(raw: &str) -> String {
        raw.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Normalize and validate a user-supplied identifier.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let digits = Self::normalize(raw);
        match digits.len() {
            0 => Err(IdentifierError::Empty),
            PERSONAL_LEN | ORGANIZATION_LEN => Ok(Self(digits)),
            n => Err(IdentifierError::InvalidLength(n)),
        }
    }

    /// The digits
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// CPF or CNPJ
    pub fn kind(&self) -> IdentifierKind {
        if self.0.len() == PERSONAL_LEN {
            IdentifierKind::Personal
        } else {
            IdentifierKind::Organization
        }
    }

    /// Query parameter name the lookup endpoints expect for this identifier
    pub fn query_param(&self) -> &'static str {
        match self.kind() {
            IdentifierKind::Personal => "cpf",
            IdentifierKind::Organization => "cnpj",
        }
    }

    /// Display mask: `000.000.000-00` for CPF, `00.000.000/0000-00` for CNPJ.
    pub fn formatted(&self) -> String {
        let d = &self.0;
        match self.kind() {
            IdentifierKind::Personal => {
                format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
            }
            IdentifierKind::Organization => format!(
                "{}.{}.{}/{}-{}",
                &d[0..2],
                &d[2..5],
                &d[5..8],
                &d[8..12],
                &d[12..14]
            ),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}
