use serde::{Deserialize, Serialize};
use std::fmt;

/// Possible variants to identify a substance.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierOption {
    Cas,
    Name,
    Formula,
}

/// Identifiers of a substance in a component catalog.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// CAS number
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cas: Option<String>,
    /// Commonly used english name
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Chemical formula
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

impl Identifier {
    /// Create a new identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cubeos_core::parameter::{Identifier, IdentifierOption};
    /// let propane = Identifier::new(Some("74-98-6"), Some("propane"), Some("C3H8"));
    /// assert_eq!(propane.as_str(IdentifierOption::Name), Some("propane"));
    /// ```
    pub fn new(cas: Option<&str>, name: Option<&str>, formula: Option<&str>) -> Self {
        Self {
            cas: cas.map(Into::into),
            name: name.map(Into::into),
            formula: formula.map(Into::into),
        }
    }

    /// Identifier consisting of a name only.
    pub fn from_name(name: &str) -> Self {
        Self::new(None, Some(name), None)
    }

    pub fn as_str(&self, option: IdentifierOption) -> Option<&str> {
        match option {
            IdentifierOption::Cas => self.cas.as_deref(),
            IdentifierOption::Name => self.name.as_deref(),
            IdentifierOption::Formula => self.formula.as_deref(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<_> = [
            ("cas", &self.cas),
            ("name", &self.name),
            ("formula", &self.formula),
        ]
        .into_iter()
        .filter_map(|(key, id)| id.as_ref().map(|id| format!("{key}={id}")))
        .collect();
        write!(f, "Identifier({})", ids.join(", "))
    }
}
