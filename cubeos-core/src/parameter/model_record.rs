use super::identifier::{Identifier, IdentifierOption};
use super::ParameterError;
use indexmap::{IndexMap, IndexSet};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A collection of parameters of a pure substance.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PureRecord<M> {
    pub identifier: Identifier,
    #[serde(default)]
    pub molarweight: f64,
    pub model_record: M,
}

impl<M> PureRecord<M> {
    /// Create a new `PureRecord`.
    pub fn new(identifier: Identifier, molarweight: f64, model_record: M) -> Self {
        Self {
            identifier,
            molarweight,
            model_record,
        }
    }

    /// Read the records of the queried substances from a json file.
    ///
    /// The records are returned in the order of `substances`.
    pub fn from_json<P>(
        substances: &[&str],
        file: P,
        identifier_option: IdentifierOption,
    ) -> Result<Vec<Self>, ParameterError>
    where
        P: AsRef<Path>,
        M: DeserializeOwned,
    {
        let queried: IndexSet<&str> = substances.iter().copied().collect();
        if queried.len() != substances.len() {
            return Err(ParameterError::IncompatibleParameters(
                "A substance was defined more than once.".to_string(),
            ));
        }

        let reader = BufReader::new(File::open(file)?);
        let file_records: Vec<Self> = serde_json::from_reader(reader)?;
        Self::select(substances, file_records, identifier_option)
    }

    /// Pick the queried substances from a list of records.
    pub fn select(
        substances: &[&str],
        records: Vec<Self>,
        identifier_option: IdentifierOption,
    ) -> Result<Vec<Self>, ParameterError> {
        let mut found: IndexMap<String, Self> = IndexMap::with_capacity(substances.len());
        for record in records {
            let id = record.identifier.as_str(identifier_option).map(String::from);
            if let Some(id) = id {
                if substances.contains(&id.as_str()) && !found.contains_key(&id) {
                    found.insert(id, record);
                }
            }
            if found.len() == substances.len() {
                break;
            }
        }

        let missing: Vec<_> = substances
            .iter()
            .filter(|s| !found.contains_key(**s))
            .collect();
        if !missing.is_empty() {
            return Err(ParameterError::ComponentsNotFound(format!("{:?}", missing)));
        }

        Ok(substances
            .iter()
            .filter_map(|s| found.swap_remove(*s))
            .collect())
    }
}

impl<M> std::fmt::Display for PureRecord<M>
where
    M: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PureRecord(")?;
        write!(f, "\n\tidentifier={},", self.identifier)?;
        write!(f, "\n\tmolarweight={},", self.molarweight)?;
        write!(f, "\n\tmodel_record={},", self.model_record)?;
        write!(f, "\n)")
    }
}

/// A collection of parameters that model interactions between two substances.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BinaryRecord<I, B> {
    /// Identifier of the first component
    pub id1: I,
    /// Identifier of the second component
    pub id2: I,
    /// Binary interaction parameter(s)
    pub model_record: B,
}

impl<I, B> BinaryRecord<I, B> {
    /// Crates a new `BinaryRecord`.
    pub fn new(id1: I, id2: I, model_record: B) -> Self {
        Self {
            id1,
            id2,
            model_record,
        }
    }
}

impl<I, B> std::fmt::Display for BinaryRecord<I, B>
where
    I: std::fmt::Display,
    B: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BinaryRecord(")?;
        write!(f, "\n\tid1={},", self.id1)?;
        write!(f, "\n\tid2={},", self.id2)?;
        write!(f, "\n\tmodel_record={},", self.model_record)?;
        write!(f, "\n)")
    }
}
