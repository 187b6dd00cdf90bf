use super::component::Component;
use super::identifier::{Identifier, IdentifierOption};
use super::model_record::BinaryRecord;
use super::ParameterError;
use indexmap::IndexMap;
use ndarray::Array2;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

/// Binary interaction parameters of a pair of substances.
///
/// `k_ij` is stored for the pair in the order given in the record. If `k_ji`
/// is omitted the interaction is symmetric. `alpha` is the optional second
/// (non-randomness) coefficient used by NRTL type families.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BinaryInteractionRecord {
    #[serde(default)]
    #[serde(skip_serializing_if = "f64::is_zero")]
    pub k_ij: f64,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k_ji: Option<f64>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

impl BinaryInteractionRecord {
    pub fn new(k_ij: f64, k_ji: Option<f64>, alpha: Option<f64>) -> Self {
        Self { k_ij, k_ji, alpha }
    }

    /// Parameter pair as seen from the reversed component order.
    fn reversed(&self) -> (f64, f64) {
        let k_ji = self.k_ji.unwrap_or(self.k_ij);
        (k_ji, self.k_ij)
    }
}

impl From<f64> for BinaryInteractionRecord {
    fn from(k_ij: f64) -> Self {
        Self::new(k_ij, None, None)
    }
}

impl fmt::Display for BinaryInteractionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tokens = vec![format!("k_ij={}", self.k_ij)];
        if let Some(k_ji) = self.k_ji {
            tokens.push(format!("k_ji={}", k_ji));
        }
        if let Some(alpha) = self.alpha {
            tokens.push(format!("alpha={}", alpha));
        }
        write!(f, "BinaryInteractionRecord({})", tokens.join(", "))
    }
}

/// Square matrices of binary interaction parameters for an ordered list of components.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMatrix {
    k_ij: Array2<f64>,
    alpha: Option<Array2<f64>>,
}

impl BinaryMatrix {
    /// Create the matrices after checking their shape.
    ///
    /// The matrices have to be square with vanishing diagonal and the
    /// optional `alpha` matrix must have the same shape as `k_ij`.
    pub fn new(k_ij: Array2<f64>, alpha: Option<Array2<f64>>) -> Result<Self, ParameterError> {
        let (n, m) = k_ij.dim();
        if n != m {
            return Err(ParameterError::IncompatibleParameters(format!(
                "binary interaction matrix has to be square, got {n}x{m}."
            )));
        }
        if k_ij.diag().iter().any(|k| *k != 0.0) {
            return Err(ParameterError::IncompatibleParameters(
                "binary interaction matrix has a non-zero diagonal.".to_string(),
            ));
        }
        if let Some(alpha) = &alpha {
            if alpha.dim() != (n, n) {
                return Err(ParameterError::IncompatibleParameters(format!(
                    "alpha matrix has shape {:?}, expected {:?}.",
                    alpha.dim(),
                    (n, n)
                )));
            }
        }
        Ok(Self { k_ij, alpha })
    }

    /// Binary matrix without any interactions.
    pub fn zeros(n: usize) -> Self {
        Self {
            k_ij: Array2::zeros([n; 2]),
            alpha: None,
        }
    }

    pub fn components(&self) -> usize {
        self.k_ij.nrows()
    }

    pub fn k_ij(&self) -> &Array2<f64> {
        &self.k_ij
    }

    pub fn alpha(&self) -> Option<&Array2<f64>> {
        self.alpha.as_ref()
    }

    /// Check whether `k_ij == k_ji` for all pairs.
    pub fn is_symmetric(&self) -> bool {
        self.k_ij == self.k_ij.t()
    }
}

impl fmt::Display for BinaryMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k_ij:\n{}", self.k_ij)?;
        if let Some(alpha) = &self.alpha {
            write!(f, "\nalpha:\n{}", alpha)?;
        }
        Ok(())
    }
}

/// Read only source of binary interaction parameters.
///
/// Missing pairs are not an error: they default to zero, i.e. the
/// uncorrected combination rule.
pub trait BinaryInteractionSource: Send + Sync {
    /// Interaction parameter `k_ij` of the ordered pair (`id1`, `id2`) for `family`.
    fn lookup(&self, id1: &Identifier, id2: &Identifier, family: &str) -> f64;

    /// Second interaction parameter of the pair, if the family uses one.
    fn lookup_alpha(&self, id1: &Identifier, id2: &Identifier, family: &str) -> Option<f64>;

    /// Assemble the binary matrices for an ordered list of components.
    fn binary_matrix(&self, components: &[Arc<Component>], family: &str) -> BinaryMatrix {
        let n = components.len();
        let mut k_ij = Array2::zeros([n; 2]);
        let mut alpha = Array2::zeros([n; 2]);
        let mut has_alpha = false;
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let (id1, id2) = (&components[i].identifier, &components[j].identifier);
                k_ij[[i, j]] = self.lookup(id1, id2, family);
                if let Some(a) = self.lookup_alpha(id1, id2, family) {
                    alpha[[i, j]] = a;
                    has_alpha = true;
                }
            }
        }
        BinaryMatrix {
            k_ij,
            alpha: has_alpha.then_some(alpha),
        }
    }
}

/// Source for systems without binary interaction parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBinaryInteraction;

impl BinaryInteractionSource for NoBinaryInteraction {
    fn lookup(&self, _: &Identifier, _: &Identifier, _: &str) -> f64 {
        0.0
    }

    fn lookup_alpha(&self, _: &Identifier, _: &Identifier, _: &str) -> Option<f64> {
        None
    }
}

type PairMap = HashMap<(String, String), BinaryInteractionRecord>;

/// Binary interaction parameters grouped by the name of the equation of state family.
///
/// The json representation maps family names to lists of binary records:
///
/// ```json
/// {
///     "peng-robinson": [
///         {"id1": {"name": "methane"}, "id2": {"name": "ethane"}, "model_record": {"k_ij": 0.003}}
///     ]
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BipStore {
    identifier_option: IdentifierOption,
    families: IndexMap<String, PairMap>,
}

impl BipStore {
    /// Create an empty store that identifies substances by `identifier_option`.
    pub fn new(identifier_option: IdentifierOption) -> Self {
        Self {
            identifier_option,
            families: IndexMap::new(),
        }
    }

    /// Add the parameters of a single pair.
    pub fn with_pair<B: Into<BinaryInteractionRecord>>(
        mut self,
        family: &str,
        id1: &str,
        id2: &str,
        record: B,
    ) -> Self {
        self.families
            .entry(family.to_string())
            .or_default()
            .insert((id1.to_string(), id2.to_string()), record.into());
        self
    }

    /// Build the store from binary records grouped by family.
    ///
    /// Records without the requested identifier are skipped. A pair that is
    /// defined more than once for the same family is an error.
    pub fn from_records(
        records: IndexMap<String, Vec<BinaryRecord<Identifier, BinaryInteractionRecord>>>,
        identifier_option: IdentifierOption,
    ) -> Result<Self, ParameterError> {
        let mut families = IndexMap::with_capacity(records.len());
        for (family, records) in records {
            let mut pairs = PairMap::with_capacity(records.len());
            for br in records {
                let (Some(id1), Some(id2)) = (
                    br.id1.as_str(identifier_option),
                    br.id2.as_str(identifier_option),
                ) else {
                    continue;
                };
                let key = (id1.to_string(), id2.to_string());
                let reversed = (key.1.clone(), key.0.clone());
                if pairs.contains_key(&key) || pairs.contains_key(&reversed) {
                    return Err(ParameterError::IncompatibleParameters(format!(
                        "binary parameters for ({}, {}) are defined more than once for family '{}'.",
                        key.0, key.1, family
                    )));
                }
                pairs.insert(key, br.model_record);
            }
            families.insert(family, pairs);
        }
        Ok(Self {
            identifier_option,
            families,
        })
    }

    /// Read the store from a json file.
    pub fn from_json<P: AsRef<Path>>(
        file: P,
        identifier_option: IdentifierOption,
    ) -> Result<Self, ParameterError> {
        let reader = BufReader::new(File::open(file)?);
        let records = serde_json::from_reader(reader)?;
        Self::from_records(records, identifier_option)
    }

    /// Names of all families with stored parameters.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }

    fn record(&self, id1: &Identifier, id2: &Identifier, family: &str) -> Option<(f64, f64, Option<f64>)> {
        let pairs = self.families.get(family)?;
        let id1 = id1.as_str(self.identifier_option)?.to_string();
        let id2 = id2.as_str(self.identifier_option)?.to_string();
        if let Some(r) = pairs.get(&(id1.clone(), id2.clone())) {
            return Some((r.k_ij, r.k_ji.unwrap_or(r.k_ij), r.alpha));
        }
        pairs.get(&(id2, id1)).map(|r| {
            let (k_ij, k_ji) = r.reversed();
            (k_ij, k_ji, r.alpha)
        })
    }
}

impl BinaryInteractionSource for BipStore {
    fn lookup(&self, id1: &Identifier, id2: &Identifier, family: &str) -> f64 {
        self.record(id1, id2, family).map_or(0.0, |r| r.0)
    }

    fn lookup_alpha(&self, id1: &Identifier, id2: &Identifier, family: &str) -> Option<f64> {
        self.record(id1, id2, family).and_then(|r| r.2)
    }
}
