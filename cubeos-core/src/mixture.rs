use crate::errors::{EosError, EosResult};
use crate::parameter::{Component, IdentifierOption, PureRecord};
use ndarray::{arr1, Array1};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

const MOLEFRAC_TOL: f64 = 1e-8;

/// Ordered list of components together with their mole fractions.
#[derive(Debug, Clone)]
pub struct Mixture {
    components: Vec<Arc<Component>>,
    molefracs: Array1<f64>,
}

impl Mixture {
    /// Create a mixture after checking the mole fractions.
    ///
    /// Mole fractions have to be finite, non-negative and sum up to one
    /// within 1e-8.
    pub fn new(components: Vec<Arc<Component>>, molefracs: Array1<f64>) -> EosResult<Self> {
        if components.is_empty() {
            return Err(EosError::InvalidInput(
                String::from("Mixture"),
                String::from("no components"),
            ));
        }
        if components.len() != molefracs.len() {
            return Err(EosError::IncompatibleComponents(
                components.len(),
                molefracs.len(),
            ));
        }
        if molefracs.iter().any(|x| !x.is_finite() || *x < 0.0) {
            return Err(EosError::InvalidInput(
                String::from("Mixture"),
                format!("mole fractions have to be non-negative, got {molefracs}"),
            ));
        }
        let sum = molefracs.sum();
        if (sum - 1.0).abs() > MOLEFRAC_TOL {
            return Err(EosError::InvalidInput(
                String::from("Mixture"),
                format!("mole fractions sum up to {sum}"),
            ));
        }
        Ok(Self {
            components,
            molefracs,
        })
    }

    /// A single substance.
    pub fn pure(component: Arc<Component>) -> Self {
        Self {
            components: vec![component],
            molefracs: arr1(&[1.0]),
        }
    }

    /// Read the components from a json file of [PureRecord]s.
    pub fn from_json<P: AsRef<Path>>(
        substances: &[&str],
        file: P,
        identifier_option: IdentifierOption,
        molefracs: Array1<f64>,
    ) -> EosResult<Self> {
        let components = PureRecord::from_json(substances, file, identifier_option)?
            .into_iter()
            .map(Arc::new)
            .collect();
        Self::new(components, molefracs)
    }

    /// The same components with a different composition.
    pub fn with_molefracs(&self, molefracs: Array1<f64>) -> EosResult<Self> {
        Self::new(self.components.clone(), molefracs)
    }

    pub fn components(&self) -> &[Arc<Component>] {
        &self.components
    }

    pub fn molefracs(&self) -> &Array1<f64> {
        &self.molefracs
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn tc(&self) -> Array1<f64> {
        self.components.iter().map(|c| c.model_record.tc).collect()
    }

    pub fn pc(&self) -> Array1<f64> {
        self.components.iter().map(|c| c.model_record.pc).collect()
    }

    pub fn acentric_factor(&self) -> Array1<f64> {
        self.components
            .iter()
            .map(|c| c.model_record.acentric_factor)
            .collect()
    }
}

impl fmt::Display for Mixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self
            .components
            .iter()
            .map(|c| c.identifier.to_string())
            .collect();
        write!(f, "Mixture([{}], x={})", names.join(", "), self.molefracs)
    }
}
