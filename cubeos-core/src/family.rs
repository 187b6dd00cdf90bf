use crate::cubic::{solve_z, EosParameters, PhaseKind, PhaseRoot, ZRoots};
use crate::errors::{EosError, EosResult};
use crate::fugacity::{self, FugacityInput, SchmidtWenzel};
use crate::mixing_rules::{MixingRule, MixtureCoefficients, PureCoefficients};
use crate::parameter::{BinaryInteractionSource, BinaryMatrix, Component};
use ndarray::Array1;
use num_dual::DualNum;
use std::fmt;
use std::sync::Arc;

/// Molar gas constant in J/(mol K).
pub const GAS_CONSTANT: f64 = 8.314462618;

/// Capabilities of a family of cubic equations of state.
///
/// A family provides the temperature dependent pure component coefficients
/// and maps the combined mixture coefficients to the attractive denominator
/// v² + δv + ε. The fugacity coefficients default to the closed form
/// expression with the (u, w) constants derived from (δ, ε).
pub trait CubicFamily: Send + Sync {
    /// Name used to look up binary interaction parameters.
    fn name(&self) -> &str;

    /// aᵢ, bᵢ and family specific coefficients of all components at `temperature`.
    fn pure_coefficients(
        &self,
        temperature: f64,
        gas_constant: f64,
        components: &[Arc<Component>],
    ) -> EosResult<PureCoefficients>;

    /// (δ, ε) of the mixture.
    fn shape_parameters<D: DualNum<f64> + Copy>(&self, mixture: &MixtureCoefficients<D>) -> (D, D);

    fn schmidt_wenzel(&self, mixture: &MixtureCoefficients) -> EosResult<SchmidtWenzel> {
        let (delta, epsilon) = self.shape_parameters(mixture);
        SchmidtWenzel::from_shape(delta, epsilon, mixture.b)
    }

    /// Logarithmic fugacity coefficients of a phase.
    fn ln_phi(&self, input: &FugacityInput) -> EosResult<Array1<f64>> {
        fugacity::ln_phi(input, self.schmidt_wenzel(input.mixture)?)
    }
}

/// A cubic equation of state: family, mixing rule and gas constant.
#[derive(Debug, Clone)]
pub struct CubicEos<F> {
    family: F,
    mixing_rule: MixingRule,
    gas_constant: f64,
}

impl<F: CubicFamily> CubicEos<F> {
    /// Equation of state with quadratic mixing.
    pub fn new(family: F) -> Self {
        Self {
            family,
            mixing_rule: MixingRule::default(),
            gas_constant: GAS_CONSTANT,
        }
    }

    pub fn with_mixing_rule(mut self, mixing_rule: MixingRule) -> Self {
        self.mixing_rule = mixing_rule;
        self
    }

    pub fn with_gas_constant(mut self, gas_constant: f64) -> Self {
        self.gas_constant = gas_constant;
        self
    }

    pub fn family(&self) -> &F {
        &self.family
    }

    pub fn mixing_rule(&self) -> MixingRule {
        self.mixing_rule
    }

    pub fn gas_constant(&self) -> f64 {
        self.gas_constant
    }

    /// Evaluate all temperature dependent quantities of `components` at (T, p).
    pub fn system(
        &self,
        components: &[Arc<Component>],
        bip: &dyn BinaryInteractionSource,
        temperature: f64,
        pressure: f64,
    ) -> EosResult<CubicSystem<'_, F>> {
        CubicSystem::new(self, components, bip, temperature, pressure)
    }
}

impl<F: CubicFamily> fmt::Display for CubicEos<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CubicEos(family={}, mixing_rule={}, R={})",
            self.family.name(),
            self.mixing_rule,
            self.gas_constant
        )
    }
}

/// Equation of state evaluated for a list of components at fixed (T, p).
///
/// Pure component coefficients and the binary matrix do not depend on
/// composition and are shared by all phases of a flash iteration.
#[derive(Debug)]
pub struct CubicSystem<'a, F> {
    eos: &'a CubicEos<F>,
    pub temperature: f64,
    pub pressure: f64,
    pure: PureCoefficients,
    bip: BinaryMatrix,
}

impl<'a, F: CubicFamily> CubicSystem<'a, F> {
    pub fn new(
        eos: &'a CubicEos<F>,
        components: &[Arc<Component>],
        bip: &dyn BinaryInteractionSource,
        temperature: f64,
        pressure: f64,
    ) -> EosResult<Self> {
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(EosError::InvalidState(
                String::from("CubicSystem"),
                String::from("T"),
                temperature,
            ));
        }
        if !(pressure.is_finite() && pressure > 0.0) {
            return Err(EosError::InvalidState(
                String::from("CubicSystem"),
                String::from("p"),
                pressure,
            ));
        }
        let pure = eos
            .family
            .pure_coefficients(temperature, eos.gas_constant, components)?;
        pure.validate(components.len())?;
        Ok(Self {
            eos,
            temperature,
            pressure,
            pure,
            bip: bip.binary_matrix(components, eos.family.name()),
        })
    }

    pub fn components(&self) -> usize {
        self.pure.components()
    }

    pub fn pure_coefficients(&self) -> &PureCoefficients {
        &self.pure
    }

    pub fn binary_matrix(&self) -> &BinaryMatrix {
        &self.bip
    }

    fn check_components(&self, molefracs: &Array1<f64>) -> EosResult<()> {
        if molefracs.len() != self.components() {
            return Err(EosError::IncompatibleComponents(
                self.components(),
                molefracs.len(),
            ));
        }
        Ok(())
    }

    pub fn mixture_coefficients(&self, molefracs: &Array1<f64>) -> MixtureCoefficients {
        self.eos
            .mixing_rule
            .combine(molefracs, &self.pure, self.bip.k_ij())
    }

    /// Mixture scalars {a, b, δ, ε} for a phase composition.
    pub fn eos_parameters(&self, molefracs: &Array1<f64>) -> EosResult<EosParameters> {
        self.check_components(molefracs)?;
        let mixture = self.mixture_coefficients(molefracs);
        let (delta, epsilon) = self.eos.family.shape_parameters(&mixture);
        Ok(EosParameters::new(mixture.a, mixture.b, delta, epsilon))
    }

    pub fn roots(&self, molefracs: &Array1<f64>) -> EosResult<ZRoots> {
        solve_z(
            &self.eos_parameters(molefracs)?,
            self.temperature,
            self.pressure,
            self.eos.gas_constant,
        )
    }

    /// Root and fugacity coefficients of a phase with the given composition.
    pub fn phase(&self, molefracs: &Array1<f64>, kind: PhaseKind) -> EosResult<PhaseState> {
        let root = self.roots(molefracs)?.root(kind);
        let ln_phi = self.ln_phi(molefracs, root)?;
        Ok(PhaseState {
            root,
            molefracs: molefracs.clone(),
            ln_phi,
        })
    }

    /// Logarithmic fugacity coefficients at a given root.
    pub fn ln_phi(&self, molefracs: &Array1<f64>, root: PhaseRoot) -> EosResult<Array1<f64>> {
        self.check_components(molefracs)?;
        let mixture = self.mixture_coefficients(molefracs);
        let input = FugacityInput {
            root,
            molefracs,
            pure: &self.pure,
            mixture: &mixture,
            k_ij: self.bip.k_ij(),
            mixing_rule: self.eos.mixing_rule,
            temperature: self.temperature,
            pressure: self.pressure,
            gas_constant: self.eos.gas_constant,
        };
        self.eos.family.ln_phi(&input)
    }
}

/// A phase at fixed (T, p): root, composition and fugacity coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseState {
    pub root: PhaseRoot,
    pub molefracs: Array1<f64>,
    pub ln_phi: Array1<f64>,
}

impl PhaseState {
    pub fn fugacity_coefficients(&self) -> Array1<f64> {
        self.ln_phi.mapv(f64::exp)
    }

    /// Fugacities xᵢφᵢp in Pa.
    pub fn fugacities(&self, pressure: f64) -> Array1<f64> {
        &self.molefracs * &self.fugacity_coefficients() * pressure
    }
}
