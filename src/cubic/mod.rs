//! Two-constant cubic equations of state and the Patel-Teja family.
use alpha::{Alpha, AlphaFunction, Constant, PengRobinson1976, PengRobinson1978, RedlichKwong, RedlichKwong1972};
use cubeos_core::fugacity::{self, FugacityInput, SchmidtWenzel};
use cubeos_core::parameter::Component;
use cubeos_core::{CubicFamily, EosResult, MixtureCoefficients, PureCoefficients};
use ndarray::Array1;
use num_dual::DualNum;
use std::f64::consts::SQRT_2;
use std::fmt;
use std::sync::Arc;

pub mod alpha;
mod patel_teja;
pub use patel_teja::PatelTeja;

/// Universal constants of the attractive denominator (v + δ₁b)(v + δ₂b).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    d1: f64,
    d2: f64,
}

impl From<(f64, f64)> for Delta {
    fn from(value: (f64, f64)) -> Self {
        Delta {
            d1: value.0,
            d2: value.1,
        }
    }
}

impl Delta {
    // Calculate universal critical constants from universal cubic parameters.
    //
    // See https://doi.org/10.1016/j.fluid.2012.05.008
    fn critical_constants(&self) -> (f64, f64) {
        let (r1, r2) = (-self.d1, -self.d2);
        let eta_c = 1.0
            / (((1.0 - r1) * (1.0 - r2).powi(2)).cbrt()
                + ((1.0 - r2) * (1.0 - r1).powi(2)).cbrt()
                + 1.0);
        let omega_a = (1.0 - eta_c * r1) * (1.0 - eta_c * r2) / (1.0 - eta_c)
            * (2.0 - eta_c * (r1 + r2))
            / (3.0 - eta_c * (1.0 + r1 + r2)).powi(2);
        let omega_b = eta_c / (3.0 - eta_c * (1.0 + r1 + r2));
        (omega_a, omega_b)
    }
}

/// A generic cubic equation of state with constant (δ₁, δ₂).
///
/// Ωa and Ωb follow from the universal constants, so that every
/// parametrization reproduces the critical point of the pure components.
#[derive(Debug, Clone)]
pub struct Cubic {
    name: String,
    delta: Delta,
    alpha: Alpha,
    omega_a: f64,
    omega_b: f64,
}

impl Cubic {
    /// Generic cubic equation of state with adjustable universal constants.
    ///
    /// `name` is the family used to look up binary interaction parameters.
    pub fn new(name: &str, delta: Delta, alpha: Alpha) -> Self {
        let (omega_a, omega_b) = delta.critical_constants();
        Self {
            name: name.to_string(),
            delta,
            alpha,
            omega_a,
            omega_b,
        }
    }

    /// Peng Robinson equation of state.
    ///
    /// Universal constants:
    /// - $\delta_1 = 1 + \sqrt{2}$
    /// - $\delta_2 = 1 - \sqrt{2}$
    ///
    /// Uses the Peng Robinson (1976) alpha function if none is supplied.
    pub fn peng_robinson(alpha: Option<Alpha>) -> Self {
        Self::new(
            "peng-robinson",
            (1.0 + SQRT_2, 1.0 - SQRT_2).into(),
            alpha.unwrap_or(PengRobinson1976.into()),
        )
    }

    /// Peng Robinson with the 1978 alpha function for heavy components.
    pub fn peng_robinson_1978() -> Self {
        Self::peng_robinson(Some(PengRobinson1978.into()))
    }

    /// Original Redlich Kwong equation of state, α = Tᵣ^(-1/2).
    ///
    /// Universal constants:
    /// - $\delta_1 = 1$
    /// - $\delta_2 = 0$
    pub fn redlich_kwong() -> Self {
        Self::new("redlich-kwong", (1.0, 0.0).into(), RedlichKwong.into())
    }

    /// Soave Redlich Kwong equation of state.
    ///
    /// Uses the Soave (1972) alpha function if none is supplied.
    pub fn soave_redlich_kwong(alpha: Option<Alpha>) -> Self {
        Self::new(
            "soave-redlich-kwong",
            (1.0, 0.0).into(),
            alpha.unwrap_or(RedlichKwong1972.into()),
        )
    }

    /// Van der Waals equation of state.
    ///
    /// Both universal constants vanish, so the fugacity coefficients
    /// use the limit of the closed form expression for u = w.
    pub fn van_der_waals() -> Self {
        Self::new("van-der-waals", (0.0, 0.0).into(), Constant.into())
    }

    /// Replace the alpha function.
    pub fn with_alpha(mut self, alpha: Alpha) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn alpha(&self) -> &Alpha {
        &self.alpha
    }

    pub fn delta(&self) -> Delta {
        self.delta
    }

    /// Universal critical constants (Ωa, Ωb).
    pub fn critical_constants(&self) -> (f64, f64) {
        (self.omega_a, self.omega_b)
    }
}

impl fmt::Display for Cubic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cubic(name={}, delta=({}, {}), alpha={})",
            self.name,
            self.delta.d1,
            self.delta.d2,
            self.alpha.name()
        )
    }
}

impl CubicFamily for Cubic {
    fn name(&self) -> &str {
        &self.name
    }

    fn pure_coefficients(
        &self,
        temperature: f64,
        gas_constant: f64,
        components: &[Arc<Component>],
    ) -> EosResult<PureCoefficients> {
        let n = components.len();
        let mut a = Array1::zeros(n);
        let mut b = Array1::zeros(n);
        for (i, c) in components.iter().enumerate() {
            self.alpha.validate(c)?;
            let r = &c.model_record;
            let alpha = self.alpha.alpha(r, temperature / r.tc);
            a[i] = self.omega_a * (gas_constant * r.tc).powi(2) / r.pc * alpha;
            b[i] = self.omega_b * gas_constant * r.tc / r.pc;
        }
        Ok(PureCoefficients::new(a, b))
    }

    fn shape_parameters<D: DualNum<f64> + Copy>(&self, mixture: &MixtureCoefficients<D>) -> (D, D) {
        let b = mixture.b;
        (b * (self.delta.d1 + self.delta.d2), b * b * (self.delta.d1 * self.delta.d2))
    }

    fn schmidt_wenzel(&self, _: &MixtureCoefficients) -> EosResult<SchmidtWenzel> {
        let (u, w) = (self.delta.d1, self.delta.d2);
        Ok(SchmidtWenzel::new(u.max(w), u.min(w)))
    }

    fn ln_phi(&self, input: &FugacityInput) -> EosResult<Array1<f64>> {
        let sw = self.schmidt_wenzel(input.mixture)?;
        if sw.is_degenerate() {
            Ok(fugacity::ln_phi_degenerate_limit(input, sw))
        } else {
            fugacity::ln_phi(input, sw)
        }
    }
}
