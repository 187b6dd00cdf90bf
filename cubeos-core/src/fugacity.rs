//! Fugacity coefficients of the generalized cubic equation of state.
//!
//! For families with constant (u, w) the closed form
//!
//! $$\ln\varphi_i = \frac{b_i}{b}(Z-1) - \ln(Z-B') + \frac{A'}{B'(u-w)}\left(\frac{b_i}{b} - \frac{\bar a_i}{a}\right)\ln\frac{Z+uB'}{Z+wB'}$$
//!
//! is used, with the partial attraction $\bar a_i = \frac{1}{n}\frac{\partial n^2a}{\partial n_i}$
//! of the selected mixing rule. Families whose denominator depends on
//! composition through additional coefficients use the derivative of the
//! residual Helmholtz energy instead.
use crate::cubic::PhaseRoot;
use crate::errors::{EosError, EosResult};
use crate::mixing_rules::{MixingRule, MixtureCoefficients, PureCoefficients};
use ndarray::{Array1, Array2, Zip};
use num_dual::{first_derivative, Dual64, DualNum};

const DEGENERATE_TOL: f64 = 1e-10;

/// Roots (u, w) of the attractive denominator, v² + δv + ε = (v + ub)(v + wb).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchmidtWenzel {
    pub u: f64,
    pub w: f64,
}

impl SchmidtWenzel {
    pub fn new(u: f64, w: f64) -> Self {
        Self { u, w }
    }

    /// Convert from the notation v² + s·bv + p·b², e.g. (2, -1) for Peng-Robinson.
    pub fn from_sum_product(sum: f64, product: f64) -> EosResult<Self> {
        let discriminant = sum * sum - 4.0 * product;
        if discriminant < 0.0 {
            return Err(EosError::InvalidInput(
                String::from("SchmidtWenzel"),
                format!("v² + {sum}bv + {product}b² has no real factorization"),
            ));
        }
        let sqrt = discriminant.sqrt();
        Ok(Self::new(0.5 * (sum + sqrt), 0.5 * (sum - sqrt)))
    }

    /// Constants of a mixture with co-volume `b` and denominator coefficients δ, ε.
    pub fn from_shape(delta: f64, epsilon: f64, b: f64) -> EosResult<Self> {
        Self::from_sum_product(delta / b, epsilon / (b * b))
    }

    pub fn is_degenerate(&self) -> bool {
        (self.u - self.w).abs() < DEGENERATE_TOL
    }
}

/// Everything needed to evaluate the fugacity coefficients of one phase.
#[derive(Debug, Clone, Copy)]
pub struct FugacityInput<'a> {
    pub root: PhaseRoot,
    pub molefracs: &'a Array1<f64>,
    pub pure: &'a PureCoefficients,
    pub mixture: &'a MixtureCoefficients,
    pub k_ij: &'a Array2<f64>,
    pub mixing_rule: MixingRule,
    pub temperature: f64,
    pub pressure: f64,
    pub gas_constant: f64,
}

impl FugacityInput<'_> {
    fn partial_attraction(&self) -> Array1<f64> {
        self.mixing_rule
            .partial_attraction(self.molefracs, &self.pure.a, self.k_ij)
    }

    fn ln_phi_with<F>(&self, log_term: F) -> Array1<f64>
    where
        F: Fn(f64, f64) -> f64,
    {
        let z = self.root.z;
        let b_mix = self.root.groups.b;
        let (a, b) = (self.mixture.a, self.mixture.b);
        let ln_free = (z - b_mix).ln();
        Zip::from(&self.pure.b)
            .and(&self.partial_attraction())
            .map_collect(|&bi, &ai| bi / b * (z - 1.0) - ln_free + log_term(bi / b, ai / a))
    }
}

/// Logarithmic fugacity coefficients from the closed form expression.
pub fn ln_phi(input: &FugacityInput, sw: SchmidtWenzel) -> EosResult<Array1<f64>> {
    if sw.is_degenerate() {
        return Err(EosError::DegenerateFormulation(String::from("ln_phi")));
    }
    let (z, g) = (input.root.z, input.root.groups);
    let log = g.a / (g.b * (sw.u - sw.w)) * ((z + sw.u * g.b) / (z + sw.w * g.b)).ln();
    Ok(input.ln_phi_with(|b_ratio, a_ratio| (b_ratio - a_ratio) * log))
}

/// Limit of the closed form for u = w.
pub fn ln_phi_degenerate_limit(input: &FugacityInput, sw: SchmidtWenzel) -> Array1<f64> {
    let (z, g) = (input.root.z, input.root.groups);
    let limit = g.a / (z + sw.u * g.b);
    input.ln_phi_with(|b_ratio, a_ratio| (b_ratio - a_ratio) * limit)
}

/// Fugacity coefficients from the closed form expression.
pub fn fugacity_coefficients(input: &FugacityInput, sw: SchmidtWenzel) -> EosResult<Array1<f64>> {
    Ok(ln_phi(input, sw)?.mapv(f64::exp))
}

/// Logarithmic fugacity coefficients as derivatives of the residual Helmholtz energy.
///
/// With the molar volume v of the phase and d = √(δ² - 4ε),
///
/// $$\frac{A^\mathrm{res}}{RT} = n\left[\ln\frac{v}{v-b} - \frac{a}{RTd}\ln\frac{v+(\delta+d)/2}{v+(\delta-d)/2}\right]$$
///
/// is differentiated with respect to the mole numbers at constant total
/// volume. `shape` maps the mixture coefficients to (δ, ε).
pub fn ln_phi_helmholtz<S>(input: &FugacityInput, shape: S) -> EosResult<Array1<f64>>
where
    S: Fn(&MixtureCoefficients<Dual64>) -> (Dual64, Dual64),
{
    let n = input.molefracs.len();
    let (t, p, r) = (input.temperature, input.pressure, input.gas_constant);
    let rt = r * t;
    let volume = input.root.molar_volume(t, p, r);

    let mixture = |x: &Array1<Dual64>| input.mixing_rule.combine_dual(x, input.pure, input.k_ij);
    let (delta, epsilon) = shape(&mixture(&input.molefracs.mapv(Dual64::from)));
    if delta.re().powi(2) - 4.0 * epsilon.re() <= 0.0 {
        return Err(EosError::DegenerateFormulation(String::from(
            "ln_phi_helmholtz",
        )));
    }

    let ln_z = input.root.z.ln();
    let mut res = Array1::zeros(n);
    for i in 0..n {
        let (_, da) = first_derivative(
            |ni: Dual64| {
                let moles = Array1::from_shape_fn(n, |j| {
                    if j == i {
                        ni
                    } else {
                        Dual64::from(input.molefracs[j])
                    }
                });
                let total = moles.sum();
                let m = mixture(&moles.mapv(|nj| nj / total));
                let (delta, epsilon) = shape(&m);
                let v = total.recip() * volume;
                let d = (delta * delta - epsilon * 4.0).sqrt();
                let (r1, r2) = ((delta + d) * 0.5, (delta - d) * 0.5);
                total * ((v / (v - m.b)).ln() - m.a / (d * rt) * ((v + r1) / (v + r2)).ln())
            },
            input.molefracs[i],
        );
        res[i] = da - ln_z;
    }
    if res.iter().any(|l| !l.is_finite()) {
        return Err(EosError::IterationFailed(String::from("ln_phi_helmholtz")));
    }
    Ok(res)
}
