use cubeos_core::fugacity::{self, FugacityInput};
use cubeos_core::parameter::{Component, ComponentRecord};
use cubeos_core::roots::cubic_roots;
use cubeos_core::{CubicFamily, EosError, EosResult, MixtureCoefficients, PureCoefficients};
use ndarray::{Array1, Axis};
use num_dual::DualNum;
use std::fmt;
use std::sync::Arc;

/// Patel-Teja equation of state.
///
/// The third parameter cᵢ = Ωc RTc/Pc is combined linearly and the
/// attractive denominator reads v(v + b) + c(v - b). Each component
/// carries its own critical compressibility ζc and slope F of the
/// alpha function, either from the `patel_teja` shape data or from the
/// generalized correlations in the acentric factor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatelTeja;

impl PatelTeja {
    /// (ζc, F) of a component.
    pub fn critical_parameters(record: &ComponentRecord) -> (f64, f64) {
        record.shape.patel_teja.map_or_else(
            || {
                let w = record.acentric_factor;
                (
                    0.329032 + w * (-0.076799 + w * 0.0211947),
                    0.452413 + w * (1.30982 - w * 0.295937),
                )
            },
            |[zeta_c, f]| (zeta_c, f),
        )
    }

    /// (Ωa, Ωb, Ωc) for a critical compressibility ζc.
    pub fn omega(zeta_c: f64) -> EosResult<(f64, f64, f64)> {
        let omega_b = cubic_roots(2.0 - 3.0 * zeta_c, 3.0 * zeta_c.powi(2), -zeta_c.powi(3))
            .iter()
            .filter(|&r| r > 0.0)
            .reduce(f64::min)
            .ok_or_else(|| {
                EosError::InvalidInput(
                    String::from("PatelTeja"),
                    format!("no positive Ωb for ζc = {zeta_c}"),
                )
            })?;
        let omega_c = 1.0 - 3.0 * zeta_c;
        let omega_a =
            3.0 * zeta_c.powi(2) + 3.0 * (1.0 - 2.0 * zeta_c) * omega_b + omega_b.powi(2) + omega_c;
        Ok((omega_a, omega_b, omega_c))
    }
}

impl fmt::Display for PatelTeja {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PatelTeja")
    }
}

impl CubicFamily for PatelTeja {
    fn name(&self) -> &str {
        "patel-teja"
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
        let mut c = Array1::zeros(n);
        for (i, component) in components.iter().enumerate() {
            let r = &component.model_record;
            let (zeta_c, f) = Self::critical_parameters(r);
            let (omega_a, omega_b, omega_c) = Self::omega(zeta_c)?;
            let alpha = (1.0 + f * (1.0 - (temperature / r.tc).sqrt())).powi(2);
            let rtc_pc = gas_constant * r.tc / r.pc;
            a[i] = omega_a * gas_constant * r.tc * rtc_pc * alpha;
            b[i] = omega_b * rtc_pc;
            c[i] = omega_c * rtc_pc;
        }
        Ok(PureCoefficients::new(a, b).with_extra(c.insert_axis(Axis(1))))
    }

    fn shape_parameters<D: DualNum<f64> + Copy>(&self, mixture: &MixtureCoefficients<D>) -> (D, D) {
        let b = mixture.b;
        let c = mixture.extra.first().copied().unwrap_or(D::zero());
        (b + c, -b * c)
    }

    /// The ratio c/b changes with composition, so the closed form is not
    /// exact for mixtures.
    fn ln_phi(&self, input: &FugacityInput) -> EosResult<Array1<f64>> {
        fugacity::ln_phi_helmholtz(input, |m| self.shape_parameters(m))
    }
}
