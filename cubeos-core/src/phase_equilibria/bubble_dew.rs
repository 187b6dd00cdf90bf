use super::{normalize, FlashSolver};
use crate::cubic::PhaseKind;
use crate::errors::{EosError, EosResult};
use crate::family::{CubicFamily, PhaseState};
use crate::mixture::Mixture;
use ndarray::{Array1, Zip};
use std::fmt;

const MAX_ITER_BUBBLE_DEW: usize = 200;
const TOL_BUBBLE_DEW: f64 = 1e-12;
const TRIVIAL_TOL: f64 = 1e-6;

/// Saturated state at the bubble or dew point of a mixture.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleDewPoint {
    pub temperature: f64,
    pub pressure: f64,
    pub liquid_molefracs: Array1<f64>,
    pub vapor_molefracs: Array1<f64>,
    pub z_liquid: f64,
    pub z_vapor: f64,
    pub k_values: Array1<f64>,
    pub iterations: usize,
}

impl fmt::Display for BubbleDewPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BubbleDewPoint(T={} K, p={} Pa, x={:.8}, y={:.8})",
            self.temperature, self.pressure, self.liquid_molefracs, self.vapor_molefracs
        )
    }
}

/// Which of the two phase compositions is specified.
#[derive(Clone, Copy, PartialEq)]
enum SaturationPoint {
    Bubble,
    Dew,
}

impl fmt::Display for SaturationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bubble => write!(f, "bubble point"),
            Self::Dew => write!(f, "dew point"),
        }
    }
}

/// # Bubble and dew points
impl<F: CubicFamily> FlashSolver<F> {
    /// Pressure at which the liquid `mixture` starts to boil at `temperature`.
    pub fn bubble_point_pressure(&self, mixture: &Mixture, temperature: f64) -> EosResult<BubbleDewPoint> {
        self.bubble_dew_point(mixture, temperature, SaturationPoint::Bubble)
    }

    /// Pressure at which the vapor `mixture` starts to condense at `temperature`.
    pub fn dew_point_pressure(&self, mixture: &Mixture, temperature: f64) -> EosResult<BubbleDewPoint> {
        self.bubble_dew_point(mixture, temperature, SaturationPoint::Dew)
    }

    fn bubble_dew_point(
        &self,
        mixture: &Mixture,
        temperature: f64,
        point: SaturationPoint,
    ) -> EosResult<BubbleDewPoint> {
        let (max_iter, tol, verbosity) = self.options().unwrap_or(MAX_ITER_BUBBLE_DEW, TOL_BUBBLE_DEW);
        let molefracs = mixture.molefracs();

        // Wilson estimate of the pressure
        let p_wilson = Zip::from(&mixture.tc())
            .and(&mixture.pc())
            .and(&mixture.acentric_factor())
            .map_collect(|&tc, &pc, &omega| {
                pc * (5.37 * (1.0 + omega) * (1.0 - tc / temperature)).exp()
            });
        let mut pressure = match point {
            SaturationPoint::Bubble => molefracs.dot(&p_wilson),
            SaturationPoint::Dew => 1.0 / (molefracs / &p_wilson).sum(),
        };
        let mut k = &p_wilson / pressure;

        let mut system = self.system(mixture, temperature, pressure)?;
        log_iter!(verbosity, " iter |    residual    |    pressure    |  incipient phase  ");
        log_iter!(verbosity, "{:-<60}", "");
        for iteration in 1..=max_iter {
            system.pressure = pressure;
            let incipient = incipient_phase(molefracs, &k, point);
            let (x, y) = match point {
                SaturationPoint::Bubble => (molefracs.clone(), incipient),
                SaturationPoint::Dew => (incipient, molefracs.clone()),
            };
            let liquid = system.phase(&x, PhaseKind::Liquid)?;
            let vapor = system.phase(&y, PhaseKind::Vapor)?;
            check_trivial(&liquid, &vapor).inspect_err(|_| {
                log_result!(verbosity, "{}: trivial solution in step {}", point, iteration)
            })?;

            k = (&liquid.ln_phi - &vapor.ln_phi).mapv(f64::exp);
            let sum = match point {
                SaturationPoint::Bubble => molefracs.dot(&k),
                SaturationPoint::Dew => (molefracs / &k).sum(),
            };
            pressure = match point {
                SaturationPoint::Bubble => pressure * sum,
                SaturationPoint::Dew => pressure / sum,
            };
            let residual = (sum - 1.0).abs();
            log_iter!(
                verbosity,
                " {:4} | {:14.8e} | {:14.6} | {:.8}",
                iteration,
                residual,
                pressure,
                incipient_phase(molefracs, &k, point)
            );

            if !pressure.is_finite() || pressure <= 0.0 {
                return Err(EosError::IterationFailed(point.to_string()));
            }
            if residual < tol {
                log_result!(
                    verbosity,
                    "{}: calculation converged in {} step(s)\n",
                    point,
                    iteration
                );
                let incipient = incipient_phase(molefracs, &k, point);
                let (x, y) = match point {
                    SaturationPoint::Bubble => (molefracs.clone(), incipient),
                    SaturationPoint::Dew => (incipient, molefracs.clone()),
                };
                // roots and fugacities belong to the pressure of this step
                return Ok(BubbleDewPoint {
                    temperature,
                    pressure: system.pressure,
                    k_values: &y / &x,
                    liquid_molefracs: x,
                    vapor_molefracs: y,
                    z_liquid: liquid.root.z,
                    z_vapor: vapor.root.z,
                    iterations: iteration,
                });
            }
        }
        log_result!(verbosity, "{}: not converged in {} step(s)\n", point, max_iter);
        Err(EosError::NotConverged(point.to_string()))
    }
}

/// Kx/ΣKx at a bubble point, (y/K)/Σ(y/K) at a dew point.
fn incipient_phase(molefracs: &Array1<f64>, k: &Array1<f64>, point: SaturationPoint) -> Array1<f64> {
    match point {
        SaturationPoint::Bubble => normalize(molefracs * k),
        SaturationPoint::Dew => normalize(molefracs / k),
    }
}

/// Both phases found the same root and the same composition.
fn check_trivial(liquid: &PhaseState, vapor: &PhaseState) -> EosResult<()> {
    let dz = (liquid.root.z - vapor.root.z).abs() / vapor.root.z;
    let dx = (&liquid.molefracs - &vapor.molefracs)
        .mapv(f64::abs)
        .fold(0.0, |acc: f64, &d| acc.max(d));
    if dz < TRIVIAL_TOL && dx < TRIVIAL_TOL {
        return Err(EosError::TrivialSolution);
    }
    Ok(())
}
