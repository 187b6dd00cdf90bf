use super::{
    k_values, normalize, phase_compositions, rachford_rice, single_phase, wilson_k_values,
    FlashResult, FlashStatus, PhaseSplit,
};
use crate::cubic::PhaseKind;
use crate::errors::EosResult;
use crate::family::{CubicEos, CubicFamily, CubicSystem};
use crate::mixture::Mixture;
use crate::parameter::BinaryInteractionSource;
use crate::SolverOptions;
use ndarray::{Array1, Zip};
use std::sync::Arc;

const MAX_ITER_TP: usize = 400;
const TOL_TP: f64 = 1e-12;
const TOL_VAPOR_FRACTION: f64 = 1e-15;
const TRIVIAL_TOL: f64 = 1e-8;

/// Two-phase flash at fixed temperature and pressure.
///
/// The solver is initialized with Wilson K-values. If the Rachford-Rice
/// objective does not change its sign on [0, 1] and the cubic has a single
/// root at the feed, the feed is reported as a single phase without
/// iterating. With a liquid and a vapor root, the K-values φᴸ/φⱽ of both roots
/// at the feed composition replace the Wilson estimate: they either confirm
/// a single phase (for a pure component the one with the lower Gibbs energy)
/// or start the iteration. The K-values are refined by successive
/// substitution with the fugacity coefficients of both phases.
#[derive(Clone)]
pub struct FlashSolver<F> {
    eos: Arc<CubicEos<F>>,
    bip: Arc<dyn BinaryInteractionSource>,
    options: SolverOptions,
}

impl<F: CubicFamily> FlashSolver<F> {
    pub fn new(eos: Arc<CubicEos<F>>, bip: Arc<dyn BinaryInteractionSource>) -> Self {
        Self {
            eos,
            bip,
            options: SolverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn eos(&self) -> &Arc<CubicEos<F>> {
        &self.eos
    }

    pub fn options(&self) -> SolverOptions {
        self.options
    }

    pub(crate) fn system(
        &self,
        mixture: &Mixture,
        temperature: f64,
        pressure: f64,
    ) -> EosResult<CubicSystem<'_, F>> {
        self.eos
            .system(mixture.components(), self.bip.as_ref(), temperature, pressure)
    }

    /// Flash the mixture at (T, p).
    ///
    /// Failures are reported by the status of the result.
    pub fn evaluate(&self, mixture: &Mixture, temperature: f64, pressure: f64) -> FlashResult {
        self.flash(mixture, temperature, pressure)
            .unwrap_or_else(|e| {
                log_result!(self.options.verbosity, "Tp flash: {}", e);
                FlashResult::failure(mixture.molefracs(), temperature, pressure, &e)
            })
    }

    /// Flash the mixture at (T, p) and return an error unless the calculation converged.
    pub fn tp_flash(
        &self,
        mixture: &Mixture,
        temperature: f64,
        pressure: f64,
    ) -> EosResult<FlashResult> {
        self.flash(mixture, temperature, pressure)?.into_result()
    }

    /// Flash the mixture at many (T, p) points.
    #[cfg(not(feature = "rayon"))]
    pub fn evaluate_many(&self, mixture: &Mixture, conditions: &[(f64, f64)]) -> Vec<FlashResult> {
        conditions
            .iter()
            .map(|&(t, p)| self.evaluate(mixture, t, p))
            .collect()
    }

    /// Flash the mixture at many (T, p) points in parallel.
    #[cfg(feature = "rayon")]
    pub fn evaluate_many(&self, mixture: &Mixture, conditions: &[(f64, f64)]) -> Vec<FlashResult> {
        use rayon::prelude::*;
        conditions
            .par_iter()
            .map(|&(t, p)| self.evaluate(mixture, t, p))
            .collect()
    }

    fn flash(&self, mixture: &Mixture, temperature: f64, pressure: f64) -> EosResult<FlashResult> {
        let (max_iter, tol, verbosity) = self.options.unwrap_or(MAX_ITER_TP, TOL_TP);
        let system = self.system(mixture, temperature, pressure)?;
        let feed = mixture.molefracs();

        // initialization
        let mut k = wilson_k_values(
            temperature,
            pressure,
            &mixture.tc(),
            &mixture.pc(),
            &mixture.acentric_factor(),
        );
        if single_phase(feed, &k).is_some() {
            // with more than one root, the K-values of both roots at the feed decide
            let roots = system.roots(feed)?;
            if !roots.is_single() {
                let liquid = system.ln_phi(feed, roots.liquid())?;
                let vapor = system.ln_phi(feed, roots.vapor())?;
                k = (liquid - vapor).mapv(f64::exp);
            }
            if let Some(kind) = single_phase(feed, &k) {
                log_result!(
                    verbosity,
                    "Tp flash: single {} phase from the initial K-values\n",
                    kind
                );
                return single_phase_result(&system, feed, &k, kind, 0);
            }
        }

        log_iter!(
            verbosity,
            " iter |    residual    |  vapor fraction  |  liquid mole fractions  |  vapor mole fractions  "
        );
        log_iter!(verbosity, "{:-<95}", "");

        let mut vapor_fraction = 0.5;
        let mut previous: Option<f64> = None;
        let mut bound: Option<PhaseKind> = None;
        let mut last = None;
        for iteration in 1..=max_iter {
            // vapor fraction, clamped to [0, 1] if the K-values indicate a single phase
            let split = single_phase(feed, &k);
            vapor_fraction = match split {
                Some(PhaseKind::Liquid) => 0.0,
                Some(PhaseKind::Vapor) => 1.0,
                None => rachford_rice(feed, &k, Some(vapor_fraction))?,
            };
            if let Some(kind) = split.filter(|&s| bound == Some(s)) {
                log_result!(
                    verbosity,
                    "Tp flash: single {} phase after {} step(s)\n",
                    kind,
                    iteration
                );
                return single_phase_result(&system, feed, &k, kind, iteration);
            }
            bound = split;

            let (x, y) = phase_compositions(feed, &k, vapor_fraction);
            let liquid = system.phase(&x, PhaseKind::Liquid)?;
            let vapor = system.phase(&y, PhaseKind::Vapor)?;

            // check for convergence
            let residual = fugacity_residual(&liquid.fugacities(pressure), &vapor.fugacities(pressure));
            let dq = previous.map_or(f64::INFINITY, |q| (vapor_fraction - q).powi(2));
            log_iter!(
                verbosity,
                " {:4} | {:14.8e} | {:16.12} | {:.8} | {:.8}",
                iteration,
                residual,
                vapor_fraction,
                x,
                y
            );
            let k_new = (&liquid.ln_phi - &vapor.ln_phi).mapv(f64::exp);
            let result = FlashResult {
                status: FlashStatus::NotConverged,
                phase: Some(PhaseSplit::TwoPhase),
                temperature,
                pressure,
                feed: feed.clone(),
                vapor_fraction,
                z_liquid: Some(liquid.root.z),
                z_vapor: Some(vapor.root.z),
                k_values: k_values(&x, &y, &k),
                liquid_molefracs: x,
                vapor_molefracs: y,
                iterations: iteration,
                message: None,
            };

            if residual < tol && dq < TOL_VAPOR_FRACTION {
                log_result!(
                    verbosity,
                    "Tp flash: calculation converged in {} step(s)\n",
                    iteration
                );
                return Ok(FlashResult {
                    status: FlashStatus::Converged,
                    ..result
                });
            }

            // both phases collapsed onto the feed
            if k_new.iter().all(|k| k.ln().abs() < TRIVIAL_TOL) {
                log_result!(
                    verbosity,
                    "Tp flash: trivial solution after {} step(s)\n",
                    iteration
                );
                let kind = if vapor_fraction >= 0.5 {
                    PhaseKind::Vapor
                } else {
                    PhaseKind::Liquid
                };
                return trivial_result(&system, feed, kind, iteration);
            }

            previous = Some(vapor_fraction);
            k = k_new;
            last = Some(result);
        }

        log_result!(
            verbosity,
            "Tp flash: not converged in {} step(s)\n",
            max_iter
        );
        let result = last.unwrap_or_else(|| FlashResult {
            status: FlashStatus::NotConverged,
            phase: Some(PhaseSplit::TwoPhase),
            temperature,
            pressure,
            feed: feed.clone(),
            vapor_fraction,
            z_liquid: None,
            z_vapor: None,
            liquid_molefracs: feed.clone(),
            vapor_molefracs: feed.clone(),
            k_values: k,
            iterations: 0,
            message: None,
        });
        Ok(FlashResult {
            message: Some(FlashStatus::NotConverged.to_string()),
            ..result
        })
    }
}

/// Σ |f_L/f_V - 1| over all components present in the feed.
fn fugacity_residual(f_liquid: &Array1<f64>, f_vapor: &Array1<f64>) -> f64 {
    Zip::from(f_liquid).and(f_vapor).fold(0.0, |acc, &fl, &fv| {
        if fv > 0.0 {
            acc + (fl / fv - 1.0).abs()
        } else {
            acc
        }
    })
}

/// Single phase with the composition of the incipient phase.
fn single_phase_result<F: CubicFamily>(
    system: &CubicSystem<'_, F>,
    feed: &Array1<f64>,
    k: &Array1<f64>,
    kind: PhaseKind,
    iterations: usize,
) -> EosResult<FlashResult> {
    let root = system.roots(feed)?.root(kind);
    let (vapor_fraction, x, y) = match kind {
        PhaseKind::Vapor => (1.0, normalize(feed / k), feed.clone()),
        PhaseKind::Liquid => (0.0, feed.clone(), normalize(feed * k)),
    };
    let (z_liquid, z_vapor) = match kind {
        PhaseKind::Liquid => (Some(root.z), None),
        PhaseKind::Vapor => (None, Some(root.z)),
    };
    Ok(FlashResult {
        status: FlashStatus::Converged,
        phase: Some(kind.into()),
        temperature: system.temperature,
        pressure: system.pressure,
        feed: feed.clone(),
        vapor_fraction,
        z_liquid,
        z_vapor,
        k_values: k_values(&x, &y, k),
        liquid_molefracs: x,
        vapor_molefracs: y,
        iterations,
        message: None,
    })
}

/// Single phase with x = y = z.
fn trivial_result<F: CubicFamily>(
    system: &CubicSystem<'_, F>,
    feed: &Array1<f64>,
    kind: PhaseKind,
    iterations: usize,
) -> EosResult<FlashResult> {
    let k = Array1::ones(feed.len());
    let mut result = single_phase_result(system, feed, &k, kind, iterations)?;
    result.k_values = k;
    Ok(result)
}
