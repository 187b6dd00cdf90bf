//! Vapor-liquid equilibria of cubic equations of state.
use crate::cubic::PhaseKind;
use crate::errors::{EosError, EosResult};
use crate::roots::bracketed_newton;
use ndarray::{Array1, Zip};
use num_dual::{Dual64, DualNum};
use std::fmt;

mod bubble_dew;
mod tp_flash;
pub use bubble_dew::BubbleDewPoint;
pub use tp_flash::FlashSolver;

const MAX_ITER_RR: usize = 100;
const TOL_RR: f64 = 1e-15;

/// Outcome of a flash calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashStatus {
    Converged,
    NotConverged,
    NoPhysicalRoot,
    InvalidInput,
    DegenerateFormulation,
    Failed,
}

impl From<&EosError> for FlashStatus {
    fn from(error: &EosError) -> Self {
        match error {
            EosError::InvalidInput(..)
            | EosError::InvalidState(..)
            | EosError::IncompatibleComponents(..)
            | EosError::ParameterError(_) => Self::InvalidInput,
            EosError::NoPhysicalRoot(..) => Self::NoPhysicalRoot,
            EosError::NotConverged(_) => Self::NotConverged,
            EosError::DegenerateFormulation(_) => Self::DegenerateFormulation,
            _ => Self::Failed,
        }
    }
}

impl fmt::Display for FlashStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged => write!(f, "converged"),
            Self::NotConverged => write!(f, "no converged phase split at this (T, P)"),
            Self::NoPhysicalRoot => write!(f, "outside physically meaningful equation-of-state range"),
            Self::InvalidInput => write!(f, "invalid input"),
            Self::DegenerateFormulation => write!(f, "degenerate equation of state formulation"),
            Self::Failed => write!(f, "inner root-find failed at this (T, P)"),
        }
    }
}

/// Number and kind of phases present at equilibrium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseSplit {
    TwoPhase,
    Vapor,
    Liquid,
}

impl From<PhaseKind> for PhaseSplit {
    fn from(kind: PhaseKind) -> Self {
        match kind {
            PhaseKind::Liquid => Self::Liquid,
            PhaseKind::Vapor => Self::Vapor,
        }
    }
}

/// Result of a flash calculation at fixed temperature, pressure and feed composition.
///
/// Single phase results carry the composition of the incipient phase, so
/// that both compositions are normalized and the K-values are y/x for every
/// result. Failed calculations contain the feed composition in both phases
/// and a vapor fraction of NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct FlashResult {
    pub status: FlashStatus,
    /// `None` if the calculation failed
    pub phase: Option<PhaseSplit>,
    pub temperature: f64,
    pub pressure: f64,
    pub feed: Array1<f64>,
    pub vapor_fraction: f64,
    pub z_liquid: Option<f64>,
    pub z_vapor: Option<f64>,
    pub liquid_molefracs: Array1<f64>,
    pub vapor_molefracs: Array1<f64>,
    pub k_values: Array1<f64>,
    pub iterations: usize,
    /// error message of failed calculations
    pub message: Option<String>,
}

impl FlashResult {
    pub(crate) fn failure(feed: &Array1<f64>, temperature: f64, pressure: f64, error: &EosError) -> Self {
        Self {
            status: error.into(),
            phase: None,
            temperature,
            pressure,
            feed: feed.clone(),
            vapor_fraction: f64::NAN,
            z_liquid: None,
            z_vapor: None,
            liquid_molefracs: feed.clone(),
            vapor_molefracs: feed.clone(),
            k_values: Array1::ones(feed.len()),
            iterations: 0,
            message: Some(error.to_string()),
        }
    }

    pub fn is_converged(&self) -> bool {
        self.status == FlashStatus::Converged
    }

    pub fn is_two_phase(&self) -> bool {
        self.phase == Some(PhaseSplit::TwoPhase)
    }

    /// Turn any status other than [FlashStatus::Converged] into an error.
    pub fn into_result(self) -> EosResult<Self> {
        match self.status {
            FlashStatus::Converged => Ok(self),
            FlashStatus::NotConverged => Err(EosError::NotConverged(String::from("Tp flash"))),
            FlashStatus::NoPhysicalRoot => {
                Err(EosError::NoPhysicalRoot(self.temperature, self.pressure))
            }
            FlashStatus::InvalidInput => {
                let message = self.message.unwrap_or_else(|| self.status.to_string());
                Err(EosError::InvalidInput(String::from("Tp flash"), message))
            }
            FlashStatus::DegenerateFormulation => {
                Err(EosError::DegenerateFormulation(String::from("Tp flash")))
            }
            FlashStatus::Failed => Err(EosError::IterationFailed(String::from("Tp flash"))),
        }
    }
}

impl fmt::Display for FlashResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FlashResult(status={}, T={} K, p={} Pa",
            self.status, self.temperature, self.pressure
        )?;
        if let Some(phase) = self.phase {
            write!(f, ", phase={:?}", phase)?;
        }
        write!(
            f,
            ", q={:.8}, x={:.8}, y={:.8}, iterations={})",
            self.vapor_fraction, self.liquid_molefracs, self.vapor_molefracs, self.iterations
        )
    }
}

/// Wilson estimate of the K-values, Kᵢ = (p_cᵢ/p)exp(5.37(1 + ωᵢ)(1 - T_cᵢ/T)).
pub fn wilson_k_values(
    temperature: f64,
    pressure: f64,
    tc: &Array1<f64>,
    pc: &Array1<f64>,
    acentric_factor: &Array1<f64>,
) -> Array1<f64> {
    Zip::from(tc)
        .and(pc)
        .and(acentric_factor)
        .map_collect(|&tc, &pc, &omega| {
            pc / pressure * (5.37 * (1.0 + omega) * (1.0 - tc / temperature)).exp()
        })
}

/// Rachford-Rice objective g(q) = Σ zᵢ(Kᵢ - 1)/(1 + q(Kᵢ - 1)).
///
/// g is monotonically decreasing in q. g(0) ≤ 0 indicates a subcooled
/// liquid, g(1) ≥ 0 a superheated vapor.
pub fn rachford_rice_objective(feed: &Array1<f64>, k: &Array1<f64>, vapor_fraction: f64) -> f64 {
    Zip::from(feed)
        .and(k)
        .fold(0.0, |acc, &z, &k| acc + z * (k - 1.0) / (1.0 + vapor_fraction * (k - 1.0)))
}

/// Phase that is stable for the given K-values, or `None` if the feed splits.
pub(crate) fn single_phase(feed: &Array1<f64>, k: &Array1<f64>) -> Option<PhaseKind> {
    if rachford_rice_objective(feed, k, 0.0) <= 0.0 {
        Some(PhaseKind::Liquid)
    } else if rachford_rice_objective(feed, k, 1.0) >= 0.0 {
        Some(PhaseKind::Vapor)
    } else {
        None
    }
}

/// Solve the Rachford-Rice equation for the vapor fraction.
///
/// The solution has to lie in (0, 1). The search interval is narrowed such
/// that all mole fractions of both phases stay below one.
pub fn rachford_rice(feed: &Array1<f64>, k: &Array1<f64>, vapor_fraction: Option<f64>) -> EosResult<f64> {
    if single_phase(feed, k).is_some() {
        return Err(EosError::IterationFailed(String::from("rachford_rice")));
    }

    // look for tighter bounds
    let (mut q_min, mut q_max) = (0.0f64, 1.0f64);
    for (&k, &z) in k.iter().zip(feed.iter()) {
        if k > 1.0 {
            q_min = q_min.max((k * z - 1.0) / (k - 1.0));
        }
        if k < 1.0 {
            q_max = q_max.min((1.0 - z) / (1.0 - k));
        }
    }

    let objective = |q: Dual64| {
        Zip::from(feed).and(k).fold(Dual64::from(0.0), |acc, &z, &k| {
            acc + (q * (k - 1.0) + 1.0).recip() * (z * (k - 1.0))
        })
    };
    let q0 = vapor_fraction.unwrap_or(0.5 * (q_min + q_max));
    bracketed_newton(objective, q0, q_min, q_max, TOL_RR, MAX_ITER_RR)
}

/// Phase compositions xᵢ = zᵢ/(1 + q(Kᵢ - 1)) and yᵢ = Kᵢxᵢ, normalized.
pub(crate) fn phase_compositions(
    feed: &Array1<f64>,
    k: &Array1<f64>,
    vapor_fraction: f64,
) -> (Array1<f64>, Array1<f64>) {
    let x = Zip::from(feed)
        .and(k)
        .map_collect(|&z, &k| z / (1.0 + vapor_fraction * (k - 1.0)));
    let y = &x * k;
    (normalize(x), normalize(y))
}

pub(crate) fn normalize(x: Array1<f64>) -> Array1<f64> {
    let sum = x.sum();
    x / sum
}

/// K-values y/x; components absent from both phases keep their previous value.
pub(crate) fn k_values(x: &Array1<f64>, y: &Array1<f64>, k: &Array1<f64>) -> Array1<f64> {
    Zip::from(x)
        .and(y)
        .and(k)
        .map_collect(|&x, &y, &k| if x > 0.0 { y / x } else { k })
}
