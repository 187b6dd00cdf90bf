//! The generalized cubic equation of state in the compressibility factor.
//!
//! All supported families share the pressure explicit form
//!
//! $$p = \frac{RT}{v - b} - \frac{a}{v^2 + \delta v + \varepsilon}$$
//!
//! which, in terms of $Z = pv/RT$, is a cubic polynomial whose coefficients
//! only depend on four dimensionless groups.
use crate::errors::{EosError, EosResult};
use crate::roots::cubic_roots;
use std::fmt;

/// Mixture scalars of the equation of state at fixed temperature and composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EosParameters {
    /// attraction parameter in J m³/mol²
    pub a: f64,
    /// co-volume in m³/mol
    pub b: f64,
    /// linear coefficient of the attractive denominator in m³/mol
    pub delta: f64,
    /// constant coefficient of the attractive denominator in m⁶/mol²
    pub epsilon: f64,
}

impl EosParameters {
    pub fn new(a: f64, b: f64, delta: f64, epsilon: f64) -> Self {
        Self {
            a,
            b,
            delta,
            epsilon,
        }
    }

    /// A' = aP/(RT)², B' = bP/RT, D' = δP/RT, E' = ε(P/RT)²
    pub fn groups(&self, temperature: f64, pressure: f64, gas_constant: f64) -> DimensionlessGroups {
        let rho = pressure / (gas_constant * temperature);
        DimensionlessGroups {
            a: self.a * rho / (gas_constant * temperature),
            b: self.b * rho,
            d: self.delta * rho,
            e: self.epsilon * rho * rho,
        }
    }

    pub fn polynomial(&self, temperature: f64, pressure: f64, gas_constant: f64) -> CubicPolynomial {
        CubicPolynomial::new(self.groups(temperature, pressure, gas_constant))
    }
}

/// Dimensionless groups A', B', D' and E'.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionlessGroups {
    pub a: f64,
    pub b: f64,
    pub d: f64,
    pub e: f64,
}

/// Coefficients of Z³ + c2·Z² + c1·Z + c0 = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicPolynomial {
    pub groups: DimensionlessGroups,
    pub c2: f64,
    pub c1: f64,
    pub c0: f64,
}

impl CubicPolynomial {
    pub fn new(groups: DimensionlessGroups) -> Self {
        let DimensionlessGroups { a, b, d, e } = groups;
        Self {
            groups,
            c2: d - b - 1.0,
            c1: a + e - d * (b + 1.0),
            c0: -(e * (b + 1.0) + a * b),
        }
    }

    pub fn evaluate(&self, z: f64) -> f64 {
        ((z + self.c2) * z + self.c1) * z + self.c0
    }

    /// Real roots that correspond to a positive free volume (Z > B').
    pub fn physical_roots(&self) -> Vec<f64> {
        cubic_roots(self.c2, self.c1, self.c0)
            .iter()
            .filter(|&z| z > self.groups.b)
            .collect()
    }
}

/// Phase assignment of a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Liquid,
    Vapor,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Liquid => write!(f, "liquid"),
            Self::Vapor => write!(f, "vapor"),
        }
    }
}

/// A compressibility factor together with the groups it was obtained from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseRoot {
    pub z: f64,
    pub phase: PhaseKind,
    pub groups: DimensionlessGroups,
}

impl PhaseRoot {
    /// Molar volume v = ZRT/P in m³/mol.
    pub fn molar_volume(&self, temperature: f64, pressure: f64, gas_constant: f64) -> f64 {
        self.z * gas_constant * temperature / pressure
    }
}

/// Physical roots of the cubic in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct ZRoots {
    roots: Vec<f64>,
    groups: DimensionlessGroups,
}

impl ZRoots {
    pub fn as_slice(&self) -> &[f64] {
        &self.roots
    }

    pub fn groups(&self) -> DimensionlessGroups {
        self.groups
    }

    /// Only one root remains, which is used for both phases.
    pub fn is_single(&self) -> bool {
        self.roots.len() == 1
    }

    pub fn liquid(&self) -> PhaseRoot {
        self.root(PhaseKind::Liquid)
    }

    pub fn vapor(&self) -> PhaseRoot {
        self.root(PhaseKind::Vapor)
    }

    /// Smallest root for a liquid, largest root for a vapor.
    pub fn root(&self, phase: PhaseKind) -> PhaseRoot {
        let z = match phase {
            PhaseKind::Liquid => self.roots[0],
            PhaseKind::Vapor => self.roots[self.roots.len() - 1],
        };
        PhaseRoot {
            z,
            phase,
            groups: self.groups,
        }
    }
}

/// Solve the cubic equation of state for the compressibility factor.
///
/// Roots with Z ≤ B' are discarded. If none remains, the state is outside of
/// the range that the equation of state can describe.
pub fn solve_z(
    parameters: &EosParameters,
    temperature: f64,
    pressure: f64,
    gas_constant: f64,
) -> EosResult<ZRoots> {
    if !(temperature.is_finite() && temperature > 0.0) {
        return Err(EosError::InvalidState(
            String::from("solve_z"),
            String::from("T"),
            temperature,
        ));
    }
    if !(pressure.is_finite() && pressure > 0.0) {
        return Err(EosError::InvalidState(
            String::from("solve_z"),
            String::from("p"),
            pressure,
        ));
    }
    let EosParameters {
        a,
        b,
        delta,
        epsilon,
    } = *parameters;
    if ![a, b, delta, epsilon].iter().all(|p| p.is_finite()) || b <= 0.0 {
        return Err(EosError::InvalidInput(
            String::from("solve_z"),
            format!("non-physical mixture parameters {parameters:?}"),
        ));
    }

    let polynomial = parameters.polynomial(temperature, pressure, gas_constant);
    let roots = polynomial.physical_roots();
    if roots.is_empty() {
        return Err(EosError::NoPhysicalRoot(temperature, pressure));
    }
    Ok(ZRoots {
        roots,
        groups: polynomial.groups,
    })
}
