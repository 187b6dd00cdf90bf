//! Root finding for cubic polynomials and bracketed scalar equations.
use crate::errors::{EosError, EosResult};
use num_dual::{first_derivative, Dual64};
use std::f64::consts::PI;

const POLISH_STEPS: usize = 2;

/// Real roots of a monic cubic polynomial in ascending order.
///
/// A cubic with real coefficients has either one or three real roots
/// (counting multiplicity), which is reflected in the variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CubicRoots {
    One(f64),
    Three([f64; 3]),
}

impl CubicRoots {
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Self::One(r) => std::slice::from_ref(r),
            Self::Three(r) => r,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn smallest(&self) -> f64 {
        match self {
            Self::One(r) => *r,
            Self::Three(r) => r[0],
        }
    }

    pub fn largest(&self) -> f64 {
        match self {
            Self::One(r) => *r,
            Self::Three(r) => r[2],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.as_slice().iter().copied()
    }
}

/// Solve `x³ + c2·x² + c1·x + c0 = 0`.
///
/// The sign of the discriminant of the depressed cubic decides between
/// Cardano's formula (one real root) and the trigonometric solution
/// (three real roots). All roots are polished by Newton steps on the
/// full polynomial.
pub fn cubic_roots(c2: f64, c1: f64, c0: f64) -> CubicRoots {
    // depressed cubic t³ + p·t + q = 0 with x = t - c2/3
    let shift = c2 / 3.0;
    let p = c1 - c2 * shift;
    let q = c0 - c1 * shift + 2.0 * shift.powi(3);

    let (q2, p3) = (0.5 * q, p / 3.0);
    let discriminant = q2 * q2 + p3.powi(3);
    let scale = q2 * q2 + p3.abs().powi(3);

    if discriminant > f64::EPSILON * scale {
        // numerically stable variant of Cardano's formula
        let u = (-q2 - q2.signum() * discriminant.sqrt()).cbrt();
        let t = if u == 0.0 { 0.0 } else { u - p3 / u };
        return CubicRoots::One(polish(t - shift, c2, c1, c0));
    }

    if p == 0.0 {
        return CubicRoots::Three([-shift; 3]);
    }

    let m = 2.0 * (-p3).sqrt();
    let arg = (3.0 * q / (p * m)).clamp(-1.0, 1.0);
    let theta = arg.acos() / 3.0;
    let mut roots = [0.0, 1.0, 2.0]
        .map(|k| polish(m * (theta - 2.0 * PI * k / 3.0).cos() - shift, c2, c1, c0));
    roots.sort_by(f64::total_cmp);
    CubicRoots::Three(roots)
}

fn polish(mut x: f64, c2: f64, c1: f64, c0: f64) -> f64 {
    let f = |x: f64| ((x + c2) * x + c1) * x + c0;
    for _ in 0..POLISH_STEPS {
        let fx = f(x);
        let dfx = (3.0 * x + 2.0 * c2) * x + c1;
        if fx == 0.0 || dfx == 0.0 {
            break;
        }
        let x_new = x - fx / dfx;
        if f(x_new).abs() < fx.abs() {
            x = x_new;
        } else {
            break;
        }
    }
    x
}

/// Find a root of `f` in `[lower, upper]` starting from `x0`.
///
/// Newton steps use derivatives from dual numbers; a step that leaves the
/// current bracket is replaced by bisection. The function has to change
/// its sign on the initial interval.
pub fn bracketed_newton<F>(
    f: F,
    x0: f64,
    lower: f64,
    upper: f64,
    tol: f64,
    max_iter: usize,
) -> EosResult<f64>
where
    F: Fn(Dual64) -> Dual64,
{
    let (mut lo, mut hi) = (lower, upper);
    let f_lo = f(Dual64::from(lo)).re;
    let f_hi = f(Dual64::from(hi)).re;
    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if !(f_lo.is_finite() && f_hi.is_finite()) || f_lo.signum() == f_hi.signum() {
        return Err(EosError::IterationFailed(String::from("bracketed_newton")));
    }
    let increasing = f_lo < 0.0;

    let mut x = if x0 > lo && x0 < hi { x0 } else { 0.5 * (lo + hi) };
    for _ in 0..max_iter {
        let (fx, dfx) = first_derivative(&f, x);
        if !fx.is_finite() {
            return Err(EosError::IterationFailed(String::from("bracketed_newton")));
        }
        if fx == 0.0 {
            return Ok(x);
        }
        if (fx < 0.0) == increasing {
            lo = x;
        } else {
            hi = x;
        }

        let mut x_new = x - fx / dfx;
        if !(x_new > lo && x_new < hi) {
            x_new = 0.5 * (lo + hi);
        }
        let dx = (x_new - x).abs();
        x = x_new;
        if dx < tol || hi - lo < tol {
            return Ok(x);
        }
    }
    Err(EosError::NotConverged(String::from("bracketed_newton")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_dual::DualNum;

    fn residual(c: (f64, f64, f64), x: f64) -> f64 {
        ((x + c.0) * x + c.1) * x + c.2
    }

    #[test]
    fn three_distinct_roots() {
        // (x - 0.5)(x - 2)(x + 3)
        let c = (0.5, -6.5, 3.0);
        let roots = cubic_roots(c.0, c.1, c.2);
        assert_eq!(roots.len(), 3);
        let r = roots.as_slice();
        assert_relative_eq!(r[0], -3.0, max_relative = 1e-12);
        assert_relative_eq!(r[1], 0.5, max_relative = 1e-12);
        assert_relative_eq!(r[2], 2.0, max_relative = 1e-12);
    }

    #[test]
    fn single_real_root() {
        // (x - 1)(x² + 1)
        let roots = cubic_roots(-1.0, 1.0, -1.0);
        assert_eq!(roots, CubicRoots::One(1.0));
    }

    #[test]
    fn double_root_counts_twice() {
        // (x - 1)²(x - 2)
        let roots = cubic_roots(-4.0, 5.0, -2.0);
        assert_eq!(roots.len(), 3);
        let r = roots.as_slice();
        assert_relative_eq!(r[0], 1.0, max_relative = 1e-6);
        assert_relative_eq!(r[1], 1.0, max_relative = 1e-6);
        assert_relative_eq!(r[2], 2.0, max_relative = 1e-12);
    }

    #[test]
    fn triple_root() {
        assert_eq!(cubic_roots(-3.0, 3.0, -1.0), CubicRoots::Three([1.0; 3]));
    }

    #[test]
    fn roots_satisfy_polynomial() {
        let coefficients = [
            (-1.0, 0.2, -0.01),
            (-0.98, 0.15, -0.002),
            (2.0, -1.0, 0.5),
            (-1.2, 0.05, 3.0e-4),
            (0.0, -3.0, 1.0),
        ];
        for c in coefficients {
            let roots = cubic_roots(c.0, c.1, c.2);
            assert!(roots.len() == 1 || roots.len() == 3);
            assert!(roots.as_slice().windows(2).all(|w| w[0] <= w[1]));
            for x in roots.iter() {
                assert!(residual(c, x).abs() < 1e-12, "{:?} {}", c, x);
            }
        }
    }

    #[test]
    fn newton_in_bracket() -> EosResult<()> {
        let root = bracketed_newton(|x| x * x - 2.0, 1.0, 0.0, 2.0, 1e-14, 50)?;
        assert_relative_eq!(root, 2f64.sqrt(), max_relative = 1e-12);

        // a poor initial guess falls back to bisection
        let root = bracketed_newton(|x| (x * 5.0).tanh(), 0.9, -1.0, 1.0, 1e-14, 100)?;
        assert!(root.abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn newton_without_sign_change() {
        let root = bracketed_newton(|x| x.powi(2) + 1.0, 0.5, 0.0, 1.0, 1e-12, 50);
        assert!(matches!(root, Err(EosError::IterationFailed(_))));
    }

    #[test]
    fn newton_iteration_budget() {
        let root = bracketed_newton(|x| x.powi(3) - 0.3, 0.1, 0.0, 1.0, 0.0, 2);
        assert!(matches!(root, Err(EosError::NotConverged(_))));
    }
}
