use crate::errors::{EosError, EosResult};
use enum_dispatch::enum_dispatch;
use ndarray::{Array1, Array2};
use num_dual::{first_derivative, Dual64, DualNum};
use std::fmt;
use std::str::FromStr;

/// Temperature dependent coefficients of the pure components.
#[derive(Debug, Clone, PartialEq)]
pub struct PureCoefficients {
    /// attraction parameters aᵢ in J m³/mol²
    pub a: Array1<f64>,
    /// co-volumes bᵢ in m³/mol
    pub b: Array1<f64>,
    /// family specific coefficients (one column per coefficient), combined linearly
    pub extra: Array2<f64>,
}

impl PureCoefficients {
    pub fn new(a: Array1<f64>, b: Array1<f64>) -> Self {
        let n = a.len();
        Self {
            a,
            b,
            extra: Array2::zeros((n, 0)),
        }
    }

    pub fn with_extra(mut self, extra: Array2<f64>) -> Self {
        self.extra = extra;
        self
    }

    pub fn components(&self) -> usize {
        self.a.len()
    }

    /// Check that all arrays describe the same number of components.
    pub fn validate(&self, components: usize) -> EosResult<()> {
        for (name, len) in [
            ("a", self.a.len()),
            ("b", self.b.len()),
            ("extra", self.extra.nrows()),
        ] {
            if len != components {
                return Err(EosError::InvalidInput(
                    String::from("PureCoefficients"),
                    format!("`{name}` has {len} entries for {components} components"),
                ));
            }
        }
        Ok(())
    }
}

/// Coefficients of the mixture, generic over dual numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct MixtureCoefficients<D = f64> {
    pub a: D,
    pub b: D,
    pub extra: Vec<D>,
}

impl<D: DualNum<f64> + Copy> MixtureCoefficients<D> {
    /// Drop the derivative information.
    pub fn re(&self) -> MixtureCoefficients<f64> {
        MixtureCoefficients {
            a: self.a.re(),
            b: self.b.re(),
            extra: self.extra.iter().map(|e| e.re()).collect(),
        }
    }
}

#[enum_dispatch]
pub trait MixingRuleFunction {
    /// Attraction parameter of the mixture.
    fn attraction<D: DualNum<f64> + Copy>(
        &self,
        molefracs: &Array1<D>,
        a: &Array1<f64>,
        k_ij: &Array2<f64>,
    ) -> D;
}

fn double_sum<D, F>(molefracs: &Array1<D>, a: &Array1<f64>, correction: F) -> D
where
    D: DualNum<f64> + Copy,
    F: Fn(usize, usize) -> D,
{
    let n = a.len();
    let mut res = D::zero();
    for i in 0..n {
        for j in 0..n {
            res += molefracs[i] * molefracs[j] * correction(i, j) * (a[i] * a[j]).sqrt();
        }
    }
    res
}

/// van der Waals one-fluid rule, a_ij = √(aᵢaⱼ)(1 - k_ij).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quadratic;

impl MixingRuleFunction for Quadratic {
    fn attraction<D: DualNum<f64> + Copy>(
        &self,
        molefracs: &Array1<D>,
        a: &Array1<f64>,
        k_ij: &Array2<f64>,
    ) -> D {
        double_sum(molefracs, a, |i, j| D::one() - k_ij[[i, j]])
    }
}

/// Composition dependent correction of Panagiotopoulos and Reid,
/// a_ij = √(aᵢaⱼ)(1 - k_ij + (k_ij - k_ji)xᵢ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanagiotopoulosReid;

impl MixingRuleFunction for PanagiotopoulosReid {
    fn attraction<D: DualNum<f64> + Copy>(
        &self,
        molefracs: &Array1<D>,
        a: &Array1<f64>,
        k_ij: &Array2<f64>,
    ) -> D {
        double_sum(molefracs, a, |i, j| {
            molefracs[i] * (k_ij[[i, j]] - k_ij[[j, i]]) - k_ij[[i, j]] + 1.0
        })
    }
}

/// Margules type rule of Stryjek and Vera,
/// a_ij = √(aᵢaⱼ)(1 - xᵢk_ij - xⱼk_ji).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StryjekVera;

impl MixingRuleFunction for StryjekVera {
    fn attraction<D: DualNum<f64> + Copy>(
        &self,
        molefracs: &Array1<D>,
        a: &Array1<f64>,
        k_ij: &Array2<f64>,
    ) -> D {
        double_sum(molefracs, a, |i, j| {
            -molefracs[i] * k_ij[[i, j]] - molefracs[j] * k_ij[[j, i]] + 1.0
        })
    }
}

/// Split into a symmetric and an antisymmetric part,
/// a_ij = √(aᵢaⱼ)(1 - s_ij - d_ij(xᵢ - xⱼ)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Melhem;

impl MixingRuleFunction for Melhem {
    fn attraction<D: DualNum<f64> + Copy>(
        &self,
        molefracs: &Array1<D>,
        a: &Array1<f64>,
        k_ij: &Array2<f64>,
    ) -> D {
        double_sum(molefracs, a, |i, j| {
            let s = 0.5 * (k_ij[[i, j]] + k_ij[[j, i]]);
            let d = 0.5 * (k_ij[[i, j]] - k_ij[[j, i]]);
            -(molefracs[i] - molefracs[j]) * d - s + 1.0
        })
    }
}

/// Rule used to combine the attraction parameters.
///
/// The co-volume and additional family coefficients are always combined linearly.
#[enum_dispatch(MixingRuleFunction)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixingRule {
    Quadratic,
    PanagiotopoulosReid,
    StryjekVera,
    Melhem,
}

impl Default for MixingRule {
    fn default() -> Self {
        Quadratic.into()
    }
}

impl MixingRule {
    /// Mixture coefficients for the given composition.
    pub fn combine(
        &self,
        molefracs: &Array1<f64>,
        pure: &PureCoefficients,
        k_ij: &Array2<f64>,
    ) -> MixtureCoefficients {
        self.combine_dual(molefracs, pure, k_ij)
    }

    /// Mixture coefficients for compositions that carry derivatives.
    pub fn combine_dual<D: DualNum<f64> + Copy>(
        &self,
        molefracs: &Array1<D>,
        pure: &PureCoefficients,
        k_ij: &Array2<f64>,
    ) -> MixtureCoefficients<D> {
        let linear = |column: ndarray::ArrayView1<f64>| {
            molefracs
                .iter()
                .zip(column)
                .fold(D::zero(), |acc, (&x, &c)| acc + x * c)
        };
        MixtureCoefficients {
            a: self.attraction(molefracs, &pure.a, k_ij),
            b: linear(pure.b.view()),
            extra: pure.extra.columns().into_iter().map(linear).collect(),
        }
    }

    /// Partial molar attraction āᵢ = (1/n) ∂(n²a)/∂nᵢ.
    pub fn partial_attraction(
        &self,
        molefracs: &Array1<f64>,
        a: &Array1<f64>,
        k_ij: &Array2<f64>,
    ) -> Array1<f64> {
        let n = molefracs.len();
        Array1::from_shape_fn(n, |i| {
            let (_, da) = first_derivative(
                |ni: Dual64| {
                    let moles = Array1::from_shape_fn(n, |j| {
                        if j == i {
                            ni
                        } else {
                            Dual64::from(molefracs[j])
                        }
                    });
                    let total = moles.sum();
                    let x = moles.mapv(|m| m / total);
                    total * total * self.attraction(&x, a, k_ij)
                },
                molefracs[i],
            );
            da
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Quadratic(_) => "quadratic",
            Self::PanagiotopoulosReid(_) => "panagiotopoulos-reid",
            Self::StryjekVera(_) => "stryjek-vera",
            Self::Melhem(_) => "melhem",
        }
    }
}

impl fmt::Display for MixingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MixingRule {
    type Err = EosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "quadratic" | "vdw1f" => Ok(Quadratic.into()),
            "panagiotopoulos-reid" => Ok(PanagiotopoulosReid.into()),
            "stryjek-vera" | "margules" => Ok(StryjekVera.into()),
            "melhem" => Ok(Melhem.into()),
            _ => Err(EosError::InvalidInput(
                String::from("MixingRule"),
                format!("unknown mixing rule '{s}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};

    fn rules() -> [MixingRule; 4] {
        [
            Quadratic.into(),
            PanagiotopoulosReid.into(),
            StryjekVera.into(),
            Melhem.into(),
        ]
    }

    fn pure() -> PureCoefficients {
        PureCoefficients::new(arr1(&[1.2, 0.6, 2.5]), arr1(&[5e-5, 3e-5, 8e-5]))
            .with_extra(arr2(&[[1.0], [2.0], [4.0]]))
    }

    #[test]
    fn without_interaction_one_fluid_rule() {
        let x = arr1(&[0.2, 0.5, 0.3]);
        let k = Array2::zeros((3, 3));
        let p = pure();
        let sqrt_a: f64 = x.iter().zip(&p.a).map(|(x, a)| x * a.sqrt()).sum();
        for rule in rules() {
            let m = rule.combine(&x, &p, &k);
            assert_relative_eq!(m.a, sqrt_a.powi(2), max_relative = 1e-14);
            assert_relative_eq!(m.b, 0.2 * 5e-5 + 0.5 * 3e-5 + 0.3 * 8e-5, max_relative = 1e-14);
            assert_relative_eq!(m.extra[0], 0.2 + 1.0 + 1.2, max_relative = 1e-14);
        }
    }

    #[test]
    fn symmetric_binary_rules_agree() {
        let x = arr1(&[0.3, 0.7]);
        let k = arr2(&[[0.0, 0.05], [0.05, 0.0]]);
        let p = PureCoefficients::new(arr1(&[1.2, 0.6]), arr1(&[5e-5, 3e-5]));
        let expected = 0.09 * 1.2 + 0.49 * 0.6 + 2.0 * 0.21 * 0.72f64.sqrt() * 0.95;
        for rule in rules() {
            assert_relative_eq!(rule.combine(&x, &p, &k).a, expected, max_relative = 1e-14);
        }
    }

    #[test]
    fn asymmetric_panagiotopoulos_reid() {
        let x = arr1(&[0.3, 0.7]);
        let k = arr2(&[[0.0, 0.1], [-0.05, 0.0]]);
        let a = arr1(&[1.2, 0.6]);
        let a12 = 0.72f64.sqrt();
        let expected = 0.09 * 1.2
            + 0.49 * 0.6
            + 0.21 * a12 * (1.0 - 0.1 + 0.15 * 0.3)
            + 0.21 * a12 * (1.0 + 0.05 - 0.15 * 0.7);
        assert_relative_eq!(
            PanagiotopoulosReid.attraction(&x, &a, &k),
            expected,
            max_relative = 1e-14
        );
    }

    #[test]
    fn stryjek_vera_differs_for_ternaries() {
        let x = arr1(&[0.2, 0.5, 0.3]);
        let k = arr2(&[[0.0, 0.05, 0.02], [0.05, 0.0, 0.01], [0.02, 0.01, 0.0]]);
        let p = pure();
        let quadratic = MixingRule::from(Quadratic).combine(&x, &p, &k).a;
        let melhem = MixingRule::from(Melhem).combine(&x, &p, &k).a;
        let stryjek_vera = MixingRule::from(StryjekVera).combine(&x, &p, &k).a;
        assert_relative_eq!(quadratic, melhem, max_relative = 1e-14);
        assert!((quadratic - stryjek_vera).abs() > 1e-4);
    }

    #[test]
    fn partial_attraction_quadratic() {
        let x = arr1(&[0.2, 0.5, 0.3]);
        let k = arr2(&[[0.0, 0.05, 0.02], [0.05, 0.0, 0.01], [0.02, 0.01, 0.0]]);
        let a = pure().a;
        let partial = MixingRule::default().partial_attraction(&x, &a, &k);
        for i in 0..3 {
            let expected: f64 = (0..3)
                .map(|j| 2.0 * x[j] * (1.0 - k[[i, j]]) * (a[i] * a[j]).sqrt())
                .sum();
            assert_relative_eq!(partial[i], expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn partial_attraction_euler_relation() {
        let x = arr1(&[0.2, 0.5, 0.3]);
        let k = arr2(&[[0.0, 0.05, -0.02], [0.08, 0.0, 0.01], [0.03, -0.04, 0.0]]);
        let a = pure().a;
        for rule in rules() {
            let partial = rule.partial_attraction(&x, &a, &k);
            let mixture = rule.attraction(&x, &a, &k);
            assert_relative_eq!(x.dot(&partial), 2.0 * mixture, max_relative = 1e-12);
        }
    }

    #[test]
    fn parse_and_display() -> EosResult<()> {
        for rule in rules() {
            assert_eq!(rule.to_string().parse::<MixingRule>()?, rule);
        }
        assert_eq!(
            "Stryjek_Vera".parse::<MixingRule>()?,
            MixingRule::from(StryjekVera)
        );
        assert!(matches!(
            "wong-sandler".parse::<MixingRule>(),
            Err(EosError::InvalidInput(..))
        ));
        Ok(())
    }
}
