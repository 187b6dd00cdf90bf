use super::AlphaFunction;
use cubeos_core::parameter::{Component, ComponentRecord};
use cubeos_core::EosResult;
use num_dual::DualNum;
use serde::{Deserialize, Serialize};

#[inline]
fn soave_alpha<D: DualNum<f64> + Copy>(m: f64, reduced_temperature: D) -> D {
    ((-reduced_temperature.sqrt() + 1.0) * m + 1.0).powi(2)
}

/// Generic version of Soave's function using a polynomial in the acentric factor.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Soave {
    /// coefficients for m-polynomial
    mi: Vec<f64>,
}

impl Soave {
    pub fn new(mi: Vec<f64>) -> Self {
        Soave { mi }
    }
}

impl AlphaFunction for Soave {
    #[inline]
    fn alpha<D: DualNum<f64> + Copy>(&self, record: &ComponentRecord, reduced_temperature: D) -> D {
        let w = record.acentric_factor;
        let m = self.mi.iter().rev().fold(0.0, |m, &mi| m * w + mi);
        soave_alpha(m, reduced_temperature)
    }

    fn validate(&self, _: &Component) -> EosResult<()> {
        Ok(())
    }
}

/// Soave (1972) for the Redlich-Kwong equation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct RedlichKwong1972;

impl AlphaFunction for RedlichKwong1972 {
    #[inline]
    fn alpha<D: DualNum<f64> + Copy>(&self, record: &ComponentRecord, reduced_temperature: D) -> D {
        let w = record.acentric_factor;
        soave_alpha(0.48 + w * (1.574 - w * 0.176), reduced_temperature)
    }

    fn validate(&self, _: &Component) -> EosResult<()> {
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PengRobinson1976;

impl AlphaFunction for PengRobinson1976 {
    #[inline]
    fn alpha<D: DualNum<f64> + Copy>(&self, record: &ComponentRecord, reduced_temperature: D) -> D {
        let w = record.acentric_factor;
        soave_alpha(0.37464 + w * (1.54226 - w * 0.26992), reduced_temperature)
    }

    fn validate(&self, _: &Component) -> EosResult<()> {
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PengRobinson1978;

impl AlphaFunction for PengRobinson1978 {
    #[inline]
    fn alpha<D: DualNum<f64> + Copy>(&self, record: &ComponentRecord, reduced_temperature: D) -> D {
        let w = record.acentric_factor;
        let m = if w <= 0.491 {
            0.37464 + w * (1.54226 - w * 0.26992)
        } else {
            // use higher-order polynomial if w > w(n-decane)
            0.379642 + w * (1.48503 + w * (-0.164423 + w * 0.016666))
        };
        soave_alpha(m, reduced_temperature)
    }

    fn validate(&self, _: &Component) -> EosResult<()> {
        Ok(())
    }
}
