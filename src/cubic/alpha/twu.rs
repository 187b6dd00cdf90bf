use super::AlphaFunction;
use cubeos_core::parameter::{Component, ComponentRecord, ParameterError};
use cubeos_core::EosResult;
use num_dual::DualNum;
use serde::{Deserialize, Serialize};

/// Twu (1991) alpha function with component specific L, M and N.
///
/// α = Tᵣ^(N(M-1)) exp(L(1 - Tᵣ^(NM)))
///
/// The parameters are read from the `twu` entry of the component's shape data.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Twu;

impl AlphaFunction for Twu {
    #[inline]
    fn alpha<D: DualNum<f64> + Copy>(&self, record: &ComponentRecord, reduced_temperature: D) -> D {
        let [l, m, n] = record.shape.twu.unwrap_or([0.0, 1.0, 1.0]);
        reduced_temperature.powf(n * (m - 1.0)) * ((-reduced_temperature.powf(n * m) + 1.0) * l).exp()
    }

    fn validate(&self, component: &Component) -> EosResult<()> {
        match component.model_record.shape.twu {
            Some(_) => Ok(()),
            None => Err(ParameterError::MissingParameters(format!(
                "Twu alpha function requires L, M and N for {}",
                component.identifier
            ))
            .into()),
        }
    }
}
