use super::AlphaFunction;
use cubeos_core::parameter::{Component, ComponentRecord, ParameterError};
use cubeos_core::EosResult;
use num_dual::DualNum;
use serde::{Deserialize, Serialize};

/// Mathias-Copeman alpha function.
///
/// √α = 1 + c₁(1 - √Tᵣ) + c₂(1 - √Tᵣ)² + c₃(1 - √Tᵣ)³ below the critical
/// temperature, only the linear term above.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct MathiasCopeman;

impl AlphaFunction for MathiasCopeman {
    #[inline]
    fn alpha<D: DualNum<f64> + Copy>(&self, record: &ComponentRecord, reduced_temperature: D) -> D {
        let [c1, c2, c3] = record.shape.mathias_copeman.unwrap_or_default();
        let s = -reduced_temperature.sqrt() + 1.0;
        let sqrt_alpha = if reduced_temperature.re() < 1.0 {
            s * (s * (s * c3 + c2) + c1) + 1.0
        } else {
            s * c1 + 1.0
        };
        sqrt_alpha.powi(2)
    }

    fn validate(&self, component: &Component) -> EosResult<()> {
        match component.model_record.shape.mathias_copeman {
            Some(_) => Ok(()),
            None => Err(ParameterError::MissingParameters(format!(
                "Mathias-Copeman alpha function requires c1, c2 and c3 for {}",
                component.identifier
            ))
            .into()),
        }
    }
}
