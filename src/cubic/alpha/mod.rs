use cubeos_core::parameter::{Component, ComponentRecord};
use cubeos_core::EosResult;
use enum_dispatch::enum_dispatch;
use num_dual::DualNum;
use serde::{Deserialize, Serialize};

mod mathias_copeman;
mod soave;
mod twu;
pub use mathias_copeman::MathiasCopeman;
pub use soave::{PengRobinson1976, PengRobinson1978, RedlichKwong1972, Soave};
pub use twu::Twu;

#[enum_dispatch]
pub trait AlphaFunction {
    /// α(Tᵣ) of a single component.
    fn alpha<D: DualNum<f64> + Copy>(&self, record: &ComponentRecord, reduced_temperature: D) -> D;

    /// Check that the component carries the data the alpha function needs.
    fn validate(&self, component: &Component) -> EosResult<()>;
}

/// α = Tᵣ^(-1/2) of the original Redlich-Kwong equation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct RedlichKwong;

impl AlphaFunction for RedlichKwong {
    fn alpha<D: DualNum<f64> + Copy>(&self, _: &ComponentRecord, reduced_temperature: D) -> D {
        reduced_temperature.sqrt().recip()
    }

    fn validate(&self, _: &Component) -> EosResult<()> {
        Ok(())
    }
}

/// Temperature independent attraction, e.g. for van der Waals.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Constant;

impl AlphaFunction for Constant {
    fn alpha<D: DualNum<f64> + Copy>(&self, _: &ComponentRecord, _: D) -> D {
        D::one()
    }

    fn validate(&self, _: &Component) -> EosResult<()> {
        Ok(())
    }
}

#[enum_dispatch(AlphaFunction)]
#[derive(Debug, Clone, PartialEq)]
pub enum Alpha {
    Soave,
    PengRobinson1976,
    PengRobinson1978,
    RedlichKwong1972,
    RedlichKwong,
    MathiasCopeman,
    Twu,
    Constant,
}

impl Alpha {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Soave(_) => "soave",
            Self::PengRobinson1976(_) => "peng-robinson-1976",
            Self::PengRobinson1978(_) => "peng-robinson-1978",
            Self::RedlichKwong1972(_) => "soave-1972",
            Self::RedlichKwong(_) => "redlich-kwong",
            Self::MathiasCopeman(_) => "mathias-copeman",
            Self::Twu(_) => "twu-1991",
            Self::Constant(_) => "constant",
        }
    }
}
