use super::model_record::PureRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Critical data and shape information of a single substance.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ComponentRecord {
    /// critical temperature in Kelvin
    pub tc: f64,
    /// critical pressure in Pascal
    pub pc: f64,
    /// critical molar volume in m³/mol
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vc: Option<f64>,
    /// acentric factor
    pub acentric_factor: f64,
    /// family specific shape data
    #[serde(default)]
    #[serde(skip_serializing_if = "ShapeRecord::is_empty")]
    pub shape: ShapeRecord,
}

impl ComponentRecord {
    /// Create a new component record without shape data.
    pub fn new(tc: f64, pc: f64, acentric_factor: f64) -> Self {
        Self {
            tc,
            pc,
            vc: None,
            acentric_factor,
            shape: ShapeRecord::default(),
        }
    }

    pub fn vc(mut self, vc: f64) -> Self {
        self.vc = Some(vc);
        self
    }

    pub fn shape(mut self, shape: ShapeRecord) -> Self {
        self.shape = shape;
        self
    }

    /// Critical compressibility factor, if the critical volume is known.
    pub fn zc(&self, gas_constant: f64) -> Option<f64> {
        self.vc.map(|vc| self.pc * vc / (gas_constant * self.tc))
    }
}

impl fmt::Display for ComponentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentRecord(tc={} K", self.tc)?;
        write!(f, ", pc={} Pa", self.pc)?;
        if let Some(vc) = self.vc {
            write!(f, ", vc={} m³/mol", vc)?;
        }
        write!(f, ", acentric factor={}", self.acentric_factor)?;
        if !self.shape.is_empty() {
            write!(f, ", {:?}", self.shape)?;
        }
        write!(f, ")")
    }
}

/// Optional parameters used by individual families or alpha functions.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ShapeRecord {
    /// Mathias-Copeman coefficients c1, c2, c3
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mathias_copeman: Option<[f64; 3]>,
    /// Twu (1991) coefficients L, M, N
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twu: Option<[f64; 3]>,
    /// Patel-Teja critical compressibility and slope (zeta_c, F)
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patel_teja: Option<[f64; 2]>,
}

impl ShapeRecord {
    pub fn is_empty(&self) -> bool {
        self.mathias_copeman.is_none() && self.twu.is_none() && self.patel_teja.is_none()
    }
}

/// A substance of the component catalog.
pub type Component = PureRecord<ComponentRecord>;
