//! Generalized cubic equations of state and vapor-liquid flash calculations.
//!
//! The engine in [cubeos_core] works on a single polynomial form of the
//! cubic equation of state. This crate provides the families that plug
//! into it.
//!
//! ```no_run
//! use cubeos::cubic::Cubic;
//! use cubeos::parameter::{BipStore, IdentifierOption};
//! use cubeos::{CubicEos, EosResult, FlashSolver, Mixture};
//! use ndarray::arr1;
//! use std::sync::Arc;
//!
//! # fn main() -> EosResult<()> {
//! let mixture = Mixture::from_json(
//!     &["propane", "butane"],
//!     "components.json",
//!     IdentifierOption::Name,
//!     arr1(&[0.5, 0.5]),
//! )?;
//! let bips = BipStore::from_json("binary.json", IdentifierOption::Name)?;
//! let eos = Arc::new(CubicEos::new(Cubic::peng_robinson(None)));
//! let solver = FlashSolver::new(eos, Arc::new(bips));
//! let result = solver.evaluate(&mixture, 300.0, 5e5);
//! println!("{result}");
//! # Ok(())
//! # }
//! ```
#![warn(clippy::all)]
#![allow(clippy::too_many_arguments)]

pub mod cubic;

pub use cubeos_core::*;
