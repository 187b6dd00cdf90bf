//! Component records, binary interaction parameters and their json representation.
use std::io;
use thiserror::Error;

mod bip;
mod component;
mod identifier;
mod model_record;

pub use bip::{
    BinaryInteractionRecord, BinaryInteractionSource, BinaryMatrix, BipStore, NoBinaryInteraction,
};
pub use component::{Component, ComponentRecord, ShapeRecord};
pub use identifier::{Identifier, IdentifierOption};
pub use model_record::{BinaryRecord, PureRecord};

/// Error type for incomplete parameter information and IO problems.
#[derive(Error, Debug)]
pub enum ParameterError {
    #[error(transparent)]
    FileIO(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("The following component(s) were not found: {0}")]
    ComponentsNotFound(String),
    #[error("Incompatible parameters: {0}")]
    IncompatibleParameters(String),
    #[error("Missing parameters: {0}")]
    MissingParameters(String),
}
