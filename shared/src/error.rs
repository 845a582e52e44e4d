//! Error types for the simulation.

use crate::types::{Loc, Species, Terrain};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

/// Malformed island map. Raised before any grid state is built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapFormatError {
    #[error("map is empty")]
    Empty,

    #[error("row {row} has length {found}, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown terrain letter '{letter}' at ({row}, {col})")]
    UnknownTerrain { letter: char, row: usize, col: usize },

    #[error("border cell ({row}, {col}) must be water")]
    NonWaterBorder { row: usize, col: usize },
}

/// Rejected population entry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PopulationError {
    #[error("location {loc} is outside the {rows}x{cols} island")]
    OutOfBounds { loc: Loc, rows: usize, cols: usize },

    #[error("location {0} is water and cannot host animals")]
    WaterCell(Loc),

    #[error("unknown species '{0}'")]
    UnknownSpecies(String),

    #[error("invalid {species} at {loc}: {reason}")]
    InvalidAnimal {
        species: Species,
        loc: Loc,
        reason: String,
    },
}

/// Rejected parameter update. The store is left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("unknown parameter '{key}' for {owner}")]
    UnknownKey { owner: String, key: String },

    #[error("parameter '{key}' = {value} is out of range: {reason}")]
    OutOfRange {
        key: String,
        value: f64,
        reason: &'static str,
    },

    #[error("landscape {0} has no fodder parameter")]
    NoFodderParameter(Terrain),
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("map format error: {0}")]
    MapFormat(#[from] MapFormatError),

    #[error("population error: {0}")]
    Population(#[from] PopulationError),

    #[error("parameter error: {0}")]
    Parameter(#[from] ParameterError),
}
