//! Error types for the lightning-nox crate.
use std::{error::Error, fmt::Display};

/// Error type for the crate.
///
/// These only describe malformed inputs. Physically degenerate situations, such as a patch with no
/// convective cells or no lightning, are not errors; they produce an all zero tendency.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LightningError {
    /// An index range with its start after its end.
    InvalidRange,
    /// A field does not cover the bounds it was asked about.
    OutOfBounds,
    /// Not enough vertical levels to compute layer thicknesses.
    NotEnoughLevels,
    /// Parallel profiles or arrays have different lengths.
    LengthMismatch,
    /// Bad or invalid input, e.g. a level outside the column or a non-physical constant.
    InvalidInput,
    /// Another patch of a distributed computation rejected its inputs.
    PeerFailure,
}

impl Display for LightningError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use LightningError::*;

        match self {
            InvalidRange => write!(f, "index range start is after its end"),
            OutOfBounds => write!(f, "field does not cover the requested bounds"),
            NotEnoughLevels => write!(f, "at least two vertical levels are required"),
            LengthMismatch => write!(f, "parallel arrays have different lengths"),
            InvalidInput => write!(f, "invalid input"),
            PeerFailure => write!(f, "another patch rejected its inputs"),
        }
    }
}

impl Error for LightningError {}

/// Shorthand for results.
pub type Result<T> = std::result::Result<T, LightningError>;
