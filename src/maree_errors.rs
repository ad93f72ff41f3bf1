use thiserror::Error;

use crate::nodal::Convention;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MareeError {
    #[error("Invalid time value (non-finite): {0}")]
    InvalidTime(f64),

    #[error("Unknown tidal constituent: {0}")]
    UnknownConstituent(String),

    #[error("No unique constituent matches Doodson coefficients: {0}")]
    AmbiguousConstituent(String),

    #[error("Nodal correction for constituent {constituent} is not implemented in the {convention} convention")]
    UnsupportedCorrection {
        constituent: String,
        convention: Convention,
    },

    #[error("Minor constituent inference requires at least {required} of the canonical majors, found {found}")]
    InsufficientConstituents { required: usize, found: usize },

    #[error("Invalid Doodson number: {0}")]
    InvalidDoodsonNumber(String),

    #[error("Mismatched input shapes: {0}")]
    ShapeMismatch(String),

    #[error("Unknown correction convention: {0}")]
    UnknownConvention(String),

    #[error("Unknown astronomical longitude method: {0}")]
    UnknownLongitudeMethod(String),
}
