//! Error types for optics computations.

use std::fmt;

use thiserror::Error;

/// Which refraction event of a trace failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Light entering the denser medium.
    Entry,
    /// Light leaving the denser medium.
    Exit,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Entry => write!(f, "entry"),
            Surface::Exit => write!(f, "exit"),
        }
    }
}

/// Errors that can occur while evaluating fields or tracing rays.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpticsError {
    /// Snell's law asked for the arcsine of a value outside [-1, 1].
    #[error("total internal reflection at {surface} surface: index {index}, sine {sine}")]
    TotalInternalReflection {
        surface: Surface,
        index: f64,
        sine: f64,
    },

    /// A ray runs parallel to the edge it should cross.
    #[error("ray is parallel to the {surface} edge")]
    ParallelLines { surface: Surface },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type OpticsResult<T> = Result<T, OpticsError>;
