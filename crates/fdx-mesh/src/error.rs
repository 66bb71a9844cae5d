//! Error types for mesh construction and field arithmetic.

use std::fmt;

/// Errors arising from mesh construction or field operations.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    /// An axis was given zero interior points.
    EmptyAxis {
        /// Name of the axis.
        axis: &'static str,
    },
    /// Two fields (or a field and the mesh) disagree on storage shape.
    ShapeMismatch {
        /// Expected storage dimensions.
        expected: [usize; 3],
        /// Actual storage dimensions.
        actual: [usize; 3],
    },
    /// A spacing or correction value is not finite and positive.
    InvalidSpacing {
        /// Which quantity was rejected.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
    /// A data buffer has the wrong length for the requested shape.
    BufferLength {
        /// Length implied by the shape.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAxis { axis } => write!(f, "axis {axis} must have at least one point"),
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "shape {actual:?} does not match {expected:?}")
            }
            Self::InvalidSpacing { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            Self::BufferLength { expected, actual } => {
                write!(f, "buffer holds {actual} values, shape needs {expected}")
            }
        }
    }
}

impl std::error::Error for MeshError {}
