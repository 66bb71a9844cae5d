//! Error types for derivative evaluation.
//!
//! Soft misconfiguration (an unknown scheme name, a scheme missing from a
//! table) never reaches this enum: the registry falls back to a default and
//! logs a notice. Everything here is a request the engine cannot satisfy.

use std::error::Error;
use std::fmt;

use crate::location::{Axis, CellLocation};
use crate::method::{Alignment, OperatorClass};

/// Errors returned by derivative operators and configuration resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DerivError {
    /// A spectral method was requested along an axis that is not periodic.
    SpectralOnBoundedAxis {
        /// The offending axis.
        axis: Axis,
    },
    /// The scheme table for this class and alignment has no entries.
    NoKernel {
        /// Operator class of the empty table.
        class: OperatorClass,
        /// Alignment of the empty table.
        alignment: Alignment,
    },
    /// A kernel would read further than the ghost layer of a bounded axis.
    StencilUnderRead {
        /// Axis being differentiated.
        axis: Axis,
        /// Ghost width the kernel needs.
        required: usize,
        /// Ghost width the mesh provides.
        available: usize,
    },
    /// An operand does not match the mesh (or the other operand).
    ShapeMismatch {
        /// Expected storage dimensions `[nx, ny, nz]`.
        expected: [usize; 3],
        /// Actual storage dimensions.
        actual: [usize; 3],
    },
    /// A location request that cannot be honoured for this operand.
    InvalidLocation {
        /// Location of the input.
        from: CellLocation,
        /// Requested location.
        to: CellLocation,
        /// Why the request is invalid.
        reason: String,
    },
}

impl fmt::Display for DerivError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpectralOnBoundedAxis { axis } => {
                write!(f, "FFT differencing requested along non-periodic axis {axis}")
            }
            Self::NoKernel { class, alignment } => {
                write!(f, "no kernel available for {alignment} {class} derivatives")
            }
            Self::StencilUnderRead {
                axis,
                required,
                available,
            } => write!(
                f,
                "stencil along {axis} needs {required} ghost cells but only {available} present"
            ),
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "field shape {actual:?} does not match {expected:?}")
            }
            Self::InvalidLocation { from, to, reason } => {
                write!(f, "cannot shift {from} to {to}: {reason}")
            }
        }
    }
}

impl Error for DerivError {}
