//! Numerical kernels.
//!
//! Point kernels take stencil windows and return the derivative times the
//! appropriate power of the spacing. [`ppm`] works on whole lines.

pub mod first;
pub mod flux;
pub mod interp;
pub mod muscl;
pub mod ppm;
pub mod second;
pub mod upwind;

pub use interp::InterpScheme;
