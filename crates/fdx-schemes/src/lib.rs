//! Finite-difference kernels and scheme tables for the fdx operator engine.
//!
//! - [`stencil`]: the fixed-width windows kernels read
//! - [`kernels`]: first, second, upwind, flux, interpolation, PPM and
//!   MUSCL kernels
//! - [`registry`]: per class and alignment [`SchemeTable`]s, the standard
//!   [`Registry`], and label resolution
//!
//! Nothing here touches a grid. The engine extracts stencils and divides by
//! the spacing.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod kernels;
pub mod registry;
pub mod stencil;

pub use kernels::InterpScheme;
pub use registry::{Kernel, Registry, SchemeEntry, SchemeTable};
pub use stencil::{StaggeredStencil, Stencil};
