//! Field storage and mesh geometry for the fdx operator engine.
//!
//! This crate holds the data the operators consume but never compute:
//!
//! - [`Field`]: owned, location-tagged grid values with ghost cells
//! - [`AxisLayout`]: interior, ghost width and [`Boundary`] of one axis
//! - [`Mesh`]: axis layouts, per-column spacing and the optional
//!   non-uniform corrections for second derivatives
//!
//! Ghost values are filled by the caller. Nothing here communicates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod layout;
pub mod mesh;

pub use error::MeshError;
pub use field::Field;
pub use layout::{AxisLayout, Boundary};
pub use mesh::{Mesh, MeshBuilder, RegionRanges};
