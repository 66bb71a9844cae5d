//! Core types for the fdx finite-difference operator engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by every other crate in the workspace: grid axes,
//! staggered cell locations, differencing method codes, operator classes,
//! and the [`DerivError`] type returned by every operator.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod location;
pub mod method;

pub use error::DerivError;
pub use location::{Axis, CellLocation};
pub use method::{Alignment, DiffMethod, OperatorClass};
