//! fdx: finite-difference differential operators for structured grids.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all fdx sub-crates. For most users, adding `fdx` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use fdx::prelude::*;
//!
//! // 32 x 8 interior points, 16 periodic z points, two ghost cells.
//! let mesh = Mesh::builder(32, 8, 16)
//!     .uniform_spacing(0.1, 0.1, 0.25)
//!     .build()
//!     .unwrap();
//! let shape = mesh.shape_3d();
//!
//! let options = DiffOptions::from_json(r#"{ "ddx": { "first": "C4" } }"#).unwrap();
//! let d = Differentiator::from_options(mesh, &options).unwrap();
//!
//! // f = 2 x in storage units of 0.1.
//! let f = Field::from_fn(shape, |x, _, _| 0.2 * x as f64);
//! let dfdx = d.ddx(&f).unwrap();
//! assert!((dfdx.get(10, 4, 3) - 2.0).abs() < 1e-12);
//!
//! let d2 = d.second(Axis::X, &f, DerivOpts::new()).unwrap();
//! assert!(d2.get(10, 4, 3).abs() < 1e-9);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `fdx-core` | Axes, cell locations, method identifiers, `DerivError` |
//! | [`mesh`] | `fdx-mesh` | Fields, axis layouts, meshes and spacing |
//! | [`schemes`] | `fdx-schemes` | Stencils, kernels and the scheme registry |
//! | [`engine`] | `fdx-engine` | Configuration and the `Differentiator` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Axes, cell locations, method identifiers and errors (`fdx-core`).
pub use fdx_core as types;

/// Fields and meshes (`fdx-mesh`).
///
/// [`mesh::Mesh`] describes the grid, [`mesh::Field`] holds values on it.
pub use fdx_mesh as mesh;

/// Stencil kernels and the scheme registry (`fdx-schemes`).
///
/// Build a custom [`schemes::Registry`] to add or replace kernels, then
/// resolve it with [`engine::DiffConfig::resolve`].
pub use fdx_schemes as schemes;

/// Configuration and operators (`fdx-engine`).
pub use fdx_engine as engine;

/// Common imports for typical fdx usage.
///
/// ```rust
/// use fdx::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use fdx_core::{Alignment, Axis, CellLocation, DerivError, DiffMethod, OperatorClass};

    // Mesh
    pub use fdx_mesh::{Field, Mesh, MeshBuilder, MeshError};

    // Schemes
    pub use fdx_schemes::{InterpScheme, Registry};

    // Engine
    pub use fdx_engine::{
        ConfigError, DerivOpts, DiffConfig, DiffOptions, Differentiator, MetricsSnapshot,
    };
}
