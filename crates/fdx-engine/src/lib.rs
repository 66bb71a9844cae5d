//! Differential operator engine for structured grids.
//!
//! Provides the [`Differentiator`], which applies first, second and fourth
//! derivatives, advection, flux and mixed-derivative operators along the
//! three axes of a [`Mesh`](fdx_mesh::Mesh). Scheme choice is resolved once
//! from [`DiffOptions`] into an immutable [`DiffConfig`]. Staggered
//! locations are handled by interpolating around staggered kernels, and
//! the periodic z axis can be differentiated spectrally.
//!
//! Points are evaluated in parallel on a rayon pool owned by the
//! differentiator. Results do not depend on the worker count.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod apply;
pub mod config;
pub mod diff;
mod extract;
pub mod metrics;
mod resolve;
mod spectral;

pub use config::{AxisOptions, ConfigError, DiffConfig, DiffOptions, ParallelConfig};
pub use diff::{DerivOpts, Differentiator};
pub use metrics::{MetricsSnapshot, OperatorMetrics};
