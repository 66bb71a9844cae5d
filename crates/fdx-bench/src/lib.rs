//! Benchmark profiles for the fdx operators.
//!
//! - [`reference_mesh`]: 64x64 interior, 32 periodic z points (~130K points)
//! - [`wide_reference_mesh`]: the reference mesh with four ghost cells
//! - [`stress_mesh`]: 128x128 interior, 64 periodic z points (~1M points)
//! - [`profile_field`]: smooth deterministic field for a mesh
//! - [`profile_options`]: operator options with a fixed worker count

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::f64::consts::PI;

use fdx_core::Axis;
use fdx_engine::{DiffOptions, ParallelConfig};
use fdx_mesh::{Field, Mesh, MeshError};

/// Reference benchmark mesh: 64x64x32, two ghost cells, periodic z of
/// length 2pi.
pub fn reference_mesh() -> Result<Mesh, MeshError> {
    cube(64, 32, 2)
}

/// The reference mesh with four ghost cells on x and y, wide enough for
/// piecewise parabolic advection.
pub fn wide_reference_mesh() -> Result<Mesh, MeshError> {
    cube(64, 32, 4)
}

/// Stress benchmark mesh: 128x128x64.
pub fn stress_mesh() -> Result<Mesh, MeshError> {
    cube(128, 64, 2)
}

fn cube(n: usize, nz: usize, ghosts: usize) -> Result<Mesh, MeshError> {
    let h = 1.0 / n as f64;
    Mesh::builder(n, n, nz)
        .x_ghosts(ghosts)
        .y_ghosts(ghosts)
        .uniform_spacing(h, h, 2.0 * PI / nz as f64)
        .build()
}

/// A smooth field with structure along every axis.
///
/// The periodic closure point is filled, so the field can go straight into
/// spectral operators.
pub fn profile_field(mesh: &Mesh, phase: f64) -> Field {
    let coord = |axis: Axis, i: usize| {
        let start = mesh.layout(axis).interior_range().start as f64;
        (i as f64 - start) * mesh.spacing(axis, 0, 0)
    };
    let mut f = Field::from_fn(mesh.shape_3d(), |x, y, z| {
        let (x, y, z) = (coord(Axis::X, x), coord(Axis::Y, y), coord(Axis::Z, z));
        (2.0 * PI * x + phase).sin() * (2.0 * PI * y).cos() + (3.0 * z).sin()
    });
    f.close_periodic_z();
    f
}

/// Default schemes with `workers` threads.
pub fn profile_options(workers: usize) -> DiffOptions {
    DiffOptions {
        parallel: ParallelConfig {
            worker_count: Some(workers),
        },
        ..DiffOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_mesh_builds() {
        let mesh = reference_mesh().unwrap();
        assert_eq!(mesh.shape_3d(), [68, 68, 33]);
    }

    #[test]
    fn wide_reference_mesh_builds() {
        let mesh = wide_reference_mesh().unwrap();
        assert_eq!(mesh.shape_3d(), [72, 72, 33]);
    }

    #[test]
    fn stress_mesh_builds() {
        let mesh = stress_mesh().unwrap();
        assert_eq!(mesh.shape_3d(), [132, 132, 65]);
    }

    #[test]
    fn profile_field_is_closed() {
        let mesh = reference_mesh().unwrap();
        let f = profile_field(&mesh, 0.3);
        let line = f.z_line(10, 10);
        assert_eq!(line[0], line[32]);
    }

    #[test]
    fn profile_options_pin_workers() {
        assert_eq!(profile_options(3).parallel.resolved_worker_count(), 3);
    }
}
