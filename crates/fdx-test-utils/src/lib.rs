//! Test fixtures for fdx development.
//!
//! Meshes with uniform spacing, fields sampled from analytic functions,
//! seeded random fields, and closeness assertions restricted to a region.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::ops::Range;

use fdx_core::Axis;
use fdx_mesh::{Field, Mesh};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A mesh with two ghost cells on x and y, periodic z, and constant
/// spacing `[dx, dy, dz]`.
pub fn uniform_mesh(nx: usize, ny: usize, nz: usize, spacing: [f64; 3]) -> Mesh {
    Mesh::builder(nx, ny, nz)
        .uniform_spacing(spacing[0], spacing[1], spacing[2])
        .build()
        .expect("fixture mesh must be valid")
}

/// Like [`uniform_mesh`], with `ghosts` cells on each side of x and y.
pub fn uniform_mesh_with_ghosts(
    nx: usize,
    ny: usize,
    nz: usize,
    spacing: [f64; 3],
    ghosts: usize,
) -> Mesh {
    Mesh::builder(nx, ny, nz)
        .x_ghosts(ghosts)
        .y_ghosts(ghosts)
        .uniform_spacing(spacing[0], spacing[1], spacing[2])
        .build()
        .expect("fixture mesh must be valid")
}

/// Physical coordinate of storage index `i` along `axis` on a uniform
/// mesh. The first interior point sits at zero; ghosts are negative.
pub fn coordinate(mesh: &Mesh, axis: Axis, i: usize) -> f64 {
    let start = mesh.layout(axis).interior_range().start as f64;
    (i as f64 - start) * mesh.spacing(axis, 0, 0)
}

/// A 3D field sampled from `f(x, y, z)` at every stored point.
pub fn analytic(mesh: &Mesh, f: impl Fn(f64, f64, f64) -> f64) -> Field {
    Field::from_fn(mesh.shape_3d(), |x, y, z| {
        f(
            coordinate(mesh, Axis::X, x),
            coordinate(mesh, Axis::Y, y),
            coordinate(mesh, Axis::Z, z),
        )
    })
}

/// A planar field sampled from `f(x, y)`.
pub fn analytic_2d(mesh: &Mesh, f: impl Fn(f64, f64) -> f64) -> Field {
    Field::from_fn(mesh.shape_2d(), |x, y, _| {
        f(coordinate(mesh, Axis::X, x), coordinate(mesh, Axis::Y, y))
    })
}

/// Uniform random values in `[-1, 1)`, reproducible from `seed`.
///
/// If `shape` has a periodic closure point the caller should call
/// [`Field::close_periodic_z`] afterwards.
pub fn random_field(shape: [usize; 3], seed: u64) -> Field {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Field::from_fn(shape, |_, _, _| rng.gen_range(-1.0..1.0))
}

/// Largest `|actual - expected|` over the storage box `ranges`.
pub fn max_error(actual: &Field, expected: &Field, ranges: &[Range<usize>; 3]) -> f64 {
    assert_eq!(actual.shape(), expected.shape(), "shape mismatch");
    let mut worst = 0.0_f64;
    for x in ranges[0].clone() {
        for y in ranges[1].clone() {
            for z in ranges[2].clone() {
                worst = worst.max((actual.get(x, y, z) - expected.get(x, y, z)).abs());
            }
        }
    }
    worst
}

/// Assert `actual` matches `expected` to within `tol` over `ranges`.
///
/// Reports the first offending point.
#[track_caller]
pub fn assert_close(actual: &Field, expected: &Field, ranges: &[Range<usize>; 3], tol: f64) {
    assert_eq!(actual.shape(), expected.shape(), "shape mismatch");
    for x in ranges[0].clone() {
        for y in ranges[1].clone() {
            for z in ranges[2].clone() {
                let (a, e) = (actual.get(x, y, z), expected.get(x, y, z));
                assert!(
                    (a - e).abs() <= tol,
                    "at ({x}, {y}, {z}): got {a}, expected {e} (tol {tol})"
                );
            }
        }
    }
}

/// Storage box of the owned interior of a field of `shape`.
pub fn interior(mesh: &Mesh, shape: [usize; 3]) -> [Range<usize>; 3] {
    [
        mesh.layout_in(Axis::X, shape).interior_range(),
        mesh.layout_in(Axis::Y, shape).interior_range(),
        mesh.layout_in(Axis::Z, shape).interior_range(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_interior_point_is_origin() {
        let mesh = uniform_mesh(4, 4, 8, [0.5, 0.25, 0.1]);
        assert_eq!(coordinate(&mesh, Axis::X, 2), 0.0);
        assert_eq!(coordinate(&mesh, Axis::X, 0), -1.0);
        assert!((coordinate(&mesh, Axis::Z, 3) - 0.3).abs() < 1e-15);
    }

    #[test]
    fn random_fields_are_reproducible() {
        let a = random_field([3, 3, 3], 7);
        let b = random_field([3, 3, 3], 7);
        let c = random_field([3, 3, 3], 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.data().iter().all(|v| (-1.0..1.0).contains(v)));
    }

    #[test]
    fn interior_box_skips_ghosts() {
        let mesh = uniform_mesh(4, 5, 8, [1.0; 3]);
        let b = interior(&mesh, mesh.shape_3d());
        assert_eq!(b, [2..6, 2..7, 0..8]);
        let b = interior(&mesh, mesh.shape_2d());
        assert_eq!(b[2], 0..1);
    }

    #[test]
    fn wide_ghost_fixture_keeps_the_origin_on_the_interior() {
        let mesh = uniform_mesh_with_ghosts(4, 5, 8, [0.5; 3], 4);
        assert_eq!(interior(&mesh, mesh.shape_3d()), [4..8, 4..9, 0..8]);
        assert_eq!(coordinate(&mesh, Axis::X, 4), 0.0);
        assert_eq!(coordinate(&mesh, Axis::Y, 0), -2.0);
    }
}
