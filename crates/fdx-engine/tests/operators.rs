//! Operator accuracy on analytic fields.

use fdx_core::{Axis, DerivError, DiffMethod};
use fdx_engine::{ConfigError, DerivOpts, DiffOptions, Differentiator, ParallelConfig};
use fdx_mesh::{Field, Mesh};
use fdx_test_utils::{
    analytic, analytic_2d, assert_close, interior, random_field, uniform_mesh,
    uniform_mesh_with_ghosts,
};

fn build(mesh: Mesh, options: DiffOptions) -> Differentiator {
    Differentiator::from_options(mesh, &options).unwrap()
}

fn serial() -> DiffOptions {
    DiffOptions {
        parallel: ParallelConfig {
            worker_count: Some(1),
        },
        ..DiffOptions::default()
    }
}

fn with(m: DiffMethod) -> DerivOpts {
    DerivOpts::new().with_method(m)
}

// ---------------------------------------------------------------------------
// Constant fields
// ---------------------------------------------------------------------------

#[test]
fn centred_schemes_vanish_on_constants() {
    // Wide enough for the piecewise parabolic window.
    let mesh = uniform_mesh_with_ghosts(8, 6, 16, [0.1, 0.2, 0.3], 4);
    let shape = mesh.shape_3d();
    let d = build(mesh, serial());
    let f = Field::constant(shape, 3.7);
    let v = Field::constant(shape, -1.25);

    let first = [
        DiffMethod::C2,
        DiffMethod::W2,
        DiffMethod::W3,
        DiffMethod::C4,
        DiffMethod::S2,
    ];
    for axis in Axis::ALL {
        for m in first {
            let g = d.first(axis, &f, with(m)).unwrap();
            assert!(g.data().iter().all(|x| x.abs() < 1e-12), "{axis} {m}");
        }
        for m in [DiffMethod::C2, DiffMethod::C4] {
            let g = d.second(axis, &f, with(m)).unwrap();
            assert!(g.data().iter().all(|x| x.abs() < 1e-12), "{axis} {m}");
        }
        for m in [
            DiffMethod::U1,
            DiffMethod::C2,
            DiffMethod::U4,
            DiffMethod::W3,
            DiffMethod::C4,
            DiffMethod::Ppm,
        ] {
            let g = d.upwind(axis, &v, &f, with(m)).unwrap();
            assert!(g.data().iter().all(|x| x.abs() < 1e-12), "{axis} {m}");
        }
        for m in [
            DiffMethod::Split,
            DiffMethod::U1,
            DiffMethod::C2,
            DiffMethod::C4,
            DiffMethod::Nnd,
        ] {
            let g = d.flux(axis, &v, &f, with(m)).unwrap();
            assert!(g.data().iter().all(|x| x.abs() < 1e-12), "{axis} {m}");
        }
    }
    let g = d.first(Axis::Z, &f, with(DiffMethod::Fft)).unwrap();
    assert!(g.data().iter().all(|x| x.abs() < 1e-12));
}

// ---------------------------------------------------------------------------
// Polynomial exactness
// ---------------------------------------------------------------------------

#[test]
fn c4_second_derivative_is_exact_for_cubics() {
    let mesh = uniform_mesh(10, 4, 4, [0.1, 1.0, 1.0]);
    let f = analytic(&mesh, |x, _, _| x * x * x - 2.0 * x * x + x);
    let expected = analytic(&mesh, |x, _, _| 6.0 * x - 4.0);
    let region = interior(&mesh, f.shape());
    let d = build(mesh, serial());

    let g = d.second(Axis::X, &f, with(DiffMethod::C4)).unwrap();
    assert_close(&g, &expected, &region, 1e-9);
}

#[test]
fn c2_second_derivative_is_exact_for_quadratics() {
    let mesh = uniform_mesh(4, 10, 4, [1.0, 0.25, 1.0]);
    let f = analytic(&mesh, |_, y, _| 3.0 * y * y - y + 2.0);
    let expected = Field::constant(f.shape(), 6.0);
    let region = interior(&mesh, f.shape());
    let d = build(mesh, serial());

    let g = d.d2dy2(&f).unwrap();
    assert_close(&g, &expected, &region, 1e-10);
}

#[test]
fn first_derivative_schemes_reproduce_slopes() {
    let mesh = uniform_mesh(10, 4, 4, [0.2, 1.0, 1.0]);
    let f = analytic(&mesh, |x, _, _| 2.0 + 3.0 * x);
    let expected = Field::constant(f.shape(), 3.0);
    let region = interior(&mesh, f.shape());
    let d = build(mesh, serial());

    for m in [DiffMethod::C2, DiffMethod::W2, DiffMethod::W3, DiffMethod::C4, DiffMethod::S2] {
        let g = d.first(Axis::X, &f, with(m)).unwrap();
        assert_close(&g, &expected, &region, 1e-9);
    }
}

#[test]
fn fourth_derivative_of_quartic() {
    let mesh = uniform_mesh(8, 4, 4, [0.5, 1.0, 1.0]);
    let f = analytic(&mesh, |x, _, _| x.powi(4) - x * x);
    let expected = Field::constant(f.shape(), 24.0);
    let region = interior(&mesh, f.shape());
    let d = build(mesh, serial());

    assert_close(&d.d4dx4(&f).unwrap(), &expected, &region, 1e-8);
    // Constant along y.
    let g = d.d4dy4(&f).unwrap();
    assert!(g.data().iter().all(|v| v.abs() < 1e-9));
}

// ---------------------------------------------------------------------------
// Advection and flux
// ---------------------------------------------------------------------------

#[test]
fn advection_schemes_reproduce_linear_transport() {
    let mesh = uniform_mesh_with_ghosts(12, 4, 4, [0.1, 1.0, 1.0], 4);
    let f = analytic(&mesh, |x, _, _| 2.0 + 3.0 * x);
    let shape = f.shape();
    let region = interior(&mesh, shape);
    let d = build(mesh, serial());

    for speed in [1.5, -1.5] {
        let v = Field::constant(shape, speed);
        let expected = Field::constant(shape, 3.0 * speed);
        for m in [
            DiffMethod::U1,
            DiffMethod::C2,
            DiffMethod::U4,
            DiffMethod::W3,
            DiffMethod::C4,
            DiffMethod::Ppm,
        ] {
            let g = d.upwind(Axis::X, &v, &f, with(m)).unwrap();
            assert_close(&g, &expected, &region, 1e-9);
        }

        for m in [
            DiffMethod::Split,
            DiffMethod::U1,
            DiffMethod::C2,
            DiffMethod::C4,
            DiffMethod::Nnd,
        ] {
            let g = d.flux(Axis::X, &v, &f, with(m)).unwrap();
            assert_close(&g, &expected, &region, 1e-9);
        }
    }
}

#[test]
fn split_flux_is_advection_plus_compression() {
    let mesh = uniform_mesh(8, 8, 8, [0.3, 0.2, 0.1]);
    let shape = mesh.shape_3d();
    let mut v = random_field(shape, 11);
    let mut f = random_field(shape, 12);
    v.close_periodic_z();
    f.close_periodic_z();
    let d = build(mesh, DiffOptions::default());

    for axis in Axis::ALL {
        let opts = DerivOpts::new();
        let flux = d.flux(axis, &v, &f, opts).unwrap();
        let adv = d.upwind(axis, &v, &f, opts).unwrap();
        let dv = d.first(axis, &v, opts).unwrap();
        let expected = adv.plus(&dv.times(&f).unwrap()).unwrap();
        assert_eq!(flux.max_abs_diff(&expected), Some(0.0), "{axis}");
    }
}

#[test]
fn planar_velocity_advects_3d_field() {
    let mesh = uniform_mesh(6, 6, 8, [0.5, 0.5, 0.5]);
    let v = analytic_2d(&mesh, |_, y| 1.0 + y);
    let f = analytic(&mesh, |x, _, z| 4.0 * x + z);
    let expected = analytic(&mesh, |_, y, _| 4.0 * (1.0 + y));
    let region = interior(&mesh, f.shape());
    let d = build(mesh, serial());

    let g = d.vddx(&v, &f).unwrap();
    assert_eq!(g.shape(), f.shape());
    assert_close(&g, &expected, &region, 1e-10);
}

#[test]
fn muscl_flux_difference_of_linear_flux() {
    let mesh = uniform_mesh(10, 4, 4, [0.25, 1.0, 1.0]);
    let flux = analytic(&mesh, |x, _, _| 1.0 + 2.0 * x);
    let u = analytic(&mesh, |x, _, _| 5.0 + x);
    let vmax = Field::constant(mesh.shape_2d(), 0.5);
    let expected = Field::constant(flux.shape(), -2.0);
    let region = interior(&mesh, flux.shape());
    let d = build(mesh, serial());

    let g = d.muscl(Axis::X, &flux, &u, &vmax).unwrap();
    assert_close(&g, &expected, &region, 1e-10);
    assert_eq!(d.metrics().muscl_calls, 1);
}

// ---------------------------------------------------------------------------
// Mixed derivatives
// ---------------------------------------------------------------------------

#[test]
fn mixed_derivatives_match_discrete_forms() {
    let nz = 16;
    let dz = 2.0 * std::f64::consts::PI / nz as f64;
    let mesh = uniform_mesh(6, 6, nz, [0.2, 0.3, dz]);
    let k = 2.0;
    // C2 in z turns k into sin(k dz) / dz.
    let k_eff = (k * dz).sin() / dz;
    let expected = analytic(&mesh, |_, _, z| k_eff * (k * z).cos());
    let region = interior(&mesh, mesh.shape_3d());

    let fx = analytic(&mesh, |x, _, z| x * (k * z).sin());
    let fy = analytic(&mesh, |_, y, z| y * (k * z).sin());
    let d = build(mesh, serial());

    assert_close(&d.d2dxdz(&fx).unwrap(), &expected, &region, 1e-10);
    assert_close(&d.d2dydz(&fy).unwrap(), &expected, &region, 1e-10);
    assert!(d.d2dxdy(&fx).unwrap().data().iter().all(|&v| v == 0.0));
    assert_eq!(d.metrics().mixed_calls, 3);
}

// ---------------------------------------------------------------------------
// Fatal requests
// ---------------------------------------------------------------------------

#[test]
fn narrow_ghost_layer_is_an_under_read() {
    let mesh = Mesh::builder(8, 4, 8).x_ghosts(1).build().unwrap();
    let f = Field::zeros(mesh.shape_3d());
    let d = build(mesh, serial());

    assert!(d.ddx(&f).is_ok());
    let err = d.first(Axis::X, &f, with(DiffMethod::C4)).unwrap_err();
    assert_eq!(
        err,
        DerivError::StencilUnderRead {
            axis: Axis::X,
            required: 2,
            available: 1
        }
    );
    assert!(d.d4dx4(&f).is_err());
}

#[test]
fn fft_on_a_bounded_axis_is_rejected() {
    let mut options = serial();
    options.ddx.first = Some("FFT".to_string());
    let mesh = uniform_mesh(8, 4, 8, [1.0; 3]);
    let err = Differentiator::from_options(mesh, &options).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Deriv(DerivError::SpectralOnBoundedAxis { axis: Axis::X })
    );

    let mesh = uniform_mesh(8, 4, 8, [1.0; 3]);
    let f = Field::zeros(mesh.shape_3d());
    let d = build(mesh, serial());
    let err = d.first(Axis::Y, &f, with(DiffMethod::Fft)).unwrap_err();
    assert_eq!(err, DerivError::SpectralOnBoundedAxis { axis: Axis::Y });
}

#[test]
fn mismatched_operands_are_rejected() {
    let mesh = uniform_mesh(8, 4, 8, [1.0; 3]);
    let f = Field::zeros(mesh.shape_3d());
    let d = build(mesh, serial());
    let other = Field::zeros([5, 5, 5]);
    assert!(matches!(
        d.vddx(&other, &f),
        Err(DerivError::ShapeMismatch { .. })
    ));
}

// ---------------------------------------------------------------------------
// Parallel determinism
// ---------------------------------------------------------------------------

#[test]
fn worker_count_does_not_change_results() {
    let opts = |n| DiffOptions {
        parallel: ParallelConfig {
            worker_count: Some(n),
        },
        ..DiffOptions::default()
    };
    let mesh = uniform_mesh_with_ghosts(12, 10, 16, [0.1, 0.2, 0.3], 4);
    let shape = mesh.shape_3d();
    let one = build(mesh.clone(), opts(1));
    let many = build(mesh, opts(4));
    assert_eq!(many.worker_count(), 4);

    let mut f = random_field(shape, 3);
    let mut v = random_field(shape, 4);
    f.close_periodic_z();
    v.close_periodic_z();

    for axis in Axis::ALL {
        assert_eq!(
            one.first(axis, &f, with(DiffMethod::W3)).unwrap(),
            many.first(axis, &f, with(DiffMethod::W3)).unwrap()
        );
        assert_eq!(
            one.second(axis, &f, DerivOpts::new()).unwrap(),
            many.second(axis, &f, DerivOpts::new()).unwrap()
        );
        assert_eq!(
            one.upwind(axis, &v, &f, with(DiffMethod::Ppm)).unwrap(),
            many.upwind(axis, &v, &f, with(DiffMethod::Ppm)).unwrap()
        );
        assert_eq!(
            one.flux(axis, &v, &f, with(DiffMethod::Nnd)).unwrap(),
            many.flux(axis, &v, &f, with(DiffMethod::Nnd)).unwrap()
        );
    }
    assert_eq!(
        one.first(Axis::Z, &f, with(DiffMethod::Fft)).unwrap(),
        many.first(Axis::Z, &f, with(DiffMethod::Fft)).unwrap()
    );
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn central_first_derivative_is_linear(
            alpha in -4.0f64..4.0,
            seed in 0u64..1000,
        ) {
            let mesh = uniform_mesh(6, 5, 8, [0.3, 0.4, 0.5]);
            let shape = mesh.shape_3d();
            let d = build(mesh, serial());
            let mut f = random_field(shape, seed);
            let mut g = random_field(shape, seed + 1);
            f.close_periodic_z();
            g.close_periodic_z();

            for axis in Axis::ALL {
                let combined = f.map(|v| alpha * v).plus(&g).unwrap();
                let lhs = d.first(axis, &combined, DerivOpts::new()).unwrap();
                let mut rhs = d.first(axis, &f, DerivOpts::new()).unwrap();
                rhs.scale(alpha);
                let rhs = rhs.plus(&d.first(axis, &g, DerivOpts::new()).unwrap()).unwrap();
                prop_assert!(lhs.max_abs_diff(&rhs).unwrap() < 1e-10);
            }
        }

        #[test]
        fn slopes_are_recovered_for_any_line(
            offset in -10.0f64..10.0,
            slope in -5.0f64..5.0,
        ) {
            let mesh = uniform_mesh(8, 4, 4, [0.25, 1.0, 1.0]);
            let f = analytic(&mesh, |x, _, _| offset + slope * x);
            let region = interior(&mesh, f.shape());
            let d = build(mesh, serial());
            let g = d.first(Axis::X, &f, with(DiffMethod::C4)).unwrap();
            for x in region[0].clone() {
                prop_assert!((g.get(x, 2, 1) - slope).abs() < 1e-9);
            }
        }
    }
}
