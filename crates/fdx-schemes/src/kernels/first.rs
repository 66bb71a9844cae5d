//! First-derivative kernels (result times spacing).

use crate::kernels::upwind::weno3;
use crate::stencil::{StaggeredStencil, Stencil};

/// Floor added to WENO smoothness indicators.
pub const WENO_SMALL: f64 = 1.0e-8;

/// Central, second order.
pub fn c2(f: &Stencil) -> f64 {
    0.5 * (f.p - f.m)
}

/// Central, fourth order.
pub fn c4(f: &Stencil) -> f64 {
    (8.0 * f.p - 8.0 * f.m + f.mm - f.pp) / 12.0
}

/// Central WENO, second order. Drops to first order near discontinuities.
pub fn cweno2(f: &Stencil) -> f64 {
    let dc = 0.5 * (f.p - f.m);
    let dl = f.c - f.m;
    let dr = f.p - f.c;

    let isl = dl * dl;
    let isr = dr * dr;
    let isc = (13.0 / 3.0) * (f.p - 2.0 * f.c + f.m).powi(2) + 0.25 * (f.p - f.m).powi(2);

    let al = 0.25 / (WENO_SMALL + isl).powi(2);
    let ar = 0.25 / (WENO_SMALL + isr).powi(2);
    let ac = 0.5 / (WENO_SMALL + isc).powi(2);

    (al * dl + ar * dr + ac * dc) / (al + ar + ac)
}

/// Central WENO, third order, built from two upwind WENO-3 evaluations on
/// a Lax-Friedrichs split of `f`.
pub fn cweno3(f: &Stencil) -> f64 {
    let ma = f.max_abs();
    let sp = f.map(|v| v + ma);
    let sm = f.map(|v| ma - v);
    let vp = Stencil {
        c: 0.5,
        ..Stencil::default()
    };
    let vm = Stencil {
        c: -0.5,
        ..Stencil::default()
    };
    weno3(&vp, &sp) + weno3(&vm, &sm)
}

/// Fourth-order central plus a sign-of-centre fourth-difference smoothing term.
pub fn s2(f: &Stencil) -> f64 {
    let sign = if f.c > 0.0 { 1.0 } else { -1.0 };
    c4(f) + sign * (f.pp - 4.0 * f.p + 6.0 * f.c - 4.0 * f.m + f.mm) / 12.0
}

/// Staggered, second order.
pub fn c2_stag(f: &StaggeredStencil) -> f64 {
    f.p - f.m
}

/// Staggered, fourth order.
pub fn c4_stag(f: &StaggeredStencil) -> f64 {
    (27.0 * (f.p - f.m) - (f.pp - f.mm)) / 24.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn central_schemes_vanish_on_constants() {
        let f = Stencil::constant(3.7);
        assert_eq!(c2(&f), 0.0);
        assert_eq!(c4(&f), 0.0);
        assert!(close(cweno2(&f), 0.0, 1e-14));
        assert!(close(cweno3(&f), 0.0, 1e-12), "cweno3 = {}", cweno3(&f));
        assert_eq!(c2_stag(&StaggeredStencil::constant(3.7)), 0.0);
        assert_eq!(c4_stag(&StaggeredStencil::constant(3.7)), 0.0);
    }

    #[test]
    fn c4_exact_for_cubics() {
        let f = Stencil::sample(|x| 2.0 + x - 0.5 * x * x + 0.25 * x * x * x);
        // f'(0) = 1
        assert!(close(c4(&f), 1.0, 1e-13), "c4 = {}", c4(&f));
    }

    #[test]
    fn c2_exact_for_quadratics() {
        let f = Stencil::sample(|x| 1.0 - 3.0 * x + 4.0 * x * x);
        assert!(close(c2(&f), -3.0, 1e-14));
    }

    #[test]
    fn weno_schemes_reproduce_linear_slope() {
        let f = Stencil::sample(|x| 5.0 + 2.0 * x);
        assert!(close(cweno2(&f), 2.0, 1e-10), "cweno2 = {}", cweno2(&f));
        assert!(close(cweno3(&f), 2.0, 1e-10), "cweno3 = {}", cweno3(&f));
    }

    #[test]
    fn s2_adds_nothing_on_cubics() {
        // Fourth difference of a cubic is zero.
        let f = Stencil::sample(|x| 1.0 + x * x * x);
        assert!(close(s2(&f), c4(&f), 1e-13));
    }

    #[test]
    fn staggered_kernels_exact_for_cubics() {
        let f = StaggeredStencil::sample(|x| x * x * x - x);
        // f'(0) = -1
        assert!(close(c4_stag(&f), -1.0, 1e-13), "c4_stag = {}", c4_stag(&f));
        let g = StaggeredStencil::sample(|x| 3.0 * x + x * x);
        assert!(close(c2_stag(&g), 3.0, 1e-14));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn centred_schemes_recover_any_slope(a in -50.0f64..50.0, b in -20.0f64..20.0) {
                let f = Stencil::sample(|x| a + b * x);
                let kernels: [(&str, fn(&Stencil) -> f64); 5] =
                    [("c2", c2), ("c4", c4), ("w2", cweno2), ("w3", cweno3), ("s2", s2)];
                for (name, k) in kernels {
                    let d = k(&f);
                    prop_assert!(close(d, b, 1e-9 * (1.0 + a.abs())), "{name}: {d} vs {b}");
                }
            }
        }
    }
}
