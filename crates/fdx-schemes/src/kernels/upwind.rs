//! Advection kernels `v * df/dx` (result times spacing).
//!
//! Centred kernels take `v` and `f` at the same location. Staggered kernels
//! take `v` half a cell off the result: `v.m` sits at `-1/2`, `v.p` at `+1/2`.

use crate::kernels::first::{self, WENO_SMALL};
use crate::stencil::{StaggeredStencil, Stencil};

/// Central, second order.
pub fn c2(v: &Stencil, f: &Stencil) -> f64 {
    v.c * first::c2(f)
}

/// Central, fourth order.
pub fn c4(v: &Stencil, f: &Stencil) -> f64 {
    v.c * first::c4(f)
}

/// First-order upwind.
pub fn u1(v: &Stencil, f: &Stencil) -> f64 {
    if v.c >= 0.0 {
        v.c * (f.c - f.m)
    } else {
        v.c * (f.p - f.c)
    }
}

/// Fourth-order upwind-biased.
pub fn u4(v: &Stencil, f: &Stencil) -> f64 {
    if v.c >= 0.0 {
        v.c * (4.0 * f.p - 12.0 * f.m + 2.0 * f.mm + 6.0 * f.c) / 12.0
    } else {
        v.c * (-4.0 * f.m + 12.0 * f.p - 2.0 * f.pp - 6.0 * f.c) / 12.0
    }
}

/// Third-order WENO.
pub fn weno3(v: &Stencil, f: &Stencil) -> f64 {
    let curv = (f.p - 2.0 * f.c + f.m).powi(2);
    let deriv = if v.c > 0.0 {
        let r = (WENO_SMALL + (f.c - 2.0 * f.m + f.mm).powi(2)) / (WENO_SMALL + curv);
        let w = 1.0 / (1.0 + 2.0 * r * r);
        0.5 * (f.p - f.m) - 0.5 * w * (-f.mm + 3.0 * f.m - 3.0 * f.c + f.p)
    } else {
        let r = (WENO_SMALL + (f.pp - 2.0 * f.p + f.c).powi(2)) / (WENO_SMALL + curv);
        let w = 1.0 / (1.0 + 2.0 * r * r);
        0.5 * (f.p - f.m) - 0.5 * w * (-f.m + 3.0 * f.c - 3.0 * f.p + f.pp)
    };
    v.c * deriv
}

/// First-order upwind with face velocities.
///
/// Forms the upwind flux difference, then removes `f * dv/dx` so the result
/// is the advective rather than the conservative form.
pub fn u1_stag(v: &StaggeredStencil, f: &Stencil) -> f64 {
    let lower = if v.m >= 0.0 { v.m * f.m } else { v.m * f.c };
    let upper = if v.p >= 0.0 { v.p * f.c } else { v.p * f.p };
    -(lower - upper) - f.c * (v.p - v.m)
}
