//! Flux-conservative kernels `d(v f)/dx` (result times spacing).

use crate::stencil::{StaggeredStencil, Stencil};

/// First-order upwind flux difference.
///
/// Face velocities are averaged from the neighbouring centres. The result is
/// the upper face flux minus the lower face flux.
pub fn u1(v: &Stencil, f: &Stencil) -> f64 {
    let vs = 0.5 * (v.m + v.c);
    let lower = if vs >= 0.0 { vs * f.m } else { vs * f.c };
    let vs = 0.5 * (v.c + v.p);
    let upper = if vs >= 0.0 { vs * f.c } else { vs * f.p };
    upper - lower
}

/// Central, second order.
pub fn c2(v: &Stencil, f: &Stencil) -> f64 {
    0.5 * (v.p * f.p - v.m * f.m)
}

/// Central, fourth order.
pub fn c4(v: &Stencil, f: &Stencil) -> f64 {
    (8.0 * v.p * f.p - 8.0 * v.m * f.m + v.mm * f.mm - v.pp * f.pp) / 12.0
}

fn minmod(a: f64, b: f64) -> f64 {
    if a * b <= 0.0 {
        0.0
    } else if a.abs() < b.abs() {
        a
    } else {
        b
    }
}

/// Non-oscillatory, no free parameters, dissipative (NND).
///
/// Splits `v f` into positive and negative parts and reconstructs each at
/// the faces with a minmod limiter.
pub fn nnd(v: &Stencil, f: &Stencil) -> f64 {
    let plus = |vi: f64, fi: f64| 0.5 * (vi + vi.abs()) * fi;
    let minus = |vi: f64, fi: f64| 0.5 * (vi - vi.abs()) * fi;

    let fp = plus(v.c, f.c);
    let fm = minus(v.c, f.c);
    let fp1 = plus(v.p, f.p);
    let fm1 = minus(v.p, f.p);
    let fm2 = minus(v.pp, f.pp);
    let fp_1 = plus(v.m, f.m);
    let fm_1 = minus(v.m, f.m);
    let fp_2 = plus(v.mm, f.mm);

    let flp = fp + 0.5 * minmod(fp1 - fp, fp - fp_1);
    let frp = fm1 - 0.5 * minmod(fm1 - fm, fm2 - fm1);
    let flm = fp_1 + 0.5 * minmod(fp - fp_1, fp_1 - fp_2);
    let frm = fm - 0.5 * minmod(fm - fm_1, fm1 - fm);

    (flp + frp) - (flm + frm)
}

/// First-order upwind flux difference with face velocities.
pub fn u1_stag(v: &StaggeredStencil, f: &Stencil) -> f64 {
    let lower = if v.m >= 0.0 { v.m * f.m } else { v.m * f.c };
    let upper = if v.p >= 0.0 { v.p * f.c } else { v.p * f.p };
    upper - lower
}
