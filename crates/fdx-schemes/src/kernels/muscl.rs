//! Kurganov-Tadmor central scheme with MUSCL reconstruction.

use crate::stencil::Stencil;

/// Superbee slope limiter.
pub fn superbee(r: f64) -> f64 {
    0.0_f64.max((2.0 * r).min(1.0)).max(r.min(2.0))
}

/// Limited left/right states at the faces `i - 1/2` and `i + 1/2`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Faces {
    left_plus: f64,
    right_plus: f64,
    left_minus: f64,
    right_minus: f64,
}

// Zero denominators give infinite or NaN ratios. The limiter maps those to
// a finite slope, and each slope multiplies the zero difference again.
fn reconstruct(f: &Stencil) -> Faces {
    let phi = superbee((f.c - f.m) / (f.p - f.c));
    let phi_m = superbee((f.m - f.mm) / (f.c - f.m));
    let phi_p = superbee((f.p - f.c) / (f.pp - f.p));

    Faces {
        left_plus: f.c + 0.5 * phi * (f.p - f.c),
        right_plus: f.p - 0.5 * phi_p * (f.pp - f.p),
        left_minus: f.m + 0.5 * phi_m * (f.c - f.m),
        right_minus: f.c - 0.5 * phi * (f.p - f.c),
    }
}

/// Flux difference `F(i-1/2) - F(i+1/2)` for `du/dt = -dF/dx`, given the
/// flux `f`, the conserved quantity `u` and the local maximum speed `vmax`.
///
/// The result is times spacing.
pub fn kt(f: &Stencil, u: &Stencil, vmax: f64) -> f64 {
    let uf = reconstruct(u);
    let ff = reconstruct(f);

    let fm = 0.5 * (ff.right_minus + ff.left_minus - vmax * (uf.right_minus - uf.left_minus));
    let fp = 0.5 * (ff.right_plus + ff.left_plus - vmax * (uf.right_plus - uf.left_plus));

    fm - fp
}
