//! Second- and fourth-derivative kernels (result times spacing squared, or
//! to the fourth power).

use crate::stencil::{StaggeredStencil, Stencil};

/// Central, second order.
pub fn c2(f: &Stencil) -> f64 {
    f.p + f.m - 2.0 * f.c
}

/// Central, fourth order.
pub fn c4(f: &Stencil) -> f64 {
    (-f.pp + 16.0 * f.p - 30.0 * f.c + 16.0 * f.m - f.mm) / 12.0
}

/// Staggered, fourth order.
pub fn c4_stag(f: &StaggeredStencil) -> f64 {
    (f.pp + f.mm - f.p - f.m) / 2.0
}

/// Fourth derivative, central second order.
pub fn d4_c2(f: &Stencil) -> f64 {
    f.pp - 4.0 * f.p + 6.0 * f.c - 4.0 * f.m + f.mm
}
