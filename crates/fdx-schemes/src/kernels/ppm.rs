//! Piecewise parabolic advection along a whole grid line.
//!
//! Unlike the point kernels this needs every face value of the line before
//! any result can be formed, so it works on a padded copy of the line and
//! writes finished (already spacing-divided) results.

/// Padding on each side of the line slices.
pub const PPM_PAD: usize = 4;

/// Curvature limiter constant.
const C_LIM: f64 = 1.25;

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Advection `u * da/dx` on one line by the piecewise parabolic method
/// with a zero time step.
///
/// `a`, `u` and `h` (spacing) hold the line with [`PPM_PAD`] samples of
/// padding on each side; `out` receives the `a.len() - 2 * PPM_PAD` interior
/// results. The padding holds real neighbours: ghost cells on bounded axes,
/// wrapped samples on periodic ones.
///
/// # Panics
///
/// Panics if the slice lengths are inconsistent.
pub fn advect_line(a: &[f64], u: &[f64], h: &[f64], out: &mut [f64]) {
    let n = out.len();
    let len = n + 2 * PPM_PAD;
    assert!(
        a.len() == len && u.len() == len && h.len() == len,
        "ppm line slices must hold {len} samples"
    );

    // Limited interface values: a2[x] sits at x + 1/2.
    let mut a2 = vec![0.0; len];
    for x in PPM_PAD - 2..=PPM_PAD + n {
        let h2 = h[x] * h[x];
        let mut v = 37.0 / 60.0 * (a[x] + a[x + 1]) - 2.0 / 15.0 * (a[x - 1] + a[x + 2])
            + 1.0 / 60.0 * (a[x - 2] + a[x + 3]);
        let lo = a[x].min(a[x + 1]);
        let hi = a[x].max(a[x + 1]);
        if !(v >= lo && v <= hi) {
            let d2a = 3.0 / h2 * (a[x] - 2.0 * v + a[x + 1]);
            let d2al = (a[x - 1] - 2.0 * a[x] + a[x + 1]) / h2;
            let d2ar = (a[x] - 2.0 * a[x + 1] + a[x + 2]) / h2;
            let lim = if d2a * d2al > 0.0 && d2a * d2ar > 0.0 {
                sign(d2a) * (C_LIM * d2al.abs().min(d2ar.abs())).min(d2a.abs())
            } else {
                0.0
            };
            v = 0.5 * (a[x] + a[x + 1]) - h2 / 3.0 * lim;
        }
        a2[x] = v;
    }

    // Parabola edges per cell.
    let mut ap = vec![0.0; len];
    let mut am = vec![0.0; len];
    for x in PPM_PAD - 1..=PPM_PAD + n {
        let h2 = h[x] * h[x];
        let ax = a[x];
        let mut p = a2[x];
        let mut m = a2[x - 1];

        if (p - ax) * (ax - m) <= 0.0 && (a[x - 1] - ax) * (ax - a[x + 1]) <= 0.0 {
            // Local extremum: limit the parabola curvature.
            let d2a = -2.0 / h2 * (6.0 * ax - 3.0 * (p + m));
            let d2ac = (a[x - 1] - 2.0 * ax + a[x + 1]) / h2;
            let d2al = (a[x - 2] - 2.0 * a[x - 1] + ax) / h2;
            let d2ar = (ax - 2.0 * a[x + 1] + a[x + 2]) / h2;
            let lim = if d2a * d2ac > 0.0 && d2a * d2al > 0.0 && d2a * d2ar > 0.0 {
                sign(d2a)
                    * (C_LIM * d2al.abs().min(d2ar.abs())).min((C_LIM * d2ac.abs()).min(d2a.abs()))
            } else {
                0.0
            };
            let ratio = if d2a != 0.0 { lim / d2a } else { 0.0 };
            p = ax + (p - ax) * ratio;
            m = ax + (m - ax) * ratio;
        } else {
            // Keep the parabola monotone inside the cell.
            let s = sign(a[x + 1] - a[x - 1]);
            let alpha_p = p - ax;
            let alpha_m = m - ax;
            if alpha_p.abs() >= 2.0 * alpha_m.abs() {
                let delta_f = -alpha_p * alpha_p / (4.0 * (alpha_p + alpha_m));
                let delta_a = a[x + 1] - ax;
                if delta_f >= s * delta_a {
                    p = ax
                        - (2.0 * delta_a
                            + 2.0 * s * (delta_a * delta_a - delta_a * alpha_m).abs().sqrt());
                }
            } else if alpha_m.abs() >= 2.0 * alpha_p.abs() {
                let delta_f = -alpha_m * alpha_m / (4.0 * (alpha_p + alpha_m));
                let delta_a = a[x - 1] - ax;
                if delta_f >= s * delta_a {
                    m = ax
                        - (2.0 * delta_a
                            + 2.0 * s * (delta_a * delta_a - delta_a * alpha_p).abs().sqrt());
                }
            }
        }
        ap[x] = p;
        am[x] = m;
    }

    // Upwinded face value at x + 1/2.
    let face = |x: usize| -> f64 {
        if u[x] >= 0.0 {
            ap[x]
        } else if u[x + 1] < 0.0 {
            am[x + 1]
        } else {
            0.5 * (ap[x] + am[x + 1])
        }
    };

    for (k, o) in out.iter_mut().enumerate() {
        let x = k + PPM_PAD;
        *o = u[x] / h[x] * (face(x) - face(x - 1));
    }
}
