//! Parallel pointwise driver.
//!
//! The result buffer is split into z-lines; each rayon task owns one line
//! and reads only immutable inputs, so the output does not depend on the
//! number of workers.

use fdx_core::CellLocation;
use fdx_mesh::{Field, RegionRanges};
use rayon::prelude::*;
use rayon::ThreadPool;

/// Evaluate `eval` at every point of `region` and zero elsewhere.
///
/// When `close_z` is set the last z sample of each line is overwritten
/// with the first (periodic closure point). Returns the result and the
/// number of points evaluated.
pub(crate) fn pointwise<F>(
    pool: &ThreadPool,
    shape: [usize; 3],
    region: &RegionRanges,
    location: CellLocation,
    close_z: bool,
    eval: F,
) -> (Field, u64)
where
    F: Fn(usize, usize, usize) -> f64 + Sync,
{
    let mut out = Field::zeros(shape).with_location(location);
    let [_, ny, nz] = shape;

    pool.install(|| {
        out.data_mut()
            .par_chunks_mut(nz)
            .enumerate()
            .for_each(|(col, line)| {
                let (x, y) = (col / ny, col % ny);
                if !region[0].contains(&x) || !region[1].contains(&y) {
                    return;
                }
                for z in region[2].clone() {
                    line[z] = eval(x, y, z);
                }
            });
    });

    if close_z && nz > 1 {
        out.close_periodic_z();
    }
    let points = region.iter().map(|r| r.len() as u64).product();
    (out, points)
}

/// Larger of two operand shapes (a 3D operand wins over a planar one).
pub(crate) fn wider(a: [usize; 3], b: [usize; 3]) -> [usize; 3] {
    if a[2] >= b[2] {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn pool(threads: usize) -> ThreadPool {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
    }

    #[test]
    fn points_outside_region_are_zero() {
        let region: RegionRanges = smallvec![1..3, 0..2, 1..2];
        let (f, points) = pointwise(&pool(2), [4, 2, 3], &region, CellLocation::XLow, false, |x, y, z| {
            (x + y + z) as f64
        });
        assert_eq!(points, 4);
        assert_eq!(f.location(), CellLocation::XLow);
        assert_eq!(f.z_line(0, 0), &[0.0, 0.0, 0.0]);
        assert_eq!(f.z_line(2, 1), &[0.0, 4.0, 0.0]);
    }

    #[test]
    fn closure_point_is_copied() {
        let region: RegionRanges = smallvec![0..1, 0..1, 0..3];
        let (f, _) = pointwise(&pool(1), [1, 1, 4], &region, CellLocation::Centre, true, |_, _, z| {
            z as f64 + 1.0
        });
        assert_eq!(f.z_line(0, 0), &[1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn worker_count_does_not_change_results() {
        let region: RegionRanges = smallvec![0..8, 0..8, 0..5];
        let eval = |x: usize, y: usize, z: usize| ((x * 7 + y * 3 + z) as f64).sin() / 3.0;
        let (a, _) = pointwise(&pool(1), [8, 8, 5], &region, CellLocation::Centre, false, eval);
        let (b, _) = pointwise(&pool(4), [8, 8, 5], &region, CellLocation::Centre, false, eval);
        assert_eq!(a, b);
    }

    #[test]
    fn wider_prefers_3d() {
        assert_eq!(wider([4, 4, 1], [4, 4, 9]), [4, 4, 9]);
        assert_eq!(wider([4, 4, 9], [4, 4, 1]), [4, 4, 9]);
    }
}
