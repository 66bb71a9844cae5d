//! FFT differentiation along the periodic z axis.
//!
//! [`Spectral`] plans its transforms once, at construction, and keeps a
//! pool of per-worker scratch buffers that grows on demand and is reused
//! across calls. The pool is locked once per call, grown before the
//! parallel region, and each worker then owns one disjoint set of buffers.

use std::f64::consts::PI;
use std::sync::{Arc, Mutex, PoisonError};

use fdx_core::CellLocation;
use fdx_mesh::{Field, RegionRanges};
use num_complex::Complex64;
use rayon::prelude::*;
use rayon::ThreadPool;
use rustfft::{Fft, FftPlanner};

use crate::extract::Shift;

/// Modes with `|m| > FILTER_FRACTION * n` are damped.
const FILTER_FRACTION: f64 = 0.4;

/// Damping factor applied to filtered modes.
const FILTER_DAMPING: f64 = 1e-10;

/// Spectral operator order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Order {
    First,
    Second,
}

/// Buffers owned by one worker for the duration of a call.
#[derive(Default)]
struct LineScratch {
    coeffs: Vec<Complex64>,
    fft: Vec<Complex64>,
    staging: Vec<f64>,
}

/// Grow-only collection of per-worker buffers.
#[derive(Default)]
struct ScratchPool {
    lines: Vec<LineScratch>,
}

impl ScratchPool {
    /// Make sure `workers` buffer sets exist, each sized for lines of `n`
    /// samples and an FFT scratch of `fft_len`.
    fn ensure(&mut self, workers: usize, n: usize, fft_len: usize) {
        if self.lines.len() < workers {
            self.lines.resize_with(workers, LineScratch::default);
        }
        for line in &mut self.lines[..workers] {
            if line.coeffs.len() < n {
                line.coeffs.resize(n, Complex64::default());
                line.staging.resize(n, 0.0);
            }
            if line.fft.len() < fft_len {
                line.fft.resize(fft_len, Complex64::default());
            }
        }
    }

    fn clear(&mut self) {
        self.lines = Vec::new();
    }

    fn memory_bytes(&self) -> usize {
        self.lines
            .iter()
            .map(|l| {
                (l.coeffs.capacity() + l.fft.capacity()) * std::mem::size_of::<Complex64>()
                    + l.staging.capacity() * std::mem::size_of::<f64>()
            })
            .sum()
    }
}

/// FFT plans and scratch for one periodic axis.
pub(crate) struct Spectral {
    n: usize,
    dz: f64,
    length: f64,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    scratch: Mutex<ScratchPool>,
}

impl Spectral {
    /// Plan transforms for lines of `n` independent samples spaced `dz`.
    pub(crate) fn new(n: usize, dz: f64) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        Self {
            n,
            dz,
            length: n as f64 * dz,
            forward: planner.plan_fft_forward(n),
            inverse: planner.plan_fft_inverse(n),
            scratch: Mutex::new(ScratchPool::default()),
        }
    }

    /// Multiplier for signed mode `m`: derivative, filter, then half-cell
    /// phase.
    fn multiplier(&self, j: usize, order: Order, shift: Option<Shift>) -> Complex64 {
        let n = self.n;
        let m = if j <= n / 2 { j as f64 } else { j as f64 - n as f64 };
        let k = 2.0 * PI * m / self.length;

        let mut factor = match order {
            Order::First => Complex64::new(0.0, k),
            Order::Second => Complex64::new(-k * k, 0.0),
        };
        if m.abs() > FILTER_FRACTION * n as f64 {
            factor *= FILTER_DAMPING;
        }
        let s = match shift {
            None => return factor,
            Some(Shift::CentreToLow) => -1.0,
            Some(Shift::LowToCentre) => 1.0,
        };
        factor * Complex64::from_polar(1.0, s * k * self.dz / 2.0)
    }

    /// Differentiate every z-line of `f` whose column lies in `columns`.
    ///
    /// Returns the result and the number of lines transformed.
    pub(crate) fn apply(
        &self,
        pool: &ThreadPool,
        f: &Field,
        columns: &RegionRanges,
        order: Order,
        shift: Option<Shift>,
        location: CellLocation,
    ) -> (Field, u64) {
        let shape = f.shape();
        let mut out = Field::zeros(shape).with_location(location);
        let [_, ny, nz] = shape;
        let n = self.n;
        debug_assert_eq!(nz, n + 1, "spectral line length");

        let multipliers: Vec<Complex64> = (0..n).map(|j| self.multiplier(j, order, shift)).collect();
        let norm = 1.0 / n as f64;

        let n_columns = shape[0] * ny;
        let workers = pool.current_num_threads().clamp(1, n_columns.max(1));
        let per_chunk = n_columns.div_ceil(workers);
        let fft_len = self
            .forward
            .get_inplace_scratch_len()
            .max(self.inverse.get_inplace_scratch_len());

        let mut guard = self.scratch.lock().unwrap_or_else(PoisonError::into_inner);
        guard.ensure(workers, n, fft_len);
        let buffers = &mut guard.lines[..workers];

        let lines: u64 = pool.install(|| {
            out.data_mut()
                .par_chunks_mut(per_chunk * nz)
                .zip(buffers.par_iter_mut())
                .enumerate()
                .map(|(chunk, (block, scratch))| {
                    let mut done = 0u64;
                    let coeffs = &mut scratch.coeffs[..n];
                    let fft = &mut scratch.fft[..fft_len];
                    let staging = &mut scratch.staging[..n];
                    for (local, line) in block.chunks_exact_mut(nz).enumerate() {
                        let col = chunk * per_chunk + local;
                        let (x, y) = (col / ny, col % ny);
                        if !columns[0].contains(&x) || !columns[1].contains(&y) {
                            continue;
                        }
                        let input = f.z_line(x, y);
                        for (c, &v) in coeffs.iter_mut().zip(&input[..n]) {
                            *c = Complex64::new(v, 0.0);
                        }
                        self.forward.process_with_scratch(coeffs, fft);
                        for (c, m) in coeffs.iter_mut().zip(&multipliers) {
                            *c *= *m;
                        }
                        self.inverse.process_with_scratch(coeffs, fft);
                        for (s, c) in staging.iter_mut().zip(coeffs.iter()) {
                            *s = c.re * norm;
                        }
                        line[..n].copy_from_slice(staging);
                        line[n] = line[0];
                        done += 1;
                    }
                    done
                })
                .sum()
        });
        (out, lines)
    }

    /// Drop all scratch buffers. They are re-created by the next call.
    pub(crate) fn clear(&self) {
        self.scratch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Bytes currently held by the scratch pool.
    pub(crate) fn scratch_bytes(&self) -> usize {
        self.scratch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .memory_bytes()
    }
}
