//! Stencil windows handed to the point kernels.
//!
//! Values are raw samples. Division by the grid spacing happens in the
//! applicator, never in a kernel.

/// Five samples around a point: `i-2 ..= i+2`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stencil {
    /// Value at `i - 2`.
    pub mm: f64,
    /// Value at `i - 1`.
    pub m: f64,
    /// Value at `i`.
    pub c: f64,
    /// Value at `i + 1`.
    pub p: f64,
    /// Value at `i + 2`.
    pub pp: f64,
}

impl Stencil {
    /// Build from the five samples in order `mm, m, c, p, pp`.
    pub fn new(mm: f64, m: f64, c: f64, p: f64, pp: f64) -> Self {
        Self { mm, m, c, p, pp }
    }

    /// Every sample equal to `v`.
    pub fn constant(v: f64) -> Self {
        Self::new(v, v, v, v, v)
    }

    /// Sample the function `f` at offsets `-2..=2`.
    pub fn sample(f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(-2.0), f(-1.0), f(0.0), f(1.0), f(2.0))
    }

    /// Largest absolute sample.
    pub fn max_abs(&self) -> f64 {
        [self.mm, self.m, self.c, self.p, self.pp]
            .into_iter()
            .fold(0.0, |acc, v| acc.max(v.abs()))
    }

    /// Apply `op` to every sample.
    pub fn map(&self, op: impl Fn(f64) -> f64) -> Self {
        Self::new(op(self.mm), op(self.m), op(self.c), op(self.p), op(self.pp))
    }
}

/// Four samples around a face: offsets `-3/2, -1/2, +1/2, +3/2` of the
/// result location. There is no centre value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StaggeredStencil {
    /// Value at `-3/2`.
    pub mm: f64,
    /// Value at `-1/2`.
    pub m: f64,
    /// Value at `+1/2`.
    pub p: f64,
    /// Value at `+3/2`.
    pub pp: f64,
}

impl StaggeredStencil {
    /// Build from the four samples in order `mm, m, p, pp`.
    pub fn new(mm: f64, m: f64, p: f64, pp: f64) -> Self {
        Self { mm, m, p, pp }
    }

    /// Every sample equal to `v`.
    pub fn constant(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    /// Sample the function `f` at offsets `-1.5, -0.5, 0.5, 1.5`.
    pub fn sample(f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(-1.5), f(-0.5), f(0.5), f(1.5))
    }
}
