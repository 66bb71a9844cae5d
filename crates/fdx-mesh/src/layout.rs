//! Per-axis storage layout: interior extent, ghost width and boundary kind.

use std::ops::Range;

/// How an axis treats positions outside its interior.
///
/// This controls the *topology* of stencil reads. It says nothing about the
/// values in the ghost layer; those are filled by whoever owns the boundary
/// conditions and communication before an operator is called.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// Finite axis with a ghost layer on each side.
    Bounded,
    /// Periodic axis. Reads wrap modulo the interior length.
    Periodic,
}

/// Storage layout of one axis.
///
/// A bounded axis stores `ghosts + interior + ghosts` samples. A periodic
/// axis has no ghost layer and stores `interior + 1` samples, the last being
/// a closure point that duplicates the first.
///
/// ```
/// use fdx_mesh::AxisLayout;
///
/// let x = AxisLayout::bounded(32, 2);
/// assert_eq!(x.stored(), 36);
/// assert_eq!(x.interior_range(), 2..34);
///
/// let z = AxisLayout::periodic(16);
/// assert_eq!(z.stored(), 17);
/// assert_eq!(z.offset(0, -1), 15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AxisLayout {
    interior: usize,
    ghosts: usize,
    boundary: Boundary,
}

impl AxisLayout {
    /// A bounded axis with `interior` owned points and `ghosts` on each side.
    pub fn bounded(interior: usize, ghosts: usize) -> Self {
        Self {
            interior,
            ghosts,
            boundary: Boundary::Bounded,
        }
    }

    /// A periodic axis with `n` independent points.
    pub fn periodic(n: usize) -> Self {
        Self {
            interior: n,
            ghosts: 0,
            boundary: Boundary::Periodic,
        }
    }

    /// A single-sample axis, used for the z direction of planar fields.
    pub fn flat() -> Self {
        Self::bounded(1, 0)
    }

    /// Number of owned points.
    pub fn interior(&self) -> usize {
        self.interior
    }

    /// Ghost width on each side (zero for periodic axes).
    pub fn ghosts(&self) -> usize {
        self.ghosts
    }

    /// Boundary kind.
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Whether reads wrap around.
    pub fn is_periodic(&self) -> bool {
        self.boundary == Boundary::Periodic
    }

    /// Number of stored samples, ghosts and closure point included.
    pub fn stored(&self) -> usize {
        match self.boundary {
            Boundary::Bounded => self.interior + 2 * self.ghosts,
            Boundary::Periodic => self.interior + 1,
        }
    }

    /// Storage indices of the owned points.
    pub fn interior_range(&self) -> Range<usize> {
        self.ghosts..self.ghosts + self.interior
    }

    /// Storage indices of every computable point.
    ///
    /// For a periodic axis this excludes the closure point, which is copied
    /// from the first sample rather than computed.
    pub fn full_range(&self) -> Range<usize> {
        match self.boundary {
            Boundary::Bounded => 0..self.stored(),
            Boundary::Periodic => 0..self.interior,
        }
    }

    /// Storage index `offset` steps from `i`.
    ///
    /// Periodic axes wrap modulo the interior length. Bounded axes do not
    /// wrap; callers must have checked that the ghost layer is wide enough,
    /// and out-of-range reads are clamped to the outermost stored sample.
    pub fn offset(&self, i: usize, offset: isize) -> usize {
        let target = i as isize + offset;
        match self.boundary {
            Boundary::Periodic => {
                let n = self.interior as isize;
                target.rem_euclid(n) as usize
            }
            Boundary::Bounded => {
                debug_assert!(
                    target >= 0 && (target as usize) < self.stored(),
                    "bounded read {target} outside 0..{}",
                    self.stored()
                );
                target.clamp(0, self.stored() as isize - 1) as usize
            }
        }
    }

    /// Whether a kernel reading `reach` neighbours can run over the interior.
    pub fn supports_reach(&self, reach: usize) -> bool {
        self.is_periodic() || self.ghosts >= reach
    }
}
