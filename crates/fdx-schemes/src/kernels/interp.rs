//! Staggered interpolation onto the point between `m` and `p`.

use crate::stencil::StaggeredStencil;

/// Interpolation order used when shifting a field between locations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InterpScheme {
    /// Two-point average.
    C2,
    /// Four-point cubic.
    #[default]
    C4,
}

impl InterpScheme {
    /// Parse `"C2"` or `"C4"` (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case("C2") {
            Some(Self::C2)
        } else if label.eq_ignore_ascii_case("C4") {
            Some(Self::C4)
        } else {
            None
        }
    }

    /// Configuration label.
    pub fn label(self) -> &'static str {
        match self {
            Self::C2 => "C2",
            Self::C4 => "C4",
        }
    }

    /// Neighbours read on each side.
    pub fn reach(self) -> usize {
        match self {
            Self::C2 => 1,
            Self::C4 => 2,
        }
    }

    /// Interpolate.
    pub fn apply(self, s: &StaggeredStencil) -> f64 {
        match self {
            Self::C2 => c2(s),
            Self::C4 => c4(s),
        }
    }
}

/// Linear.
pub fn c2(s: &StaggeredStencil) -> f64 {
    0.5 * (s.m + s.p)
}

/// Cubic.
pub fn c4(s: &StaggeredStencil) -> f64 {
    (9.0 * (s.m + s.p) - (s.mm + s.pp)) / 16.0
}
