//! Grid axes and staggered cell locations.

use std::fmt;

/// One of the three logical axes of the structured grid.
///
/// `X` and `Y` are always bounded (ghost cells supplied by the mesh
/// collaborator). `Z` is the toroidal direction and is periodic unless the
/// mesh declares otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// Radial direction.
    X,
    /// Parallel direction.
    Y,
    /// Toroidal direction.
    Z,
}

impl Axis {
    /// All axes in storage order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Storage dimension index (`0`, `1` or `2`).
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The face-centred location that lies half a cell below along this axis.
    pub fn low_location(self) -> CellLocation {
        match self {
            Axis::X => CellLocation::XLow,
            Axis::Y => CellLocation::YLow,
            Axis::Z => CellLocation::ZLow,
        }
    }

    /// Lower-case axis name, as used in configuration section names.
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The half-cell offset a field's samples represent.
///
/// A field at `XLow` stores values on the lower x-face of each cell; along
/// `y` and `z` it is still cell-centred, so derivatives along those axes use
/// ordinary centred kernels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellLocation {
    /// Cell centre.
    #[default]
    Centre,
    /// Lower x face.
    XLow,
    /// Lower y face.
    YLow,
    /// Lower z face.
    ZLow,
}

impl CellLocation {
    /// The axis along which this location is shifted, or `None` for `Centre`.
    pub fn staggered_axis(self) -> Option<Axis> {
        match self {
            CellLocation::Centre => None,
            CellLocation::XLow => Some(Axis::X),
            CellLocation::YLow => Some(Axis::Y),
            CellLocation::ZLow => Some(Axis::Z),
        }
    }

    /// Whether this location is shifted along `axis`.
    pub fn is_low_on(self, axis: Axis) -> bool {
        self.staggered_axis() == Some(axis)
    }

    /// Whether `self -> target` is one of the allowed single-axis shifts
    /// (`Centre <-> XLow`, `Centre <-> YLow`, `Centre <-> ZLow`).
    pub fn is_single_shift_to(self, target: CellLocation) -> bool {
        matches!(
            (self, target),
            (CellLocation::Centre, CellLocation::XLow)
                | (CellLocation::Centre, CellLocation::YLow)
                | (CellLocation::Centre, CellLocation::ZLow)
                | (CellLocation::XLow, CellLocation::Centre)
                | (CellLocation::YLow, CellLocation::Centre)
                | (CellLocation::ZLow, CellLocation::Centre)
        )
    }
}

impl fmt::Display for CellLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CellLocation::Centre => "CELL_CENTRE",
            CellLocation::XLow => "CELL_XLOW",
            CellLocation::YLow => "CELL_YLOW",
            CellLocation::ZLow => "CELL_ZLOW",
        };
        f.write_str(s)
    }
}
