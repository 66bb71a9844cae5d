//! Stencil windows read from a field along one axis.

use fdx_core::Axis;
use fdx_mesh::{AxisLayout, Field, Mesh};
use fdx_schemes::{StaggeredStencil, Stencil};

/// Direction of a half-cell shift between the operand and the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Shift {
    /// Operand at the cell centre, result on the low face.
    CentreToLow,
    /// Operand on the low face, result at the cell centre.
    LowToCentre,
}

impl Shift {
    /// Offsets of the `mm, m, p, pp` samples relative to the result index.
    fn offsets(self) -> [isize; 4] {
        match self {
            Shift::CentreToLow => [-2, -1, 0, 1],
            Shift::LowToCentre => [-1, 0, 1, 2],
        }
    }
}

/// Reads windows of one field along one axis.
///
/// A planar field is read at `z = 0` whatever z index is asked for, and is
/// constant along z.
pub(crate) struct Extractor<'a> {
    field: &'a Field,
    axis: Axis,
    layout: AxisLayout,
    flat: bool,
}

impl<'a> Extractor<'a> {
    pub(crate) fn new(mesh: &Mesh, axis: Axis, field: &'a Field) -> Self {
        let layout = mesh.layout_for(axis, field);
        Self {
            field,
            axis,
            layout,
            flat: axis == Axis::Z && field.is_2d(),
        }
    }

    /// Sample `offset` points away from `(x, y, z)` along the axis. The
    /// caller keeps bounded reads inside the ghost layer.
    #[inline]
    pub(crate) fn read(&self, x: usize, y: usize, z: usize, offset: isize) -> f64 {
        let z = if self.field.is_2d() { 0 } else { z };
        if offset == 0 || self.flat {
            return self.field.get(x, y, z);
        }
        match self.axis {
            Axis::X => self.field.get(self.layout.offset(x, offset), y, z),
            Axis::Y => self.field.get(x, self.layout.offset(y, offset), z),
            Axis::Z => self.field.get(x, y, self.layout.offset(z, offset)),
        }
    }

    /// Value at the point itself.
    #[inline]
    pub(crate) fn value(&self, x: usize, y: usize, z: usize) -> f64 {
        self.read(x, y, z, 0)
    }

    /// Centred window around `(x, y, z)`. Samples beyond `reach` repeat the
    /// outermost sample inside it.
    pub(crate) fn centred(&self, x: usize, y: usize, z: usize, reach: usize) -> Stencil {
        let c = self.read(x, y, z, 0);
        if reach == 0 {
            return Stencil::constant(c);
        }
        let m = self.read(x, y, z, -1);
        let p = self.read(x, y, z, 1);
        let (mm, pp) = if reach >= 2 {
            (self.read(x, y, z, -2), self.read(x, y, z, 2))
        } else {
            (m, p)
        };
        Stencil::new(mm, m, c, p, pp)
    }

    /// Staggered window for a result at `(x, y, z)` half a cell away from
    /// the field's samples.
    pub(crate) fn staggered(
        &self,
        x: usize,
        y: usize,
        z: usize,
        shift: Shift,
        reach: usize,
    ) -> StaggeredStencil {
        let [o_mm, o_m, o_p, o_pp] = shift.offsets();
        let m = self.read(x, y, z, o_m);
        let p = self.read(x, y, z, o_p);
        let (mm, pp) = if reach >= 2 {
            (self.read(x, y, z, o_mm), self.read(x, y, z, o_pp))
        } else {
            (m, p)
        };
        StaggeredStencil::new(mm, m, p, pp)
    }
}
