//! Mesh geometry consumed by the operators.
//!
//! The mesh owns axis layouts and per-column spacing. It does not compute
//! metrics; spacing and non-uniform corrections are supplied precomputed.

use std::ops::Range;

use fdx_core::Axis;
use smallvec::{smallvec, SmallVec};

use crate::error::MeshError;
use crate::field::Field;
use crate::layout::AxisLayout;

/// Storage ranges of the points an operator computes, one per axis.
pub type RegionRanges = SmallVec<[Range<usize>; 3]>;

/// A logically rectangular sub-domain with its spacing.
///
/// ```
/// use fdx_core::Axis;
/// use fdx_mesh::Mesh;
///
/// let mesh = Mesh::builder(8, 4, 16).uniform_spacing(0.5, 0.25, 0.1).build().unwrap();
/// assert_eq!(mesh.shape_3d(), [12, 8, 17]);
/// assert_eq!(mesh.shape_2d(), [12, 8, 1]);
/// assert!(mesh.layout(Axis::Z).is_periodic());
/// assert_eq!(mesh.spacing(Axis::Y, 3, 3), 0.25);
/// ```
#[derive(Clone, Debug)]
pub struct Mesh {
    x: AxisLayout,
    y: AxisLayout,
    z: AxisLayout,
    dx: Field,
    dy: Field,
    dz: f64,
    d1_dx: Option<Field>,
    d1_dy: Option<Field>,
}

enum Spacing {
    Uniform(f64),
    PerColumn(Field),
}

/// Builder for [`Mesh`].
///
/// Defaults: two ghost cells on x and y, periodic z, unit spacing, no
/// non-uniform corrections.
pub struct MeshBuilder {
    nx: usize,
    ny: usize,
    nz: usize,
    mxg: usize,
    myg: usize,
    z_ghosts: Option<usize>,
    dx: Spacing,
    dy: Spacing,
    dz: f64,
    d1_dx: Option<Field>,
    d1_dy: Option<Field>,
}

impl Mesh {
    /// Start a mesh with `nx * ny` owned columns of `nz` z points.
    pub fn builder(nx: usize, ny: usize, nz: usize) -> MeshBuilder {
        MeshBuilder {
            nx,
            ny,
            nz,
            mxg: 2,
            myg: 2,
            z_ghosts: None,
            dx: Spacing::Uniform(1.0),
            dy: Spacing::Uniform(1.0),
            dz: 1.0,
            d1_dx: None,
            d1_dy: None,
        }
    }

    /// Layout of `axis`.
    pub fn layout(&self, axis: Axis) -> &AxisLayout {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Layout of `axis` as seen by `field`. A planar field has a flat z axis.
    pub fn layout_for(&self, axis: Axis, field: &Field) -> AxisLayout {
        self.layout_in(axis, field.shape())
    }

    /// Layout of `axis` for storage of the given shape.
    pub fn layout_in(&self, axis: Axis, shape: [usize; 3]) -> AxisLayout {
        if axis == Axis::Z && shape[2] == 1 {
            AxisLayout::flat()
        } else {
            *self.layout(axis)
        }
    }

    /// Storage shape of a 3D field on this mesh.
    pub fn shape_3d(&self) -> [usize; 3] {
        [self.x.stored(), self.y.stored(), self.z.stored()]
    }

    /// Storage shape of a planar field on this mesh.
    pub fn shape_2d(&self) -> [usize; 3] {
        [self.x.stored(), self.y.stored(), 1]
    }

    /// Check that `field` is a 2D or 3D field of this mesh.
    pub fn check(&self, field: &Field) -> Result<(), MeshError> {
        let shape = field.shape();
        if shape == self.shape_3d() || shape == self.shape_2d() {
            Ok(())
        } else {
            Err(MeshError::ShapeMismatch {
                expected: if field.is_2d() {
                    self.shape_2d()
                } else {
                    self.shape_3d()
                },
                actual: shape,
            })
        }
    }

    /// Per-column x spacing (planar field).
    pub fn dx(&self) -> &Field {
        &self.dx
    }

    /// Per-column y spacing (planar field).
    pub fn dy(&self) -> &Field {
        &self.dy
    }

    /// Uniform z spacing.
    pub fn dz(&self) -> f64 {
        self.dz
    }

    /// Spacing along `axis` for column `(x, y)`.
    #[inline]
    pub fn spacing(&self, axis: Axis, x: usize, y: usize) -> f64 {
        match axis {
            Axis::X => self.dx.get_xy(x, y),
            Axis::Y => self.dy.get_xy(x, y),
            Axis::Z => self.dz,
        }
    }

    /// Period length of the z axis, `nz * dz`.
    pub fn z_length(&self) -> f64 {
        self.z.interior() as f64 * self.dz
    }

    /// Non-uniform second-derivative correction along `axis`, if supplied.
    ///
    /// Only x and y carry one.
    pub fn d1(&self, axis: Axis) -> Option<&Field> {
        match axis {
            Axis::X => self.d1_dx.as_ref(),
            Axis::Y => self.d1_dy.as_ref(),
            Axis::Z => None,
        }
    }

    /// Storage ranges an operator along `axis` computes for a result of the
    /// given shape.
    ///
    /// The derivative axis is always restricted to its interior. Other axes
    /// cover their interior, or every computable point when
    /// `include_boundary` is set.
    pub fn region(&self, axis: Axis, shape: [usize; 3], include_boundary: bool) -> RegionRanges {
        let mut ranges: RegionRanges = smallvec![];
        for a in Axis::ALL {
            let layout = self.layout_in(a, shape);
            let r = if a == axis || !include_boundary {
                layout.interior_range()
            } else {
                layout.full_range()
            };
            ranges.push(r);
        }
        ranges
    }
}

impl MeshBuilder {
    /// Ghost width on x. Default: 2.
    pub fn x_ghosts(mut self, g: usize) -> Self {
        self.mxg = g;
        self
    }

    /// Ghost width on y. Default: 2.
    pub fn y_ghosts(mut self, g: usize) -> Self {
        self.myg = g;
        self
    }

    /// Make z periodic (the default).
    pub fn periodic_z(mut self) -> Self {
        self.z_ghosts = None;
        self
    }

    /// Make z a bounded axis with `g` ghost cells.
    pub fn bounded_z(mut self, g: usize) -> Self {
        self.z_ghosts = Some(g);
        self
    }

    /// Constant spacing on all three axes.
    pub fn uniform_spacing(mut self, dx: f64, dy: f64, dz: f64) -> Self {
        self.dx = Spacing::Uniform(dx);
        self.dy = Spacing::Uniform(dy);
        self.dz = dz;
        self
    }

    /// Per-column x spacing. Must be a planar field of the mesh shape.
    pub fn dx(mut self, dx: Field) -> Self {
        self.dx = Spacing::PerColumn(dx);
        self
    }

    /// Per-column y spacing. Must be a planar field of the mesh shape.
    pub fn dy(mut self, dy: Field) -> Self {
        self.dy = Spacing::PerColumn(dy);
        self
    }

    /// Uniform z spacing.
    pub fn dz(mut self, dz: f64) -> Self {
        self.dz = dz;
        self
    }

    /// Non-uniform correction for second x derivatives.
    pub fn d1_dx(mut self, d1: Field) -> Self {
        self.d1_dx = Some(d1);
        self
    }

    /// Non-uniform correction for second y derivatives.
    pub fn d1_dy(mut self, d1: Field) -> Self {
        self.d1_dy = Some(d1);
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// - any axis has zero interior points
    /// - a spacing value is not finite and positive
    /// - a per-column field is not planar with the mesh's x/y shape
    pub fn build(self) -> Result<Mesh, MeshError> {
        for (axis, n) in [("x", self.nx), ("y", self.ny), ("z", self.nz)] {
            if n == 0 {
                return Err(MeshError::EmptyAxis { axis });
            }
        }
        let x = AxisLayout::bounded(self.nx, self.mxg);
        let y = AxisLayout::bounded(self.ny, self.myg);
        let z = match self.z_ghosts {
            None => AxisLayout::periodic(self.nz),
            Some(g) => AxisLayout::bounded(self.nz, g),
        };
        // A single stored z sample would be indistinguishable from a planar field.
        if z.stored() < 2 {
            return Err(MeshError::EmptyAxis { axis: "z" });
        }
        let planar = [x.stored(), y.stored(), 1];

        let dx = resolve_spacing("dx", self.dx, planar)?;
        let dy = resolve_spacing("dy", self.dy, planar)?;
        check_positive("dz", self.dz)?;
        let d1_dx = self.d1_dx.map(|f| check_planar(f, planar)).transpose()?;
        let d1_dy = self.d1_dy.map(|f| check_planar(f, planar)).transpose()?;

        Ok(Mesh {
            x,
            y,
            z,
            dx,
            dy,
            dz: self.dz,
            d1_dx,
            d1_dy,
        })
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), MeshError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MeshError::InvalidSpacing { name, value })
    }
}

fn check_planar(field: Field, planar: [usize; 3]) -> Result<Field, MeshError> {
    if field.shape() != planar {
        return Err(MeshError::ShapeMismatch {
            expected: planar,
            actual: field.shape(),
        });
    }
    if let Some(bad) = field.data().iter().find(|v| !v.is_finite()) {
        return Err(MeshError::InvalidSpacing {
            name: "d1",
            value: *bad,
        });
    }
    Ok(field)
}

fn resolve_spacing(
    name: &'static str,
    spacing: Spacing,
    planar: [usize; 3],
) -> Result<Field, MeshError> {
    match spacing {
        Spacing::Uniform(h) => {
            check_positive(name, h)?;
            Ok(Field::constant(planar, h))
        }
        Spacing::PerColumn(f) => {
            if f.shape() != planar {
                return Err(MeshError::ShapeMismatch {
                    expected: planar,
                    actual: f.shape(),
                });
            }
            for &h in f.data() {
                check_positive(name, h)?;
            }
            Ok(f)
        }
    }
}
