//! Owned, location-tagged grid field.

use fdx_core::CellLocation;

use crate::error::MeshError;

/// A real-valued quantity over the stored points of a structured grid.
///
/// Storage is row-major `[x][y][z]` with `z` fastest, so a z-line is a
/// contiguous slice. A planar (2D) field has a single z sample.
///
/// ```
/// use fdx_mesh::Field;
///
/// let f = Field::from_fn([4, 3, 2], |x, y, z| (x * 100 + y * 10 + z) as f64);
/// assert_eq!(f.get(2, 1, 1), 211.0);
/// assert_eq!(f.z_line(2, 1), &[210.0, 211.0]);
/// assert!(!f.is_2d());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    data: Vec<f64>,
    shape: [usize; 3],
    location: CellLocation,
}

impl Field {
    /// A zero field at the cell centre.
    pub fn zeros(shape: [usize; 3]) -> Self {
        Self::constant(shape, 0.0)
    }

    /// A field with every stored point set to `value`.
    pub fn constant(shape: [usize; 3], value: f64) -> Self {
        Self {
            data: vec![value; shape[0] * shape[1] * shape[2]],
            shape,
            location: CellLocation::Centre,
        }
    }

    /// Wrap an existing buffer.
    pub fn from_vec(shape: [usize; 3], data: Vec<f64>) -> Result<Self, MeshError> {
        let expected = shape[0] * shape[1] * shape[2];
        if data.len() != expected {
            return Err(MeshError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            shape,
            location: CellLocation::Centre,
        })
    }

    /// Fill every stored point from a function of its storage indices.
    pub fn from_fn(shape: [usize; 3], mut f: impl FnMut(usize, usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(shape[0] * shape[1] * shape[2]);
        for x in 0..shape[0] {
            for y in 0..shape[1] {
                for z in 0..shape[2] {
                    data.push(f(x, y, z));
                }
            }
        }
        Self {
            data,
            shape,
            location: CellLocation::Centre,
        }
    }

    /// Storage dimensions `[nx, ny, nz]`.
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Whether this is a planar field (single z sample).
    pub fn is_2d(&self) -> bool {
        self.shape[2] == 1
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the field stores no values.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Location tag.
    pub fn location(&self) -> CellLocation {
        self.location
    }

    /// Retag in place. Values are not changed.
    pub fn set_location(&mut self, location: CellLocation) {
        self.location = location;
    }

    /// Retag by value. Values are not changed.
    pub fn with_location(mut self, location: CellLocation) -> Self {
        self.location = location;
        self
    }

    /// Flat index of `(x, y, z)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.shape[1] + y) * self.shape[2] + z
    }

    /// Value at `(x, y, z)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f64 {
        self.data[self.index(x, y, z)]
    }

    /// Value at `(x, y)`, reading z = 0. Used for planar metric fields.
    #[inline]
    pub fn get_xy(&self, x: usize, y: usize) -> f64 {
        self.data[self.index(x, y, 0)]
    }

    /// Overwrite the value at `(x, y, z)`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: f64) {
        let i = self.index(x, y, z);
        self.data[i] = value;
    }

    /// Contiguous z-line at `(x, y)`.
    pub fn z_line(&self, x: usize, y: usize) -> &[f64] {
        let start = self.index(x, y, 0);
        &self.data[start..start + self.shape[2]]
    }

    /// All stored values.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// All stored values, mutably.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume into the backing buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Apply `f` pointwise, keeping shape and location.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Field {
        Field {
            data: self.data.iter().map(|&v| f(v)).collect(),
            shape: self.shape,
            location: self.location,
        }
    }

    /// Combine pointwise with `other`, keeping this field's location.
    ///
    /// A planar operand is broadcast along z of a 3D one; the result has the
    /// 3D shape.
    pub fn zip_with(&self, other: &Field, f: impl Fn(f64, f64) -> f64) -> Result<Field, MeshError> {
        let mismatch = || MeshError::ShapeMismatch {
            expected: self.shape,
            actual: other.shape,
        };
        if self.shape[0] != other.shape[0] || self.shape[1] != other.shape[1] {
            return Err(mismatch());
        }
        let (shape, data) = if self.shape == other.shape {
            let data = self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect();
            (self.shape, data)
        } else if other.is_2d() {
            let nz = self.shape[2];
            let data = self
                .data
                .iter()
                .enumerate()
                .map(|(i, &a)| f(a, other.data[i / nz]))
                .collect();
            (self.shape, data)
        } else if self.is_2d() {
            let nz = other.shape[2];
            let data = other
                .data
                .iter()
                .enumerate()
                .map(|(i, &b)| f(self.data[i / nz], b))
                .collect();
            (other.shape, data)
        } else {
            return Err(mismatch());
        };
        Ok(Field {
            data,
            shape,
            location: self.location,
        })
    }

    /// Pointwise sum.
    pub fn plus(&self, other: &Field) -> Result<Field, MeshError> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Pointwise product.
    pub fn times(&self, other: &Field) -> Result<Field, MeshError> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Multiply every value by `k`.
    pub fn scale(&mut self, k: f64) {
        for v in &mut self.data {
            *v *= k;
        }
    }

    /// Copy the first z sample of each line into the last.
    ///
    /// Restores the closure point of a periodic z axis.
    pub fn close_periodic_z(&mut self) {
        let nz = self.shape[2];
        if nz < 2 {
            return;
        }
        for line in self.data.chunks_exact_mut(nz) {
            line[nz - 1] = line[0];
        }
    }

    /// Largest absolute pointwise difference, or `None` on shape mismatch.
    pub fn max_abs_diff(&self, other: &Field) -> Option<f64> {
        if self.shape != other.shape {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max),
        )
    }
}
