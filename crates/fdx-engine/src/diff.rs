//! The operator API.
//!
//! A [`Differentiator`] captures a mesh, a resolved [`DiffConfig`], a
//! worker pool and the spectral scratch pool. Every operator is a pure
//! function of its operands: a fresh [`Field`] is returned, inputs are
//! never modified, and nothing is communicated.

use std::fmt;
use std::sync::Arc;

use fdx_core::{Alignment, Axis, CellLocation, DerivError, DiffMethod, OperatorClass};
use fdx_mesh::{Field, Mesh};
use fdx_schemes::kernels::{muscl, ppm, second};
use fdx_schemes::registry::{CentredFn, StaggeredFn, UpwindFn, UpwindStaggeredFn};
use fdx_schemes::{Kernel, Registry};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::apply::{pointwise, wider};
use crate::config::{ConfigError, DiffConfig, DiffOptions};
use crate::extract::{Extractor, Shift};
use crate::metrics::{MetricsSnapshot, OperatorMetrics};
use crate::resolve;
use crate::spectral::{Order, Spectral};

// ── DerivOpts ──────────────────────────────────────────────────────

/// Per-call options.
///
/// ```
/// use fdx_core::{CellLocation, DiffMethod};
/// use fdx_engine::DerivOpts;
///
/// let opts = DerivOpts::new()
///     .with_outloc(CellLocation::XLow)
///     .with_method(DiffMethod::C4);
/// assert!(!opts.include_boundary);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DerivOpts {
    /// Location of the result. `None` keeps the operand's location.
    pub outloc: Option<CellLocation>,
    /// Scheme override for this call. `None` uses the configured scheme.
    pub method: Option<DiffMethod>,
    /// Also compute the ghost points of the axes other than the
    /// derivative axis.
    pub include_boundary: bool,
}

impl DerivOpts {
    /// Defaults: operand location, configured scheme, interior only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the result at `loc`.
    pub fn with_outloc(mut self, loc: CellLocation) -> Self {
        self.outloc = Some(loc);
        self
    }

    /// Override the configured scheme.
    pub fn with_method(mut self, method: DiffMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Compute ghost points of the non-derivative axes.
    pub fn with_boundary(mut self) -> Self {
        self.include_boundary = true;
        self
    }
}

// ── Differentiator ─────────────────────────────────────────────────

/// Differential operators over one mesh.
///
/// `Differentiator` is `Send + Sync`; operator calls take `&self` and may
/// run concurrently. Each call runs its points on the differentiator's
/// own thread pool.
///
/// ```
/// use fdx_engine::{DiffOptions, Differentiator};
/// use fdx_mesh::{Field, Mesh};
///
/// let mesh = Mesh::builder(8, 4, 8).build().unwrap();
/// let shape = mesh.shape_3d();
/// let d = Differentiator::from_options(mesh, &DiffOptions::default()).unwrap();
///
/// let f = Field::from_fn(shape, |x, _, _| 3.0 * x as f64);
/// let dfdx = d.ddx(&f).unwrap();
/// assert_eq!(dfdx.get(4, 3, 2), 3.0);
/// ```
pub struct Differentiator {
    mesh: Arc<Mesh>,
    config: Arc<DiffConfig>,
    pool: ThreadPool,
    spectral: Option<Spectral>,
    metrics: OperatorMetrics,
}

impl fmt::Debug for Differentiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Differentiator")
            .field("shape", &self.mesh.shape_3d())
            .field("stagger_grids", &self.config.stagger_grids())
            .field("workers", &self.pool.current_num_threads())
            .field("spectral", &self.spectral.is_some())
            .finish()
    }
}

impl Differentiator {
    /// Build from a shared mesh and a configuration resolved against it.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MeshMismatch`] if the configuration was resolved for
    /// a mesh with a different z boundary, [`ConfigError::ThreadPool`] if
    /// the worker pool cannot start.
    pub fn new(mesh: Arc<Mesh>, config: Arc<DiffConfig>) -> Result<Self, ConfigError> {
        let z = *mesh.layout(Axis::Z);
        if z.is_periodic() != config.z_periodic() {
            return Err(ConfigError::MeshMismatch {
                reason: format!(
                    "configuration resolved for {} z, mesh z is {:?}",
                    if config.z_periodic() { "periodic" } else { "bounded" },
                    z.boundary()
                ),
            });
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_count())
            .thread_name(|i| format!("fdx-worker-{i}"))
            .build()
            .map_err(|e| ConfigError::ThreadPool {
                reason: e.to_string(),
            })?;
        let spectral = z
            .is_periodic()
            .then(|| Spectral::new(z.interior(), mesh.dz()));
        log::debug!(
            "differentiator ready: {} workers, interp {}",
            pool.current_num_threads(),
            config.interp().label()
        );
        Ok(Self {
            mesh,
            config,
            pool,
            spectral,
            metrics: OperatorMetrics::default(),
        })
    }

    /// Resolve `options` against the standard registry and build.
    pub fn from_options(mesh: Mesh, options: &DiffOptions) -> Result<Self, ConfigError> {
        let config = DiffConfig::resolve(options, Registry::standard(), &mesh)?;
        Self::new(Arc::new(mesh), Arc::new(config))
    }

    /// The mesh.
    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// The resolved configuration.
    pub fn config(&self) -> &Arc<DiffConfig> {
        &self.config
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Operator counters so far.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Free the spectral scratch buffers. The next spectral call re-creates
    /// them.
    pub fn clear_scratch(&self) {
        if let Some(s) = &self.spectral {
            s.clear();
        }
    }

    /// Bytes held by the spectral scratch pool.
    pub fn scratch_bytes(&self) -> usize {
        self.spectral.as_ref().map_or(0, Spectral::scratch_bytes)
    }

    // ── First and second derivatives ───────────────────────────────

    /// First derivative along `axis`.
    pub fn first(&self, axis: Axis, f: &Field, opts: DerivOpts) -> Result<Field, DerivError> {
        self.metrics.record_class(OperatorClass::First);
        self.derivative(OperatorClass::First, axis, f, opts)
    }

    /// Second derivative along `axis`, plus the mesh's non-uniform
    /// correction on x and y.
    pub fn second(&self, axis: Axis, f: &Field, opts: DerivOpts) -> Result<Field, DerivError> {
        self.metrics.record_class(OperatorClass::Second);
        self.derivative(OperatorClass::Second, axis, f, opts)
    }

    /// `df/dx` with default options.
    pub fn ddx(&self, f: &Field) -> Result<Field, DerivError> {
        self.first(Axis::X, f, DerivOpts::default())
    }

    /// `df/dy` with default options.
    pub fn ddy(&self, f: &Field) -> Result<Field, DerivError> {
        self.first(Axis::Y, f, DerivOpts::default())
    }

    /// `df/dz` with default options.
    pub fn ddz(&self, f: &Field) -> Result<Field, DerivError> {
        self.first(Axis::Z, f, DerivOpts::default())
    }

    /// `d2f/dx2` with default options.
    pub fn d2dx2(&self, f: &Field) -> Result<Field, DerivError> {
        self.second(Axis::X, f, DerivOpts::default())
    }

    /// `d2f/dy2` with default options.
    pub fn d2dy2(&self, f: &Field) -> Result<Field, DerivError> {
        self.second(Axis::Y, f, DerivOpts::default())
    }

    /// `d2f/dz2` with default options.
    pub fn d2dz2(&self, f: &Field) -> Result<Field, DerivError> {
        self.second(Axis::Z, f, DerivOpts::default())
    }

    fn derivative(
        &self,
        class: OperatorClass,
        axis: Axis,
        f: &Field,
        opts: DerivOpts,
    ) -> Result<Field, DerivError> {
        self.check(f)?;
        let plan = resolve::derivative(self.config.stagger_grids(), axis, f.location(), opts.outloc);

        let shifted;
        let input = match plan.pre {
            Some(loc) => {
                shifted = self.interp_to(f, loc)?;
                &shifted
            }
            None => f,
        };

        if axis == Axis::Z && input.is_2d() {
            let zero = Field::zeros(input.shape()).with_location(plan.result);
            return self.finish(zero, plan.post);
        }

        let entry = self.config.entry(axis, class, plan.alignment, opts.method)?;
        let power = if class == OperatorClass::Second { 2 } else { 1 };
        // Moving the result reads its ghost cells on the other axes.
        let include_boundary = opts.include_boundary || plan.post.is_some();
        let mut result = match (entry.kernel, plan.shift) {
            (Kernel::Centred(k), None) => self.centred(
                axis,
                input,
                k,
                entry.reach,
                power,
                include_boundary,
                plan.result,
            )?,
            (Kernel::Staggered(k), Some(shift)) => self.staggered(
                axis,
                input,
                k,
                entry.reach,
                shift,
                power,
                include_boundary,
                plan.result,
            )?,
            (Kernel::Spectral, shift) => {
                let order = if class == OperatorClass::Second {
                    Order::Second
                } else {
                    Order::First
                };
                self.spectral(input, order, shift, include_boundary, plan.result)?
            }
            (kernel, _) => return Err(self.mismatch(class, plan.alignment, kernel)),
        };

        if class == OperatorClass::Second {
            if let Some(d1) = self.mesh.d1(axis) {
                let slope_opts = DerivOpts {
                    outloc: Some(plan.result),
                    method: None,
                    include_boundary,
                };
                let slope = self.first(axis, input, slope_opts)?;
                let correction = combine(&slope, d1, |a, b| a * b)?;
                result = combine(&result, &correction, |a, b| a + b)?;
            }
        }
        self.finish(result, plan.post)
    }

    // ── Fourth and mixed derivatives ───────────────────────────────

    /// Fourth derivative along `axis`, second-order central. Always
    /// centred; the result stays at `f`'s location.
    pub fn fourth(&self, axis: Axis, f: &Field) -> Result<Field, DerivError> {
        self.check(f)?;
        self.metrics.record_fourth();
        if axis == Axis::Z && f.is_2d() {
            return Ok(Field::zeros(f.shape()).with_location(f.location()));
        }
        self.centred(axis, f, second::d4_c2, 2, 4, false, f.location())
    }

    /// `d4f/dx4`.
    pub fn d4dx4(&self, f: &Field) -> Result<Field, DerivError> {
        self.fourth(Axis::X, f)
    }

    /// `d4f/dy4`.
    pub fn d4dy4(&self, f: &Field) -> Result<Field, DerivError> {
        self.fourth(Axis::Y, f)
    }

    /// `d4f/dz4`.
    pub fn d4dz4(&self, f: &Field) -> Result<Field, DerivError> {
        self.fourth(Axis::Z, f)
    }

    /// `d2f/dxdz`, as the x derivative of a z derivative computed over the
    /// x ghost layer.
    pub fn d2dxdz(&self, f: &Field) -> Result<Field, DerivError> {
        self.metrics.record_mixed();
        let dz = self.first(Axis::Z, f, DerivOpts::new().with_boundary())?;
        self.first(Axis::X, &dz, DerivOpts::new())
    }

    /// `d2f/dydz`, from the four diagonal neighbours in the y-z plane.
    pub fn d2dydz(&self, f: &Field) -> Result<Field, DerivError> {
        self.check(f)?;
        self.metrics.record_mixed();
        let shape = f.shape();
        if f.is_2d() {
            return Ok(Field::zeros(shape).with_location(f.location()));
        }
        self.ensure_reach(Axis::Y, shape, 1)?;
        self.ensure_reach(Axis::Z, shape, 1)?;

        let mesh = &*self.mesh;
        let ly = *mesh.layout(Axis::Y);
        let lz = *mesh.layout(Axis::Z);
        let region = mesh.region(Axis::Y, shape, false);
        let (out, points) = pointwise(
            &self.pool,
            shape,
            &region,
            f.location(),
            self.close_z(shape),
            |x, y, z| {
                let (ym, yp) = (ly.offset(y, -1), ly.offset(y, 1));
                let (zm, zp) = (lz.offset(z, -1), lz.offset(z, 1));
                let upper = f.get(x, yp, zp) - f.get(x, ym, zp);
                let lower = f.get(x, yp, zm) - f.get(x, ym, zm);
                0.25 * (upper - lower) / (mesh.spacing(Axis::Y, x, y) * mesh.dz())
            },
        );
        self.metrics.record_points(points);
        Ok(out)
    }

    /// `d2f/dxdy`. Not implemented by any scheme; always zero.
    pub fn d2dxdy(&self, f: &Field) -> Result<Field, DerivError> {
        self.check(f)?;
        self.metrics.record_mixed();
        Ok(Field::zeros(f.shape()).with_location(f.location()))
    }

    // ── Advection and flux ─────────────────────────────────────────

    /// Advection `v * df/d(axis)`.
    pub fn upwind(
        &self,
        axis: Axis,
        v: &Field,
        f: &Field,
        opts: DerivOpts,
    ) -> Result<Field, DerivError> {
        self.metrics.record_class(OperatorClass::Upwind);
        self.advect(OperatorClass::Upwind, axis, v, f, opts)
    }

    /// Flux-conservative `d(v f)/d(axis)`.
    pub fn flux(
        &self,
        axis: Axis,
        v: &Field,
        f: &Field,
        opts: DerivOpts,
    ) -> Result<Field, DerivError> {
        self.metrics.record_class(OperatorClass::Flux);
        self.advect(OperatorClass::Flux, axis, v, f, opts)
    }

    /// `v df/dx` with default options.
    pub fn vddx(&self, v: &Field, f: &Field) -> Result<Field, DerivError> {
        self.upwind(Axis::X, v, f, DerivOpts::default())
    }

    /// `v df/dy` with default options.
    pub fn vddy(&self, v: &Field, f: &Field) -> Result<Field, DerivError> {
        self.upwind(Axis::Y, v, f, DerivOpts::default())
    }

    /// `v df/dz` with default options.
    pub fn vddz(&self, v: &Field, f: &Field) -> Result<Field, DerivError> {
        self.upwind(Axis::Z, v, f, DerivOpts::default())
    }

    /// `d(v f)/dx` with default options.
    pub fn fddx(&self, v: &Field, f: &Field) -> Result<Field, DerivError> {
        self.flux(Axis::X, v, f, DerivOpts::default())
    }

    /// `d(v f)/dy` with default options.
    pub fn fddy(&self, v: &Field, f: &Field) -> Result<Field, DerivError> {
        self.flux(Axis::Y, v, f, DerivOpts::default())
    }

    /// `d(v f)/dz` with default options.
    pub fn fddz(&self, v: &Field, f: &Field) -> Result<Field, DerivError> {
        self.flux(Axis::Z, v, f, DerivOpts::default())
    }

    fn advect(
        &self,
        class: OperatorClass,
        axis: Axis,
        v: &Field,
        f: &Field,
        opts: DerivOpts,
    ) -> Result<Field, DerivError> {
        self.check(v)?;
        self.check(f)?;
        let plan = resolve::advection(
            self.config.stagger_grids(),
            axis,
            v.location(),
            f.location(),
            opts.outloc,
        );

        let shifted;
        let v = match plan.v_pre {
            Some(loc) => {
                shifted = self.interp_to(v, loc)?;
                &shifted
            }
            None => v,
        };

        let shape = wider(v.shape(), f.shape());
        let flat = axis == Axis::Z
            && (shape[2] == 1 || (class == OperatorClass::Upwind && f.is_2d()));
        if flat {
            let zero = Field::zeros(shape).with_location(plan.result);
            return self.finish(zero, plan.post);
        }

        let entry = self.config.entry(axis, class, plan.alignment, opts.method)?;
        let include_boundary = opts.include_boundary || plan.post.is_some();
        let result = match (entry.kernel, plan.shift) {
            (Kernel::Upwind(k), None) => {
                self.pair_centred(axis, v, f, k, entry.reach, include_boundary, plan.result)?
            }
            (Kernel::UpwindStaggered(k), Some(shift)) => self.pair_staggered(
                axis,
                v,
                f,
                k,
                entry.reach,
                shift,
                include_boundary,
                plan.result,
            )?,
            (Kernel::Ppm, None) => {
                self.ppm(axis, v, f, entry.reach, include_boundary, plan.result)?
            }
            (Kernel::Split, _) => self.split(axis, v, f, include_boundary, plan.result)?,
            (kernel, _) => return Err(self.mismatch(class, plan.alignment, kernel)),
        };
        self.finish(result, plan.post)
    }

    /// `v df/d(axis) + f dv/d(axis)`, each with its configured scheme.
    fn split(
        &self,
        axis: Axis,
        v: &Field,
        f: &Field,
        include_boundary: bool,
        result: CellLocation,
    ) -> Result<Field, DerivError> {
        let opts = DerivOpts {
            outloc: Some(result),
            method: None,
            include_boundary,
        };
        let advection = self.upwind(axis, v, f, opts)?;
        let dv = self.first(axis, v, opts)?;
        let stretch = combine(&dv, f, |a, b| a * b)?;
        combine(&advection, &stretch, |a, b| a + b)
    }

    /// Kurganov-Tadmor flux difference `F(i-1/2) - F(i+1/2)` divided by the
    /// spacing, for `du/dt = -d(flux)/d(axis)`.
    ///
    /// `vmax` is the local maximum wave speed; it may be planar.
    pub fn muscl(
        &self,
        axis: Axis,
        flux: &Field,
        u: &Field,
        vmax: &Field,
    ) -> Result<Field, DerivError> {
        self.check(flux)?;
        self.check(u)?;
        self.check(vmax)?;
        self.metrics.record_muscl();

        let shape = wider(flux.shape(), u.shape());
        if axis == Axis::Z && shape[2] == 1 {
            return Ok(Field::zeros(shape).with_location(flux.location()));
        }
        let reach = 2;
        self.ensure_reach(axis, shape, reach)?;

        let mesh = &*self.mesh;
        let ef = Extractor::new(mesh, axis, flux);
        let eu = Extractor::new(mesh, axis, u);
        let ev = Extractor::new(mesh, axis, vmax);
        let region = mesh.region(axis, shape, false);
        let (out, points) = pointwise(
            &self.pool,
            shape,
            &region,
            flux.location(),
            self.close_z(shape),
            |x, y, z| {
                let kt = muscl::kt(
                    &ef.centred(x, y, z, reach),
                    &eu.centred(x, y, z, reach),
                    ev.value(x, y, z),
                );
                kt / mesh.spacing(axis, x, y)
            },
        );
        self.metrics.record_points(points);
        Ok(out)
    }

    // ── Location shifts ────────────────────────────────────────────

    /// Shift `f` to `loc` by staggered interpolation.
    ///
    /// A no-op when `f` is already at `loc` or staggered grids are off.
    /// Shifts between two face locations go through the cell centre. The
    /// shift axis is computed over its interior; the other axes over every
    /// computable point.
    ///
    /// # Errors
    ///
    /// [`DerivError::InvalidLocation`] for a planar field to or from
    /// `ZLow`; [`DerivError::StencilUnderRead`] if the ghost layer is
    /// narrower than the interpolation.
    pub fn interp_to(&self, f: &Field, loc: CellLocation) -> Result<Field, DerivError> {
        self.check(f)?;
        let from = f.location();
        if from == loc || !self.config.stagger_grids() {
            return Ok(f.clone());
        }
        if f.is_2d() && (from == CellLocation::ZLow || loc == CellLocation::ZLow) {
            return Err(DerivError::InvalidLocation {
                from,
                to: loc,
                reason: "planar fields have no z faces".to_string(),
            });
        }
        let (axis, shift) = match (from.staggered_axis(), loc.staggered_axis()) {
            (None, Some(axis)) => (axis, Shift::CentreToLow),
            (Some(axis), None) => (axis, Shift::LowToCentre),
            (Some(_), Some(_)) => {
                let centred = self.interp_to(f, CellLocation::Centre)?;
                return self.interp_to(&centred, loc);
            }
            (None, None) => {
                return Err(DerivError::InvalidLocation {
                    from,
                    to: loc,
                    reason: "no axis to shift along".to_string(),
                })
            }
        };

        self.metrics.record_interp();
        let scheme = self.config.interp();
        let reach = scheme.reach();
        let shape = f.shape();
        self.ensure_reach(axis, shape, reach)?;

        let ex = Extractor::new(&self.mesh, axis, f);
        let region = self.mesh.region(axis, shape, true);
        let (out, points) = pointwise(&self.pool, shape, &region, loc, self.close_z(shape), |x, y, z| {
            scheme.apply(&ex.staggered(x, y, z, shift, reach))
        });
        self.metrics.record_points(points);
        Ok(out)
    }

    // ── Kernel drivers ─────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    fn centred(
        &self,
        axis: Axis,
        f: &Field,
        kernel: CentredFn,
        reach: usize,
        power: i32,
        include_boundary: bool,
        location: CellLocation,
    ) -> Result<Field, DerivError> {
        let shape = f.shape();
        self.ensure_reach(axis, shape, reach)?;
        let mesh = &*self.mesh;
        let ex = Extractor::new(mesh, axis, f);
        let region = mesh.region(axis, shape, include_boundary);
        let (out, points) = pointwise(
            &self.pool,
            shape,
            &region,
            location,
            self.close_z(shape),
            |x, y, z| kernel(&ex.centred(x, y, z, reach)) / mesh.spacing(axis, x, y).powi(power),
        );
        self.metrics.record_points(points);
        Ok(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn staggered(
        &self,
        axis: Axis,
        f: &Field,
        kernel: StaggeredFn,
        reach: usize,
        shift: Shift,
        power: i32,
        include_boundary: bool,
        location: CellLocation,
    ) -> Result<Field, DerivError> {
        let shape = f.shape();
        self.ensure_reach(axis, shape, reach)?;
        let mesh = &*self.mesh;
        let ex = Extractor::new(mesh, axis, f);
        let region = mesh.region(axis, shape, include_boundary);
        let (out, points) = pointwise(
            &self.pool,
            shape,
            &region,
            location,
            self.close_z(shape),
            |x, y, z| {
                kernel(&ex.staggered(x, y, z, shift, reach)) / mesh.spacing(axis, x, y).powi(power)
            },
        );
        self.metrics.record_points(points);
        Ok(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn pair_centred(
        &self,
        axis: Axis,
        v: &Field,
        f: &Field,
        kernel: UpwindFn,
        reach: usize,
        include_boundary: bool,
        location: CellLocation,
    ) -> Result<Field, DerivError> {
        let shape = wider(v.shape(), f.shape());
        self.ensure_reach(axis, shape, reach)?;
        let mesh = &*self.mesh;
        let ev = Extractor::new(mesh, axis, v);
        let ef = Extractor::new(mesh, axis, f);
        let region = mesh.region(axis, shape, include_boundary);
        let (out, points) = pointwise(
            &self.pool,
            shape,
            &region,
            location,
            self.close_z(shape),
            |x, y, z| {
                kernel(&ev.centred(x, y, z, reach), &ef.centred(x, y, z, reach))
                    / mesh.spacing(axis, x, y)
            },
        );
        self.metrics.record_points(points);
        Ok(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn pair_staggered(
        &self,
        axis: Axis,
        v: &Field,
        f: &Field,
        kernel: UpwindStaggeredFn,
        reach: usize,
        shift: Shift,
        include_boundary: bool,
        location: CellLocation,
    ) -> Result<Field, DerivError> {
        let shape = wider(v.shape(), f.shape());
        self.ensure_reach(axis, shape, reach)?;
        let mesh = &*self.mesh;
        let ev = Extractor::new(mesh, axis, v);
        let ef = Extractor::new(mesh, axis, f);
        let region = mesh.region(axis, shape, include_boundary);
        let (out, points) = pointwise(
            &self.pool,
            shape,
            &region,
            location,
            self.close_z(shape),
            |x, y, z| {
                kernel(&ev.staggered(x, y, z, shift, reach), &ef.centred(x, y, z, reach))
                    / mesh.spacing(axis, x, y)
            },
        );
        self.metrics.record_points(points);
        Ok(out)
    }

    /// Piecewise parabolic advection. Each point gets its own window of
    /// `PPM_PAD` samples on each side, so `reach` must cover the pad.
    fn ppm(
        &self,
        axis: Axis,
        v: &Field,
        f: &Field,
        reach: usize,
        include_boundary: bool,
        location: CellLocation,
    ) -> Result<Field, DerivError> {
        const WIDTH: usize = 2 * ppm::PPM_PAD + 1;
        let shape = wider(v.shape(), f.shape());
        self.ensure_reach(axis, shape, reach)?;
        let mesh = &*self.mesh;
        let ev = Extractor::new(mesh, axis, v);
        let ef = Extractor::new(mesh, axis, f);
        let region = mesh.region(axis, shape, include_boundary);
        let (out, points) = pointwise(
            &self.pool,
            shape,
            &region,
            location,
            self.close_z(shape),
            |x, y, z| {
                let mut a = [0.0; WIDTH];
                let mut u = [0.0; WIDTH];
                for (i, off) in (-(ppm::PPM_PAD as isize)..=ppm::PPM_PAD as isize).enumerate() {
                    a[i] = ef.read(x, y, z, off);
                    u[i] = ev.read(x, y, z, off);
                }
                let h = [mesh.spacing(axis, x, y); WIDTH];
                let mut result = [0.0];
                ppm::advect_line(&a, &u, &h, &mut result);
                result[0]
            },
        );
        self.metrics.record_points(points);
        Ok(out)
    }

    fn spectral(
        &self,
        f: &Field,
        order: Order,
        shift: Option<Shift>,
        include_boundary: bool,
        location: CellLocation,
    ) -> Result<Field, DerivError> {
        let spectral = self
            .spectral
            .as_ref()
            .ok_or(DerivError::SpectralOnBoundedAxis { axis: Axis::Z })?;
        let columns = self.mesh.region(Axis::Z, f.shape(), include_boundary);
        let (out, lines) = spectral.apply(&self.pool, f, &columns, order, shift, location);
        self.metrics.record_spectral_lines(lines);
        Ok(out)
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn check(&self, f: &Field) -> Result<(), DerivError> {
        self.mesh.check(f).map_err(|_| DerivError::ShapeMismatch {
            expected: if f.is_2d() {
                self.mesh.shape_2d()
            } else {
                self.mesh.shape_3d()
            },
            actual: f.shape(),
        })
    }

    fn ensure_reach(&self, axis: Axis, shape: [usize; 3], reach: usize) -> Result<(), DerivError> {
        let layout = self.mesh.layout_in(axis, shape);
        if layout.supports_reach(reach) {
            Ok(())
        } else {
            log::error!(
                "{axis} stencil of reach {reach} exceeds {} ghost cells",
                layout.ghosts()
            );
            Err(DerivError::StencilUnderRead {
                axis,
                required: reach,
                available: layout.ghosts(),
            })
        }
    }

    fn close_z(&self, shape: [usize; 3]) -> bool {
        shape[2] > 1 && self.mesh.layout(Axis::Z).is_periodic()
    }

    fn mismatch(&self, class: OperatorClass, alignment: Alignment, kernel: Kernel) -> DerivError {
        log::error!(
            "{alignment} {class} table holds a {} kernel, which it cannot apply",
            kernel.kind()
        );
        DerivError::NoKernel { class, alignment }
    }

    fn finish(&self, result: Field, post: Option<CellLocation>) -> Result<Field, DerivError> {
        match post {
            Some(loc) => self.interp_to(&result, loc),
            None => Ok(result),
        }
    }
}

/// Pointwise combination keeping `a`'s location. A planar operand is
/// broadcast along z.
fn combine(a: &Field, b: &Field, op: impl Fn(f64, f64) -> f64) -> Result<Field, DerivError> {
    a.zip_with(b, op).map_err(|_| DerivError::ShapeMismatch {
        expected: a.shape(),
        actual: b.shape(),
    })
}
