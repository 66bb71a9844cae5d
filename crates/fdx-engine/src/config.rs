//! Differencing options, their resolution, and configuration errors.
//!
//! [`DiffOptions`] is the user-facing input, deserialisable from JSON.
//! [`DiffConfig::resolve()`] turns it into an immutable per-axis, per-class,
//! per-alignment method selection that the
//! [`Differentiator`](crate::Differentiator) holds for the rest of the run.

use std::error::Error;
use std::fmt;

use fdx_core::{Alignment, Axis, DerivError, DiffMethod, OperatorClass};
use fdx_mesh::Mesh;
use fdx_schemes::{InterpScheme, Kernel, Registry, SchemeEntry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ── AxisOptions ────────────────────────────────────────────────────

/// Scheme labels for one axis section (`ddx`, `ddy` or `ddz`).
///
/// Missing labels select the table default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisOptions {
    /// First-derivative scheme.
    pub first: Option<String>,
    /// Second-derivative scheme.
    pub second: Option<String>,
    /// Advection scheme.
    pub upwind: Option<String>,
    /// Flux scheme.
    pub flux: Option<String>,
}

impl AxisOptions {
    /// Label configured for `class`, or `""` if unset.
    pub fn label(&self, class: OperatorClass) -> &str {
        let slot = match class {
            OperatorClass::First => &self.first,
            OperatorClass::Second => &self.second,
            OperatorClass::Upwind => &self.upwind,
            OperatorClass::Flux => &self.flux,
        };
        slot.as_deref().unwrap_or("")
    }
}

// ── ParallelConfig ─────────────────────────────────────────────────

/// Thread pool sizing for the applicator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Number of worker threads. `None` = auto-detect
    /// (`available_parallelism`).
    pub worker_count: Option<usize>,
}

impl ParallelConfig {
    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 256]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, 256),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

// ── DiffOptions ────────────────────────────────────────────────────

/// User-facing differencing options.
///
/// ```
/// use fdx_engine::DiffOptions;
///
/// let opts = DiffOptions::from_json(r#"{
///     "stagger_grids": true,
///     "ddx": { "first": "C4", "second": "C4" },
///     "ddz": { "first": "FFT" }
/// }"#).unwrap();
/// assert!(opts.stagger_grids);
/// assert_eq!(opts.interp, "C4");
/// assert_eq!(opts.ddz.first.as_deref(), Some("FFT"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Enable location-aware staggered differencing. Default: `false`.
    pub stagger_grids: bool,
    /// Interpolation order for location shifts (`"C2"` or `"C4"`).
    /// Default: `"C4"`.
    pub interp: String,
    /// Thread pool sizing.
    pub parallel: ParallelConfig,
    /// X-axis schemes.
    pub ddx: AxisOptions,
    /// Y-axis schemes.
    pub ddy: AxisOptions,
    /// Z-axis schemes.
    pub ddz: AxisOptions,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            stagger_grids: false,
            interp: InterpScheme::default().label().to_string(),
            parallel: ParallelConfig::default(),
            ddx: AxisOptions::default(),
            ddy: AxisOptions::default(),
            ddz: AxisOptions::default(),
        }
    }
}

impl DiffOptions {
    /// Parse options from a JSON document. Unknown keys are ignored and
    /// missing keys take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Options section for `axis`.
    pub fn axis(&self, axis: Axis) -> &AxisOptions {
        match axis {
            Axis::X => &self.ddx,
            Axis::Y => &self.ddy,
            Axis::Z => &self.ddz,
        }
    }

    /// Mutable options section for `axis`.
    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisOptions {
        match axis {
            Axis::X => &mut self.ddx,
            Axis::Y => &mut self.ddy,
            Axis::Z => &mut self.ddz,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building a [`DiffConfig`] or a
/// [`Differentiator`](crate::Differentiator).
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The options document could not be parsed.
    Parse {
        /// Parser message.
        reason: String,
    },
    /// A scheme selection cannot be satisfied.
    Deriv(DerivError),
    /// The interpolation label is neither `C2` nor `C4`.
    InvalidInterp {
        /// The rejected label.
        label: String,
    },
    /// The mesh z length does not match the spectral plan.
    MeshMismatch {
        /// Description of the mismatch.
        reason: String,
    },
    /// The worker thread pool could not be started.
    ThreadPool {
        /// Builder message.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { reason } => write!(f, "invalid differencing options: {reason}"),
            Self::Deriv(e) => write!(f, "scheme selection: {e}"),
            Self::InvalidInterp { label } => {
                write!(f, "interp must be C2 or C4, got '{label}'")
            }
            Self::MeshMismatch { reason } => write!(f, "mesh mismatch: {reason}"),
            Self::ThreadPool { reason } => write!(f, "thread pool: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Deriv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DerivError> for ConfigError {
    fn from(e: DerivError) -> Self {
        Self::Deriv(e)
    }
}

// ── DiffConfig ─────────────────────────────────────────────────────

type SelectionKey = (Axis, OperatorClass, Alignment);

/// Resolved, immutable differencing configuration.
#[derive(Clone, Debug)]
pub struct DiffConfig {
    stagger_grids: bool,
    interp: InterpScheme,
    worker_count: usize,
    z_periodic: bool,
    methods: IndexMap<SelectionKey, DiffMethod>,
    registry: Registry,
}

impl DiffConfig {
    /// Resolve `options` against the scheme `registry` for `mesh`.
    ///
    /// Unknown labels fall back with a logged notice. A spectral method on a
    /// non-periodic axis, or an empty table, is an error.
    pub fn resolve(
        options: &DiffOptions,
        registry: Registry,
        mesh: &Mesh,
    ) -> Result<Self, ConfigError> {
        let interp =
            InterpScheme::from_label(&options.interp).ok_or_else(|| ConfigError::InvalidInterp {
                label: options.interp.clone(),
            })?;
        let z_periodic = mesh.layout(Axis::Z).is_periodic();

        let mut methods = IndexMap::new();
        for axis in Axis::ALL {
            log::info!("Setting {axis} differencing methods");
            let section = options.axis(axis);
            for class in OperatorClass::ALL {
                for alignment in [Alignment::Centred, Alignment::Staggered] {
                    let table = registry.table(class, alignment)?;
                    let method = table.resolve(section.label(class))?;
                    let entry = table.lookup(method)?;
                    if matches!(entry.kernel, Kernel::Spectral)
                        && !(axis == Axis::Z && z_periodic)
                    {
                        log::error!("FFT cannot be used in {axis}");
                        return Err(DerivError::SpectralOnBoundedAxis { axis }.into());
                    }
                    if alignment == Alignment::Centred || options.stagger_grids {
                        log::info!("  {alignment:>9} {class:<6}: {method}");
                    }
                    methods.insert((axis, class, alignment), method);
                }
            }
        }

        Ok(Self {
            stagger_grids: options.stagger_grids,
            interp,
            worker_count: options.parallel.resolved_worker_count(),
            z_periodic,
            methods,
            registry,
        })
    }

    /// Whether location-aware differencing is on.
    pub fn stagger_grids(&self) -> bool {
        self.stagger_grids
    }

    /// Interpolation order for location shifts.
    pub fn interp(&self) -> InterpScheme {
        self.interp
    }

    /// Resolved worker count.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Whether z was periodic on the mesh this was resolved against.
    pub fn z_periodic(&self) -> bool {
        self.z_periodic
    }

    /// The scheme tables in use.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Configured method for an axis, class and alignment. A selection
    /// that was never resolved falls back to the table's default entry.
    pub fn method(
        &self,
        axis: Axis,
        class: OperatorClass,
        alignment: Alignment,
    ) -> Result<DiffMethod, DerivError> {
        if let Some(&method) = self.methods.get(&(axis, class, alignment)) {
            return Ok(method);
        }
        Ok(self.registry.table(class, alignment)?.default_entry()?.method)
    }

    /// Table entry to use for one call, honouring a per-call override.
    pub fn entry(
        &self,
        axis: Axis,
        class: OperatorClass,
        alignment: Alignment,
        method: Option<DiffMethod>,
    ) -> Result<SchemeEntry, DerivError> {
        let table = self.registry.table(class, alignment)?;
        let method = match method {
            Some(m) => m,
            None => self.method(axis, class, alignment)?,
        };
        let entry = *table.lookup(method)?;
        if matches!(entry.kernel, Kernel::Spectral) && !(axis == Axis::Z && self.z_periodic) {
            log::error!("FFT cannot be used in {axis}");
            return Err(DerivError::SpectralOnBoundedAxis { axis });
        }
        Ok(entry)
    }
}
