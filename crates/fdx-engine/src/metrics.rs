//! Operator call counters.
//!
//! [`OperatorMetrics`] is updated with relaxed atomics from `&self`
//! operator calls; [`MetricsSnapshot`] is a plain copy for reporting.

use std::sync::atomic::{AtomicU64, Ordering};

use fdx_core::OperatorClass;

/// Live counters owned by a [`Differentiator`](crate::Differentiator).
#[derive(Debug, Default)]
pub struct OperatorMetrics {
    first: AtomicU64,
    second: AtomicU64,
    upwind: AtomicU64,
    flux: AtomicU64,
    fourth: AtomicU64,
    mixed: AtomicU64,
    muscl: AtomicU64,
    interp: AtomicU64,
    spectral_lines: AtomicU64,
    points: AtomicU64,
}

impl OperatorMetrics {
    pub(crate) fn record_class(&self, class: OperatorClass) {
        let counter = match class {
            OperatorClass::First => &self.first,
            OperatorClass::Second => &self.second,
            OperatorClass::Upwind => &self.upwind,
            OperatorClass::Flux => &self.flux,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fourth(&self) {
        self.fourth.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_mixed(&self) {
        self.mixed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_muscl(&self) {
        self.muscl.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_interp(&self) {
        self.interp.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_spectral_lines(&self, lines: u64) {
        self.spectral_lines.fetch_add(lines, Ordering::Relaxed);
    }

    pub(crate) fn record_points(&self, points: u64) {
        self.points.fetch_add(points, Ordering::Relaxed);
    }

    /// Copy the current counter values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        MetricsSnapshot {
            first_calls: load(&self.first),
            second_calls: load(&self.second),
            upwind_calls: load(&self.upwind),
            flux_calls: load(&self.flux),
            fourth_calls: load(&self.fourth),
            mixed_calls: load(&self.mixed),
            muscl_calls: load(&self.muscl),
            interp_calls: load(&self.interp),
            spectral_lines: load(&self.spectral_lines),
            points: load(&self.points),
        }
    }
}

/// Counter values at one instant.
///
/// Calls made internally (the first derivative inside a `SPLIT` flux, the
/// interpolations around a staggered call) are counted too.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// First-derivative calls.
    pub first_calls: u64,
    /// Second-derivative calls.
    pub second_calls: u64,
    /// Advection calls.
    pub upwind_calls: u64,
    /// Flux calls.
    pub flux_calls: u64,
    /// Fourth-derivative calls.
    pub fourth_calls: u64,
    /// Mixed-derivative calls.
    pub mixed_calls: u64,
    /// MUSCL flux-difference calls.
    pub muscl_calls: u64,
    /// Location shifts that did work (identity shifts are not counted).
    pub interp_calls: u64,
    /// z-lines transformed by the spectral path.
    pub spectral_lines: u64,
    /// Points evaluated by pointwise kernels.
    pub points: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = OperatorMetrics::default();
        assert_eq!(m.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn counters_accumulate() {
        let m = OperatorMetrics::default();
        m.record_class(OperatorClass::First);
        m.record_class(OperatorClass::First);
        m.record_class(OperatorClass::Flux);
        m.record_spectral_lines(16);
        m.record_points(100);
        m.record_points(20);
        let s = m.snapshot();
        assert_eq!(s.first_calls, 2);
        assert_eq!(s.flux_calls, 1);
        assert_eq!(s.second_calls, 0);
        assert_eq!(s.spectral_lines, 16);
        assert_eq!(s.points, 120);
    }
}
