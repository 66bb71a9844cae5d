//! Location planning for one operator call.
//!
//! Decides which table alignment a call uses, where its result sits, and
//! which interpolations surround the kernel. Only location tags are
//! inspected; no field data is touched.

use fdx_core::{Alignment, Axis, CellLocation};

use crate::extract::Shift;

/// Plan for a single-operand derivative along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DerivPlan {
    /// Interpolate the operand here before differencing.
    pub pre: Option<CellLocation>,
    /// Table alignment.
    pub alignment: Alignment,
    /// Window layout for staggered tables.
    pub shift: Option<Shift>,
    /// Location of the kernel result.
    pub result: CellLocation,
    /// Interpolate the kernel result here afterwards.
    pub post: Option<CellLocation>,
}

impl DerivPlan {
    fn centred(location: CellLocation) -> Self {
        Self {
            pre: None,
            alignment: Alignment::Centred,
            shift: None,
            result: location,
            post: None,
        }
    }

    fn staggered(shift: Shift, result: CellLocation) -> Self {
        Self {
            pre: None,
            alignment: Alignment::Staggered,
            shift: Some(shift),
            result,
            post: None,
        }
    }

    fn then(mut self, target: CellLocation) -> Self {
        if target != self.result {
            self.post = Some(target);
        }
        self
    }
}

/// Plan `d/d(axis)` of a field at `input`, optionally landing at `outloc`.
pub(crate) fn derivative(
    stagger_grids: bool,
    axis: Axis,
    input: CellLocation,
    outloc: Option<CellLocation>,
) -> DerivPlan {
    if !stagger_grids {
        return DerivPlan::centred(input);
    }
    let target = outloc.unwrap_or(input);
    let low = axis.low_location();

    if target == input {
        return DerivPlan::centred(input);
    }
    match input {
        CellLocation::Centre if target == low => DerivPlan::staggered(Shift::CentreToLow, low),
        CellLocation::Centre => DerivPlan::centred(CellLocation::Centre).then(target),
        loc if loc == low => {
            DerivPlan::staggered(Shift::LowToCentre, CellLocation::Centre).then(target)
        }
        _ => {
            let mut plan = derivative(true, axis, CellLocation::Centre, Some(target));
            plan.pre = Some(CellLocation::Centre);
            plan
        }
    }
}

/// Plan for a two-operand `(v, f)` operator along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AdvectPlan {
    /// Interpolate `v` here before differencing.
    pub v_pre: Option<CellLocation>,
    /// Table alignment.
    pub alignment: Alignment,
    /// Window layout of `v` for staggered tables. `f` is always read centred.
    pub shift: Option<Shift>,
    /// Location of the kernel result.
    pub result: CellLocation,
    /// Interpolate the kernel result here afterwards.
    pub post: Option<CellLocation>,
}

/// Plan `v * d f/d(axis)` or `d(v f)/d(axis)`.
pub(crate) fn advection(
    stagger_grids: bool,
    axis: Axis,
    v: CellLocation,
    f: CellLocation,
    outloc: Option<CellLocation>,
) -> AdvectPlan {
    let mut plan = AdvectPlan {
        v_pre: None,
        alignment: Alignment::Centred,
        shift: None,
        result: f,
        post: None,
    };
    if !stagger_grids {
        return plan;
    }
    let low = axis.low_location();
    if v == f {
        // Centred, result at f.
    } else if v == low && f == CellLocation::Centre {
        plan.alignment = Alignment::Staggered;
        plan.shift = Some(Shift::LowToCentre);
    } else if v == CellLocation::Centre && f == low {
        plan.alignment = Alignment::Staggered;
        plan.shift = Some(Shift::CentreToLow);
    } else {
        plan.v_pre = Some(f);
    }
    if let Some(target) = outloc {
        if target != plan.result {
            plan.post = Some(target);
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use CellLocation::{Centre, XLow, YLow, ZLow};

    #[test]
    fn unstaggered_calls_ignore_locations() {
        let p = derivative(false, Axis::X, XLow, Some(Centre));
        assert_eq!(p, DerivPlan::centred(XLow));
        let a = advection(false, Axis::Y, YLow, Centre, Some(ZLow));
        assert_eq!(a.alignment, Alignment::Centred);
        assert_eq!(a.result, Centre);
        assert_eq!(a.post, None);
    }

    #[test]
    fn same_location_is_centred() {
        assert_eq!(derivative(true, Axis::X, Centre, None), DerivPlan::centred(Centre));
        assert_eq!(derivative(true, Axis::X, YLow, Some(YLow)), DerivPlan::centred(YLow));
    }

    #[test]
    fn single_shifts_use_staggered_tables() {
        let p = derivative(true, Axis::X, Centre, Some(XLow));
        assert_eq!(p.alignment, Alignment::Staggered);
        assert_eq!(p.shift, Some(Shift::CentreToLow));
        assert_eq!(p.result, XLow);
        assert_eq!(p.post, None);

        let p = derivative(true, Axis::Z, ZLow, Some(Centre));
        assert_eq!(p.shift, Some(Shift::LowToCentre));
        assert_eq!(p.result, Centre);
    }

    #[test]
    fn low_input_to_other_low_goes_through_centre() {
        let p = derivative(true, Axis::X, XLow, Some(YLow));
        assert_eq!(p.alignment, Alignment::Staggered);
        assert_eq!(p.result, Centre);
        assert_eq!(p.post, Some(YLow));
    }

    #[test]
    fn foreign_low_input_is_interpolated_first() {
        let p = derivative(true, Axis::X, YLow, Some(XLow));
        assert_eq!(p.pre, Some(Centre));
        assert_eq!(p.shift, Some(Shift::CentreToLow));
        assert_eq!(p.result, XLow);

        let p = derivative(true, Axis::X, YLow, Some(Centre));
        assert_eq!(p.pre, Some(Centre));
        assert_eq!(p.alignment, Alignment::Centred);
        assert_eq!(p.post, None);
    }

    #[test]
    fn centre_to_foreign_low_interpolates_after() {
        let p = derivative(true, Axis::Y, Centre, Some(ZLow));
        assert_eq!(p.alignment, Alignment::Centred);
        assert_eq!(p.result, Centre);
        assert_eq!(p.post, Some(ZLow));
    }

    #[test]
    fn advection_staggered_cases() {
        let a = advection(true, Axis::X, XLow, Centre, None);
        assert_eq!(a.alignment, Alignment::Staggered);
        assert_eq!(a.shift, Some(Shift::LowToCentre));
        assert_eq!(a.result, Centre);

        let a = advection(true, Axis::X, Centre, XLow, None);
        assert_eq!(a.shift, Some(Shift::CentreToLow));
        assert_eq!(a.result, XLow);
    }

    #[test]
    fn advection_mismatch_interpolates_v() {
        let a = advection(true, Axis::X, YLow, Centre, Some(XLow));
        assert_eq!(a.v_pre, Some(Centre));
        assert_eq!(a.alignment, Alignment::Centred);
        assert_eq!(a.result, Centre);
        assert_eq!(a.post, Some(XLow));
    }
}
