//! Differencing method codes and operator classes.

use std::fmt;

/// A differencing scheme identifier.
///
/// The variants follow the order of the name table used for configuration
/// lookup: class matches (first-letter matches) are resolved in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiffMethod {
    /// First-order upwinding.
    U1,
    /// Second-order central.
    C2,
    /// Second-order central WENO.
    W2,
    /// Third-order WENO.
    W3,
    /// Fourth-order central.
    C4,
    /// Fourth-order upwinding.
    U4,
    /// Smoothing second-order.
    S2,
    /// Spectral differencing along the periodic axis.
    Fft,
    /// Non-oscillatory, no free parameters, dissipative.
    Nnd,
    /// Flux split into an upwind and a central-derivative-of-velocity part.
    Split,
    /// Piecewise parabolic method (advection only).
    Ppm,
}

impl DiffMethod {
    /// Every method, in name-table order.
    pub const ALL: [DiffMethod; 11] = [
        DiffMethod::U1,
        DiffMethod::C2,
        DiffMethod::W2,
        DiffMethod::W3,
        DiffMethod::C4,
        DiffMethod::U4,
        DiffMethod::S2,
        DiffMethod::Fft,
        DiffMethod::Nnd,
        DiffMethod::Split,
        DiffMethod::Ppm,
    ];

    /// Short configuration label, e.g. `"C4"`.
    pub fn label(self) -> &'static str {
        match self {
            DiffMethod::U1 => "U1",
            DiffMethod::C2 => "C2",
            DiffMethod::W2 => "W2",
            DiffMethod::W3 => "W3",
            DiffMethod::C4 => "C4",
            DiffMethod::U4 => "U4",
            DiffMethod::S2 => "S2",
            DiffMethod::Fft => "FFT",
            DiffMethod::Nnd => "NND",
            DiffMethod::Split => "SPLIT",
            DiffMethod::Ppm => "PPM",
        }
    }

    /// Human-readable name printed in configuration summaries.
    pub fn long_name(self) -> &'static str {
        match self {
            DiffMethod::U1 => "First order upwinding",
            DiffMethod::C2 => "Second order central",
            DiffMethod::W2 => "Second order WENO",
            DiffMethod::W3 => "Third order WENO",
            DiffMethod::C4 => "Fourth order central",
            DiffMethod::U4 => "Fourth order upwinding",
            DiffMethod::S2 => "Smoothing 2nd order",
            DiffMethod::Fft => "FFT",
            DiffMethod::Nnd => "NND",
            DiffMethod::Split => "Split into upwind and central",
            DiffMethod::Ppm => "Piecewise Parabolic Method",
        }
    }

    /// Exact, case-insensitive label match.
    pub fn from_label(label: &str) -> Option<DiffMethod> {
        Self::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(label))
    }

    /// Whether `label` starts with the same letter (case-insensitive) as
    /// this method's label.
    pub fn shares_class_with(self, label: &str) -> bool {
        match (label.chars().next(), self.label().chars().next()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(&b),
            _ => false,
        }
    }
}

impl fmt::Display for DiffMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.long_name(), self.label())
    }
}

/// The four operator classes, each with its own scheme tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperatorClass {
    /// First derivative `df/dx`.
    First,
    /// Second derivative `d2f/dx2`.
    Second,
    /// Advection `v * df/dx`.
    Upwind,
    /// Flux-conservative `d(v f)/dx`.
    Flux,
}

impl OperatorClass {
    /// All classes in configuration order.
    pub const ALL: [OperatorClass; 4] = [
        OperatorClass::First,
        OperatorClass::Second,
        OperatorClass::Upwind,
        OperatorClass::Flux,
    ];

    /// Configuration key for this class inside an axis section.
    pub fn key(self) -> &'static str {
        match self {
            OperatorClass::First => "first",
            OperatorClass::Second => "second",
            OperatorClass::Upwind => "upwind",
            OperatorClass::Flux => "flux",
        }
    }
}

impl fmt::Display for OperatorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whether input and output share a location or sit half a cell apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Alignment {
    /// Input and result at the same location.
    Centred,
    /// Result shifted half a cell relative to (part of) the input.
    Staggered,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alignment::Centred => f.write_str("centred"),
            Alignment::Staggered => f.write_str("staggered"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(DiffMethod::from_label("c4"), Some(DiffMethod::C4));
        assert_eq!(DiffMethod::from_label("Split"), Some(DiffMethod::Split));
        assert_eq!(DiffMethod::from_label("fft"), Some(DiffMethod::Fft));
        assert_eq!(DiffMethod::from_label("C6"), None);
        assert_eq!(DiffMethod::from_label(""), None);
    }

    #[test]
    fn class_match_uses_first_letter() {
        assert!(DiffMethod::C2.shares_class_with("c6"));
        assert!(DiffMethod::W3.shares_class_with("WENO"));
        assert!(!DiffMethod::U1.shares_class_with("C2"));
        assert!(!DiffMethod::U1.shares_class_with(""));
    }

    #[test]
    fn display_includes_long_name_and_label() {
        assert_eq!(DiffMethod::C4.to_string(), "Fourth order central (C4)");
    }

    proptest! {
        #[test]
        fn every_label_round_trips(idx in 0usize..DiffMethod::ALL.len(), upper in any::<bool>()) {
            let m = DiffMethod::ALL[idx];
            let label = if upper { m.label().to_uppercase() } else { m.label().to_lowercase() };
            prop_assert_eq!(DiffMethod::from_label(&label), Some(m));
        }
    }
}
