//! Scheme tables: which kernel implements a method for a given operator
//! class and grid alignment, and how configuration labels map to methods.

use std::fmt;

use fdx_core::{Alignment, DerivError, DiffMethod, OperatorClass};
use indexmap::IndexMap;

use crate::kernels::{first, flux, ppm, second, upwind};
use crate::stencil::{StaggeredStencil, Stencil};

/// Kernel over a centred window.
pub type CentredFn = fn(&Stencil) -> f64;
/// Kernel over a staggered window.
pub type StaggeredFn = fn(&StaggeredStencil) -> f64;
/// Two-operand kernel, `(v, f)` at the same location.
pub type UpwindFn = fn(&Stencil, &Stencil) -> f64;
/// Two-operand kernel with `v` half a cell off the result.
pub type UpwindStaggeredFn = fn(&StaggeredStencil, &Stencil) -> f64;

/// How a table entry is evaluated.
#[derive(Clone, Copy)]
pub enum Kernel {
    /// Pointwise over a centred window.
    Centred(CentredFn),
    /// Pointwise over a staggered window.
    Staggered(StaggeredFn),
    /// Pointwise over `(v, f)` centred windows.
    Upwind(UpwindFn),
    /// Pointwise over a staggered `v` and a centred `f`.
    UpwindStaggered(UpwindStaggeredFn),
    /// FFT along the periodic axis.
    Spectral,
    /// Flux as advection plus `f` times the first derivative of `v`.
    Split,
    /// Line-wide piecewise parabolic advection.
    Ppm,
}

impl Kernel {
    /// Variant name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Centred(_) => "centred",
            Self::Staggered(_) => "staggered",
            Self::Upwind(_) => "upwind",
            Self::UpwindStaggered(_) => "upwind-staggered",
            Self::Spectral => "spectral",
            Self::Split => "split",
            Self::Ppm => "ppm",
        }
    }
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kernel::{}", self.kind())
    }
}

/// One row of a scheme table.
#[derive(Clone, Copy, Debug)]
pub struct SchemeEntry {
    /// Method this row implements.
    pub method: DiffMethod,
    /// Evaluation strategy.
    pub kernel: Kernel,
    /// Neighbours read on each side along the derivative axis.
    pub reach: usize,
}

impl SchemeEntry {
    /// Convenience constructor.
    pub const fn new(method: DiffMethod, kernel: Kernel, reach: usize) -> Self {
        Self {
            method,
            kernel,
            reach,
        }
    }
}

/// Ordered list of kernels for one operator class and alignment.
///
/// The first entry is the default, used whenever a requested method is not
/// in the table.
#[derive(Clone, Debug)]
pub struct SchemeTable {
    class: OperatorClass,
    alignment: Alignment,
    entries: Vec<SchemeEntry>,
}

impl SchemeTable {
    /// Build a table. An empty entry list is allowed here and reported as
    /// [`DerivError::NoKernel`] when used.
    pub fn new(class: OperatorClass, alignment: Alignment, entries: Vec<SchemeEntry>) -> Self {
        Self {
            class,
            alignment,
            entries,
        }
    }

    /// Operator class.
    pub fn class(&self) -> OperatorClass {
        self.class
    }

    /// Alignment.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// All entries in order.
    pub fn entries(&self) -> &[SchemeEntry] {
        &self.entries
    }

    /// Whether `method` has an entry.
    pub fn contains(&self, method: DiffMethod) -> bool {
        self.entries.iter().any(|e| e.method == method)
    }

    fn no_kernel(&self) -> DerivError {
        DerivError::NoKernel {
            class: self.class,
            alignment: self.alignment,
        }
    }

    /// The default (first) entry.
    pub fn default_entry(&self) -> Result<&SchemeEntry, DerivError> {
        self.entries.first().ok_or_else(|| self.no_kernel())
    }

    /// Entry for `method`, or the default entry if the table lacks it.
    pub fn lookup(&self, method: DiffMethod) -> Result<&SchemeEntry, DerivError> {
        if let Some(e) = self.entries.iter().find(|e| e.method == method) {
            return Ok(e);
        }
        let fallback = self.default_entry()?;
        log::warn!(
            "{} {} table has no {}; using {}",
            self.alignment,
            self.class,
            method.label(),
            fallback.method.label()
        );
        Ok(fallback)
    }

    /// Map a configuration label to a method implemented by this table.
    ///
    /// Case-insensitive. An exact match wins. Failing that, the last method
    /// in name-table order whose label shares the first letter is used. If
    /// nothing matches, the default entry is used. An empty label selects
    /// the default silently.
    pub fn resolve(&self, label: &str) -> Result<DiffMethod, DerivError> {
        let default = self.default_entry()?.method;
        if label.is_empty() {
            return Ok(default);
        }
        let mut class_match = None;
        for m in DiffMethod::ALL {
            if m.shares_class_with(label) && self.contains(m) {
                if m.label().eq_ignore_ascii_case(label) {
                    return Ok(m);
                }
                class_match = Some(m);
            }
        }
        match class_match {
            Some(m) => {
                log::info!(
                    "type match for '{label}' in {} {} table -> {}",
                    self.alignment,
                    self.class,
                    m.label()
                );
                Ok(m)
            }
            None => {
                log::warn!(
                    "no match for '{label}' in {} {} table -> {}",
                    self.alignment,
                    self.class,
                    default.label()
                );
                Ok(default)
            }
        }
    }
}

/// The full set of scheme tables, keyed by class and alignment.
#[derive(Clone, Debug)]
pub struct Registry {
    tables: IndexMap<(OperatorClass, Alignment), SchemeTable>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl Registry {
    /// A registry with no tables.
    pub fn empty() -> Self {
        Self {
            tables: IndexMap::new(),
        }
    }

    /// The built-in tables.
    pub fn standard() -> Self {
        use Alignment::{Centred, Staggered};
        use DiffMethod::*;
        use Kernel as K;
        use OperatorClass::{First, Flux, Second, Upwind};

        let e = SchemeEntry::new;
        let mut r = Self::empty();

        r.insert(SchemeTable::new(
            First,
            Centred,
            vec![
                e(C2, K::Centred(first::c2), 1),
                e(W2, K::Centred(first::cweno2), 1),
                e(W3, K::Centred(first::cweno3), 2),
                e(C4, K::Centred(first::c4), 2),
                e(S2, K::Centred(first::s2), 2),
                e(Fft, K::Spectral, 0),
            ],
        ));
        r.insert(SchemeTable::new(
            Second,
            Centred,
            vec![
                e(C2, K::Centred(second::c2), 1),
                e(C4, K::Centred(second::c4), 2),
                e(Fft, K::Spectral, 0),
            ],
        ));
        r.insert(SchemeTable::new(
            Upwind,
            Centred,
            vec![
                e(U1, K::Upwind(upwind::u1), 1),
                e(C2, K::Upwind(upwind::c2), 1),
                e(U4, K::Upwind(upwind::u4), 2),
                e(W3, K::Upwind(upwind::weno3), 2),
                e(C4, K::Upwind(upwind::c4), 2),
                e(Ppm, K::Ppm, ppm::PPM_PAD),
            ],
        ));
        r.insert(SchemeTable::new(
            Flux,
            Centred,
            vec![
                e(Split, K::Split, 0),
                e(U1, K::Upwind(flux::u1), 1),
                e(C2, K::Upwind(flux::c2), 1),
                e(C4, K::Upwind(flux::c4), 2),
                e(Nnd, K::Upwind(flux::nnd), 2),
            ],
        ));
        r.insert(SchemeTable::new(
            First,
            Staggered,
            vec![
                e(C2, K::Staggered(first::c2_stag), 1),
                e(C4, K::Staggered(first::c4_stag), 2),
                e(Fft, K::Spectral, 0),
            ],
        ));
        r.insert(SchemeTable::new(
            Second,
            Staggered,
            vec![
                e(C4, K::Staggered(second::c4_stag), 2),
                e(Fft, K::Spectral, 0),
            ],
        ));
        r.insert(SchemeTable::new(
            Upwind,
            Staggered,
            vec![e(U1, K::UpwindStaggered(upwind::u1_stag), 1)],
        ));
        r.insert(SchemeTable::new(
            Flux,
            Staggered,
            vec![
                e(Split, K::Split, 0),
                e(U1, K::UpwindStaggered(flux::u1_stag), 1),
            ],
        ));
        r
    }

    /// Add or replace a table. Returns the replaced table, if any.
    pub fn insert(&mut self, table: SchemeTable) -> Option<SchemeTable> {
        self.tables
            .insert((table.class(), table.alignment()), table)
    }

    /// Table for `class` and `alignment`.
    pub fn table(
        &self,
        class: OperatorClass,
        alignment: Alignment,
    ) -> Result<&SchemeTable, DerivError> {
        self.tables
            .get(&(class, alignment))
            .ok_or(DerivError::NoKernel { class, alignment })
    }

    /// All tables in insertion order.
    pub fn tables(&self) -> impl Iterator<Item = &SchemeTable> {
        self.tables.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DiffMethod::*;

    fn table(class: OperatorClass, alignment: Alignment) -> SchemeTable {
        Registry::standard().table(class, alignment).unwrap().clone()
    }

    #[test]
    fn standard_tables_have_documented_defaults() {
        let r = Registry::standard();
        let defaults: Vec<_> = r
            .tables()
            .map(|t| t.default_entry().unwrap().method)
            .collect();
        assert_eq!(defaults, vec![C2, C2, U1, Split, C2, C4, U1, Split]);
    }

    #[test]
    fn exact_label_match_is_case_insensitive() {
        let t = table(OperatorClass::First, Alignment::Centred);
        assert_eq!(t.resolve("c4").unwrap(), C4);
        assert_eq!(t.resolve("S2").unwrap(), S2);
        assert_eq!(t.resolve("fft").unwrap(), Fft);
    }

    #[test]
    fn empty_label_selects_default() {
        let t = table(OperatorClass::Upwind, Alignment::Centred);
        assert_eq!(t.resolve("").unwrap(), U1);
    }

    #[test]
    fn class_match_takes_last_in_name_order() {
        // Name order is U1, C2, W2, W3, C4, ... so "C6" lands on C4.
        let t = table(OperatorClass::First, Alignment::Centred);
        assert_eq!(t.resolve("C6").unwrap(), C4);
        // C2 is not in the staggered second table; C4 is its only C-method.
        let t = table(OperatorClass::Second, Alignment::Staggered);
        assert_eq!(t.resolve("c2").unwrap(), C4);
    }

    #[test]
    fn unimplemented_exact_name_falls_to_class_or_default() {
        // U4 is not in the staggered upwind table, but U1 shares its letter.
        let t = table(OperatorClass::Upwind, Alignment::Staggered);
        assert_eq!(t.resolve("U4").unwrap(), U1);
        // No W-method in the flux table: default.
        let t = table(OperatorClass::Flux, Alignment::Centred);
        assert_eq!(t.resolve("W3").unwrap(), Split);
    }

    #[test]
    fn lookup_falls_back_to_first_entry() {
        let t = table(OperatorClass::Second, Alignment::Centred);
        assert_eq!(t.lookup(C4).unwrap().method, C4);
        assert_eq!(t.lookup(U4).unwrap().method, C2);
    }

    #[test]
    fn empty_table_reports_no_kernel() {
        let t = SchemeTable::new(OperatorClass::Flux, Alignment::Staggered, vec![]);
        let err = t.resolve("U1").unwrap_err();
        assert_eq!(
            err,
            DerivError::NoKernel {
                class: OperatorClass::Flux,
                alignment: Alignment::Staggered
            }
        );
        assert!(t.lookup(U1).is_err());
    }

    #[test]
    fn missing_table_reports_no_kernel() {
        let r = Registry::empty();
        assert!(r.table(OperatorClass::First, Alignment::Centred).is_err());
    }

    #[test]
    fn custom_table_replaces_standard() {
        let mut r = Registry::standard();
        let old = r.insert(SchemeTable::new(
            OperatorClass::Second,
            Alignment::Centred,
            vec![SchemeEntry::new(C4, Kernel::Centred(second::c4), 2)],
        ));
        assert!(old.is_some());
        let t = r.table(OperatorClass::Second, Alignment::Centred).unwrap();
        assert_eq!(t.resolve("C2").unwrap(), C4);
        assert_eq!(t.entries().len(), 1);
    }

    #[test]
    fn reach_matches_stencil_width() {
        let r = Registry::standard();
        for t in r.tables() {
            for e in t.entries().iter().filter(|e| e.method != Ppm) {
                assert!(e.reach <= 2, "{:?} reach {}", e.method, e.reach);
            }
        }
        let t = r.table(OperatorClass::First, Alignment::Centred).unwrap();
        assert_eq!(t.lookup(C2).unwrap().reach, 1);
        assert_eq!(t.lookup(W3).unwrap().reach, 2);
        // Each PPM point reads its whole padded window.
        let t = r.table(OperatorClass::Upwind, Alignment::Centred).unwrap();
        assert_eq!(t.lookup(Ppm).unwrap().reach, 4);
    }
}
