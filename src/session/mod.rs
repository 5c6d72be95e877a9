//! Per-run fact model.
//!
//! A [`Session`] owns the [`Store`] for one invocation and is passed by
//! reference to every component. It exposes typed views over three fact
//! tables keyed the same way, one per [`Mode`]:
//!
//! - [`Mode::Source`]: what the template declares
//! - [`Mode::Current`]: what the previously generated file contains
//! - [`Mode::Wired`]: what the live interface reports
//!
//! The reserved prefix key [`DYNAMIC`] holds facts about the placeholder
//! itself rather than a concrete address.

mod lifetime;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use lifetime::{InvalidLifetime, KERNEL_INFINITY, Lifetime};

use std::fmt;

use crate::store::Store;

/// Prefix key reserved for the dynamic-prefix placeholder.
pub const DYNAMIC: &str = "dynamic";

const IFACES: &str = "ifaces";
const PREFIX: &str = "prefix";
const WIRED: &str = "wired";
const SAVED: &str = "saved";
const DYNAMIC_SECTION: &str = "dynamic_section";
const DECREMENTING: &str = "decrementing";

const PRESENT: &str = "present";
const DECR: &str = "decr";
const HAS_DECR: &str = "has_decr";

const ON: &str = "on";
const OFF: &str = "off";

/// Which fact table a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Declared in the authoring template.
    Source,
    /// Found in the previously generated configuration.
    Current,
    /// Observed on the live interface.
    Wired,
}

impl Mode {
    /// Store key component for this mode.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Source => "src",
            Self::Current => "cur",
            Self::Wired => "wired",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Current => write!(f, "current"),
            Self::Wired => write!(f, "wired"),
        }
    }
}

/// A lifetime field of a prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `AdvValidLifetime`
    Valid,
    /// `AdvPreferredLifetime`
    Preferred,
}

impl Field {
    /// Both fields, in emission order.
    pub const ALL: [Self; 2] = [Self::Valid, Self::Preferred];

    /// Store key component for this field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Preferred => "pref",
        }
    }

    /// The radvd directive carrying this field.
    #[must_use]
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Valid => "AdvValidLifetime",
            Self::Preferred => "AdvPreferredLifetime",
        }
    }
}

/// Facts recorded for one prefix in one mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixFacts {
    /// Valid lifetime, if specified.
    pub valid: Option<Lifetime>,
    /// Preferred lifetime, if specified.
    pub preferred: Option<Lifetime>,
    /// Whether decrementing lifetimes is requested.
    pub decrement: bool,
    /// Whether `DecrementLifetimes` was written explicitly.
    pub has_decrement: bool,
}

impl PrefixFacts {
    /// Returns the lifetime for `field`.
    #[must_use]
    pub const fn lifetime(&self, field: Field) -> Option<Lifetime> {
        match field {
            Field::Valid => self.valid,
            Field::Preferred => self.preferred,
        }
    }

    /// Sets the lifetime for `field`.
    pub const fn set_lifetime(&mut self, field: Field, value: Lifetime) {
        match field {
            Field::Valid => self.valid = Some(value),
            Field::Preferred => self.preferred = Some(value),
        }
    }

    /// Records an explicit `DecrementLifetimes` directive.
    pub const fn set_decrement(&mut self, on: bool) {
        self.decrement = on;
        self.has_decrement = true;
    }

    /// Facts for a placeholder: decrementing by default, nothing explicit.
    #[must_use]
    pub const fn placeholder() -> Self {
        Self {
            valid: None,
            preferred: None,
            decrement: true,
            has_decrement: false,
        }
    }
}

/// Per-run state shared by parser, probe folding, differ and generator.
#[derive(Debug, Default, Clone)]
pub struct Session {
    store: Store,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    // ------------------------------------------------------------------
    // Interfaces
    // ------------------------------------------------------------------

    /// Records that `name` appears in the document for `mode`.
    pub fn add_interface(&mut self, name: &str, mode: Mode) {
        self.store.set(&[IFACES, name, mode.key()], ON);
    }

    /// Interface names in first-mention order.
    pub fn interfaces(&self) -> impl Iterator<Item = &str> {
        self.store.children(&[IFACES])
    }

    /// Returns true if `name` appears in the document for `mode`.
    #[must_use]
    pub fn has_interface(&self, name: &str, mode: Mode) -> bool {
        self.flag(&[IFACES, name, mode.key()])
    }

    /// Marks that the template contains the placeholder for `name`.
    pub fn mark_dynamic_section(&mut self, name: &str) {
        self.store.set(&[IFACES, name, DYNAMIC_SECTION], ON);
    }

    /// Returns true if the template contains the placeholder for `name`.
    #[must_use]
    pub fn has_dynamic_section(&self, name: &str) -> bool {
        self.flag(&[IFACES, name, DYNAMIC_SECTION])
    }

    /// Interfaces whose template contains the placeholder.
    pub fn dynamic_interfaces(&self) -> impl Iterator<Item = &str> {
        self.interfaces()
            .filter(move |name| self.has_dynamic_section(name))
    }

    /// Flags `prefix` on `iface` as decrementing; the interface inherits the flag.
    pub fn mark_decrementing(&mut self, iface: &str, prefix: &str) {
        self.store.set(&[IFACES, iface, PREFIX, prefix, DECREMENTING], ON);
        self.store.set(&[IFACES, iface, DECREMENTING], ON);
    }

    /// Returns true if any prefix owned by `iface` decrements lifetimes.
    #[must_use]
    pub fn is_decrementing(&self, iface: &str) -> bool {
        self.flag(&[IFACES, iface, DECREMENTING])
    }

    /// Returns true if `prefix` on `iface` was flagged decrementing.
    #[must_use]
    pub fn is_prefix_decrementing(&self, iface: &str, prefix: &str) -> bool {
        self.flag(&[IFACES, iface, PREFIX, prefix, DECREMENTING])
    }

    // ------------------------------------------------------------------
    // Prefixes
    // ------------------------------------------------------------------

    /// Records `facts` for `prefix` on `iface` under `mode`.
    ///
    /// Creates the prefix on first mention; later mentions update fields.
    pub fn record_prefix(&mut self, iface: &str, prefix: &str, mode: Mode, facts: &PrefixFacts) {
        let m = mode.key();
        self.store.set(&[IFACES, iface, PREFIX, prefix, m, PRESENT], ON);
        for field in Field::ALL {
            if let Some(value) = facts.lifetime(field) {
                self.store
                    .set(&[IFACES, iface, PREFIX, prefix, m, field.key()], value.to_string());
            }
        }
        self.store
            .set(&[IFACES, iface, PREFIX, prefix, m, DECR], on_off(facts.decrement));
        self.store.set(
            &[IFACES, iface, PREFIX, prefix, m, HAS_DECR],
            on_off(facts.has_decrement),
        );
    }

    /// Returns the facts for `prefix` on `iface` under `mode`, if recorded.
    #[must_use]
    pub fn facts(&self, iface: &str, prefix: &str, mode: Mode) -> Option<PrefixFacts> {
        let m = mode.key();
        if !self.flag(&[IFACES, iface, PREFIX, prefix, m, PRESENT]) {
            return None;
        }

        let lifetime = |field: Field| {
            self.store
                .get(&[IFACES, iface, PREFIX, prefix, m, field.key()])
                .and_then(|v| v.parse().ok())
        };

        Some(PrefixFacts {
            valid: lifetime(Field::Valid),
            preferred: lifetime(Field::Preferred),
            decrement: self.flag(&[IFACES, iface, PREFIX, prefix, m, DECR]),
            has_decrement: self.flag(&[IFACES, iface, PREFIX, prefix, m, HAS_DECR]),
        })
    }

    /// Returns true if `prefix` has a record under `mode`.
    #[must_use]
    pub fn is_present(&self, iface: &str, prefix: &str, mode: Mode) -> bool {
        self.flag(&[IFACES, iface, PREFIX, prefix, mode.key(), PRESENT])
    }

    /// Returns true if `prefix` is a concrete prefix declared in the template.
    #[must_use]
    pub fn is_static(&self, iface: &str, prefix: &str) -> bool {
        prefix != DYNAMIC && self.is_present(iface, prefix, Mode::Source)
    }

    /// Concrete prefixes of `iface` in discovery order, excluding [`DYNAMIC`].
    pub fn prefixes(&self, iface: &str) -> impl Iterator<Item = &str> {
        self.store
            .children(&[IFACES, iface, PREFIX])
            .filter(|p| *p != DYNAMIC)
    }

    /// Placeholder facts for `iface`, if the template declares one.
    #[must_use]
    pub fn dynamic_facts(&self, iface: &str) -> Option<PrefixFacts> {
        self.facts(iface, DYNAMIC, Mode::Source)
    }

    // ------------------------------------------------------------------
    // Live prefixes
    // ------------------------------------------------------------------

    /// Records a live prefix reported for `iface`, preserving probe order.
    pub fn record_live(
        &mut self,
        iface: &str,
        prefix: &str,
        valid: Lifetime,
        preferred: Lifetime,
    ) {
        self.store.set(&[IFACES, iface, WIRED, prefix], ON);
        let facts = PrefixFacts {
            valid: Some(valid),
            preferred: Some(preferred),
            ..PrefixFacts::default()
        };
        self.record_prefix(iface, prefix, Mode::Wired, &facts);
    }

    /// Live prefixes of `iface` in the order the probe reported them.
    pub fn live_prefixes(&self, iface: &str) -> impl Iterator<Item = &str> {
        self.store.children(&[IFACES, iface, WIRED])
    }

    // ------------------------------------------------------------------
    // Saved placeholder lines
    // ------------------------------------------------------------------

    /// Appends a raw line captured from the placeholder body of `iface`.
    pub fn push_saved_line(&mut self, iface: &str, line: &str) {
        let index = self
            .store
            .child_count(&[IFACES, iface, PREFIX, DYNAMIC, SAVED])
            .to_string();
        self.store
            .set(&[IFACES, iface, PREFIX, DYNAMIC, SAVED, &index], line);
    }

    /// Captured placeholder body lines of `iface`, in original order.
    pub fn saved_lines<'a>(&'a self, iface: &'a str) -> impl Iterator<Item = &'a str> {
        let parent = [IFACES, iface, PREFIX, DYNAMIC, SAVED];
        self.store.children(&parent).filter_map(move |index| {
            self.store
                .get(&[IFACES, iface, PREFIX, DYNAMIC, SAVED, index])
        })
    }

    fn flag(&self, path: &[&str]) -> bool {
        self.store.get(path) == Some(ON)
    }
}

const fn on_off(value: bool) -> &'static str {
    if value { ON } else { OFF }
}
