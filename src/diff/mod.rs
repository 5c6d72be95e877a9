//! Change detection between what would be published and what is published.
//!
//! The [`differs`] test decides whether two lifetimes are far enough apart to
//! matter; [`Differ`] applies it to every prefix the generator would write and
//! summarizes the result as a [`Report`].

mod change;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use change::{Cause, InterfaceChange, Report, Verdict};

use crate::resolver::{emitted_decrement, emitted_lifetime};
use crate::session::{Field, Lifetime, Mode, Session};

/// Default significance threshold in percent.
pub const DEFAULT_THRESHOLD: u32 = 10;

/// Returns true if `a` and `b` differ significantly.
///
/// `infinity` only matches `infinity`. Finite values differ when
/// `200·|a−b| / (a+b)` exceeds `threshold`; a value exactly at the threshold
/// counts as unchanged. The comparison is done in integers, so it is exact
/// and symmetric.
#[must_use]
pub fn differs(a: Lifetime, b: Lifetime, threshold: u32) -> bool {
    match (a, b) {
        (Lifetime::Infinity, Lifetime::Infinity) => false,
        (Lifetime::Infinity, Lifetime::Seconds(_)) | (Lifetime::Seconds(_), Lifetime::Infinity) => {
            true
        }
        (Lifetime::Seconds(a), Lifetime::Seconds(b)) => {
            let delta = u128::from(a.abs_diff(b));
            let sum = u128::from(a) + u128::from(b);
            200 * delta > u128::from(threshold) * sum
        }
    }
}

/// Like [`differs`], where an unset value only matches another unset value.
fn optional_differs(expected: Option<Lifetime>, current: Option<Lifetime>, threshold: u32) -> bool {
    match (expected, current) {
        (Some(a), Some(b)) => differs(a, b, threshold),
        (None, None) => false,
        _ => true,
    }
}

/// Compares the session's expected output against the current file.
#[derive(Debug, Clone, Copy)]
pub struct Differ<'a> {
    session: &'a Session,
    threshold: u32,
}

impl<'a> Differ<'a> {
    /// Creates a differ with the given significance threshold in percent.
    #[must_use]
    pub const fn new(session: &'a Session, threshold: u32) -> Self {
        Self { session, threshold }
    }

    /// Checks every interface and returns the changed ones.
    #[must_use]
    pub fn check(&self) -> Report {
        let changes = self
            .session
            .interfaces()
            .filter_map(|iface| {
                let causes = self.check_interface(iface);
                if causes.is_empty() {
                    return None;
                }
                for cause in &causes {
                    tracing::info!("{iface}: {cause}");
                }
                Some(InterfaceChange {
                    interface: iface.to_string(),
                    causes,
                    decrementing: self.session.is_decrementing(iface),
                })
            })
            .collect();

        Report { changes }
    }

    /// Returns the causes found for `iface`, empty if it is unchanged.
    #[must_use]
    pub fn check_interface(&self, iface: &str) -> Vec<Cause> {
        if !self.session.has_interface(iface, Mode::Source) {
            return vec![Cause::InterfaceRemoved];
        }
        if !self.session.has_interface(iface, Mode::Current) {
            return vec![Cause::InterfaceMissing];
        }

        let expected = self.expected_prefixes(iface);
        let mut causes = Vec::new();
        for prefix in &expected {
            self.check_prefix(iface, prefix, &mut causes);
        }

        causes.extend(
            self.session
                .prefixes(iface)
                .filter(|p| self.session.is_present(iface, p, Mode::Current))
                .filter(|p| !expected.contains(p))
                .map(|p| Cause::Stale(p.to_string())),
        );
        causes
    }

    /// Prefixes the generator writes for `iface`: static ones, then live ones.
    fn expected_prefixes(&self, iface: &str) -> Vec<&'a str> {
        let session = self.session;
        let mut expected: Vec<&'a str> = session
            .prefixes(iface)
            .filter(|p| session.is_static(iface, p))
            .collect();

        if session.has_dynamic_section(iface) {
            for prefix in session.live_prefixes(iface) {
                if !expected.contains(&prefix) {
                    expected.push(prefix);
                }
            }
        }
        expected
    }

    fn check_prefix(&self, iface: &str, prefix: &str, causes: &mut Vec<Cause>) {
        let Some(current) = self.session.facts(iface, prefix, Mode::Current) else {
            causes.push(Cause::PrefixMissing(prefix.to_string()));
            return;
        };

        let countdown = self
            .session
            .facts(iface, prefix, Mode::Source)
            .is_some_and(|facts| facts.decrement);

        for field in Field::ALL {
            let expected = emitted_lifetime(self.session, iface, prefix, field);
            let published = current.lifetime(field);
            if optional_differs(expected, published, self.threshold) {
                causes.push(Cause::LifetimeDrift {
                    prefix: prefix.to_string(),
                    field,
                    expected,
                    current: published,
                    countdown: countdown && expected.is_some() && published.is_some(),
                });
            }
        }

        let expected = emitted_decrement(self.session, iface, prefix);
        if expected != current.decrement {
            causes.push(Cause::DecrementChanged {
                prefix: prefix.to_string(),
                expected,
            });
        }
    }
}
