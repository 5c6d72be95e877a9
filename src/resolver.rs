//! Effective lifetime resolution.
//!
//! Precedence, highest first:
//!
//! 1. explicit declaration on the concrete prefix in the template
//! 2. explicit declaration on the placeholder (applies to every synthesized prefix)
//! 3. value observed on the live interface
//!
//! [`emitted_lifetime`] and [`emitted_decrement`] describe what the generator
//! writes for a prefix, which is what the differ compares against the
//! previously generated file.

use crate::session::{DYNAMIC, Field, Lifetime, Mode, Session};

/// Resolves the effective `field` lifetime of `prefix` on `iface`.
///
/// Returns `None` when nothing specifies it, meaning the daemon default applies.
#[must_use]
pub fn resolve(session: &Session, iface: &str, prefix: &str, field: Field) -> Option<Lifetime> {
    declared(session, iface, prefix, field)
        .or_else(|| declared(session, iface, DYNAMIC, field))
        .or_else(|| {
            session
                .facts(iface, prefix, Mode::Wired)
                .and_then(|facts| facts.lifetime(field))
        })
}

/// Returns the `field` lifetime the generator writes for `prefix`.
///
/// - Static prefix with an explicit value: that value, copied through.
/// - Static prefix with decrementing lifetimes and no value: the resolved value.
/// - Static prefix otherwise: nothing.
/// - Synthesized prefix: the resolved value.
#[must_use]
pub fn emitted_lifetime(
    session: &Session,
    iface: &str,
    prefix: &str,
    field: Field,
) -> Option<Lifetime> {
    match session.facts(iface, prefix, Mode::Source) {
        Some(facts) => match facts.lifetime(field) {
            Some(value) => Some(value),
            None if facts.decrement => resolve(session, iface, prefix, field),
            None => None,
        },
        None => resolve(session, iface, prefix, field),
    }
}

/// Returns whether the generator writes `prefix` with decrementing lifetimes.
///
/// Static prefixes keep their own setting; synthesized prefixes follow the
/// placeholder.
#[must_use]
pub fn emitted_decrement(session: &Session, iface: &str, prefix: &str) -> bool {
    session
        .facts(iface, prefix, Mode::Source)
        .or_else(|| session.dynamic_facts(iface))
        .is_some_and(|facts| facts.decrement)
}

fn declared(session: &Session, iface: &str, prefix: &str, field: Field) -> Option<Lifetime> {
    session
        .facts(iface, prefix, Mode::Source)
        .and_then(|facts| facts.lifetime(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PrefixFacts;

    const P: &str = "fd00:2::/64";

    fn session() -> Session {
        let mut session = Session::new();
        session.record_live("lan1", P, Lifetime::Seconds(1800), Lifetime::Seconds(900));
        session
    }

    fn with_valid(valid: Lifetime) -> PrefixFacts {
        PrefixFacts {
            valid: Some(valid),
            ..PrefixFacts::default()
        }
    }

    mod resolve {
        use super::*;

        #[test]
        fn falls_back_to_live_value() {
            let session = session();
            assert_eq!(
                resolve(&session, "lan1", P, Field::Valid),
                Some(Lifetime::Seconds(1800))
            );
            assert_eq!(
                resolve(&session, "lan1", P, Field::Preferred),
                Some(Lifetime::Seconds(900))
            );
        }

        #[test]
        fn placeholder_declaration_beats_live_value() {
            let mut session = session();
            session.record_prefix("lan1", DYNAMIC, Mode::Source, &with_valid(Lifetime::Seconds(7200)));

            assert_eq!(
                resolve(&session, "lan1", P, Field::Valid),
                Some(Lifetime::Seconds(7200))
            );
            assert_eq!(
                resolve(&session, "lan1", P, Field::Preferred),
                Some(Lifetime::Seconds(900))
            );
        }

        #[test]
        fn static_declaration_beats_everything() {
            let mut session = session();
            session.record_prefix("lan1", DYNAMIC, Mode::Source, &with_valid(Lifetime::Seconds(7200)));
            session.record_prefix("lan1", P, Mode::Source, &with_valid(Lifetime::Infinity));

            assert_eq!(
                resolve(&session, "lan1", P, Field::Valid),
                Some(Lifetime::Infinity)
            );
        }

        #[test]
        fn unknown_prefix_resolves_to_nothing() {
            let session = session();
            assert_eq!(resolve(&session, "lan1", "fd00:9::/64", Field::Valid), None);
            assert_eq!(resolve(&session, "lan9", P, Field::Valid), None);
        }

        #[test]
        fn current_values_are_never_consulted() {
            let mut session = Session::new();
            session.record_prefix("lan1", P, Mode::Current, &with_valid(Lifetime::Seconds(5)));

            assert_eq!(resolve(&session, "lan1", P, Field::Valid), None);
        }
    }

    mod emitted {
        use super::*;

        #[test]
        fn static_explicit_value_is_copied() {
            let mut session = session();
            session.record_prefix("lan1", P, Mode::Source, &with_valid(Lifetime::Seconds(60)));

            assert_eq!(
                emitted_lifetime(&session, "lan1", P, Field::Valid),
                Some(Lifetime::Seconds(60))
            );
            assert_eq!(emitted_lifetime(&session, "lan1", P, Field::Preferred), None);
        }

        #[test]
        fn static_decrementing_prefix_gets_resolved_value() {
            let mut session = session();
            let mut facts = PrefixFacts::default();
            facts.set_decrement(true);
            session.record_prefix("lan1", P, Mode::Source, &facts);

            assert_eq!(
                emitted_lifetime(&session, "lan1", P, Field::Preferred),
                Some(Lifetime::Seconds(900))
            );
            assert!(emitted_decrement(&session, "lan1", P));
        }

        #[test]
        fn synthesized_prefix_follows_placeholder() {
            let mut session = session();
            session.record_prefix("lan1", DYNAMIC, Mode::Source, &PrefixFacts::placeholder());

            assert_eq!(
                emitted_lifetime(&session, "lan1", P, Field::Valid),
                Some(Lifetime::Seconds(1800))
            );
            assert!(emitted_decrement(&session, "lan1", P));
        }

        #[test]
        fn no_placeholder_means_no_decrement() {
            let session = session();
            assert!(!emitted_decrement(&session, "lan1", P));
        }
    }
}
