//! Re-emits the template with the placeholder expanded.
//!
//! Every template line is copied through unchanged except:
//!
//! - the placeholder (and its body, if any) is replaced by one `prefix` block
//!   per live, non-static prefix, in probe order
//! - a static prefix with `DecrementLifetimes on` that leaves a lifetime unset
//!   gets the resolved value injected before its closing brace
//!
//! Rendering cannot fail; writing the result out is done by
//! [`write_atomically`].

mod output;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use output::{OutputError, write_atomically};

use crate::parser::{Line, canonical_network, classify, indent_of, track_depth};
use crate::resolver::resolve;
use crate::session::{Field, Mode, PrefixFacts, Session};

/// Extra indentation for directives inside a prefix block.
const BODY_INDENT: &str = "    ";

#[derive(Debug)]
enum State {
    Text,
    Interface(String),
    Prefix { iface: String, prefix: String },
    PlaceholderBody { iface: String, indent: String },
    Nested { iface: String, depth: usize },
}

/// Renders a template against a populated [`Session`].
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    session: &'a Session,
}

impl<'a> Generator<'a> {
    /// Creates a generator reading facts from `session`.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Renders `template` into the full output document.
    ///
    /// Lines are joined with `\n` and the result ends with a newline.
    #[must_use]
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len() * 2);
        let mut state = State::Text;
        for raw in template.lines() {
            state = self.step(state, raw, &mut out);
        }
        out
    }

    fn step(&self, state: State, raw: &str, out: &mut String) -> State {
        match state {
            State::Text => {
                push_line(out, raw);
                match classify(raw) {
                    Line::Interface(Some(name)) => State::Interface(name.to_string()),
                    _ => State::Text,
                }
            }
            State::Interface(iface) => self.on_interface(iface, raw, out),
            State::Prefix { iface, prefix } => {
                if matches!(classify(raw), Line::Close) {
                    self.inject_missing(&iface, &prefix, indent_of(raw), out);
                    push_line(out, raw);
                    return State::Interface(iface);
                }
                push_line(out, raw);
                State::Prefix { iface, prefix }
            }
            State::PlaceholderBody { iface, indent } => {
                if matches!(classify(raw), Line::Close) {
                    self.emit_dynamic(&iface, &indent, out);
                    return State::Interface(iface);
                }
                State::PlaceholderBody { iface, indent }
            }
            State::Nested { iface, depth } => {
                push_line(out, raw);
                match track_depth(depth, raw) {
                    0 => State::Interface(iface),
                    depth => State::Nested { iface, depth },
                }
            }
        }
    }

    fn on_interface(&self, iface: String, raw: &str, out: &mut String) -> State {
        match classify(raw) {
            Line::Placeholder { has_body: false } => {
                self.emit_dynamic(&iface, indent_of(raw), out);
                State::Interface(iface)
            }
            Line::Placeholder { has_body: true } => State::PlaceholderBody {
                iface,
                indent: indent_of(raw).to_string(),
            },
            line => {
                push_line(out, raw);
                match line {
                    Line::Close => State::Text,
                    Line::Prefix(Some(prefix)) => State::Prefix {
                        iface,
                        prefix: canonical_network(prefix).unwrap_or_else(|_| prefix.to_string()),
                    },
                    Line::BlockOpen => State::Nested { iface, depth: 1 },
                    _ => State::Interface(iface),
                }
            }
        }
    }

    /// Writes one `prefix` block per live prefix not declared statically.
    fn emit_dynamic(&self, iface: &str, indent: &str, out: &mut String) {
        let session = self.session;
        let placeholder = session
            .dynamic_facts(iface)
            .unwrap_or_else(PrefixFacts::placeholder);

        let mut emitted = 0_usize;
        for prefix in session.live_prefixes(iface) {
            if session.is_static(iface, prefix) {
                continue;
            }

            push_line(out, &format!("{indent}prefix {prefix} {{"));
            if placeholder.decrement && !placeholder.has_decrement {
                push_line(out, &format!("{indent}{BODY_INDENT}DecrementLifetimes on;"));
            }
            for field in Field::ALL {
                if placeholder.lifetime(field).is_some() {
                    continue;
                }
                if let Some(value) = resolve(session, iface, prefix, field) {
                    push_line(
                        out,
                        &format!("{indent}{BODY_INDENT}{} {value};", field.directive()),
                    );
                }
            }
            for line in session.saved_lines(iface) {
                push_line(out, line);
            }
            push_line(out, &format!("{indent}}};"));
            emitted += 1;
        }

        tracing::debug!("{iface}: synthesized {emitted} prefix block(s)");
    }

    /// Adds resolved lifetimes a decrementing static prefix leaves unset.
    fn inject_missing(&self, iface: &str, prefix: &str, indent: &str, out: &mut String) {
        let Some(facts) = self.session.facts(iface, prefix, Mode::Source) else {
            return;
        };
        if !facts.decrement {
            return;
        }

        for field in Field::ALL {
            if facts.lifetime(field).is_some() {
                continue;
            }
            if let Some(value) = resolve(self.session, iface, prefix, field) {
                tracing::trace!("{iface}: {prefix} {} {value} injected", field.directive());
                push_line(
                    out,
                    &format!("{indent}{BODY_INDENT}{} {value};", field.directive()),
                );
            }
        }
    }
}

/// Renders `template` against `session`.
#[must_use]
pub fn generate(session: &Session, template: &str) -> String {
    Generator::new(session).render(template)
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
