//! Line-oriented parser for radvd configuration documents.
//!
//! Reads either the authoring template ([`Mode::Source`]) or the previously
//! generated file ([`Mode::Current`]) into a [`Session`].
//!
//! # States
//!
//! ```text
//! Text ──interface──▶ Interface ──prefix {──▶ Prefix ──}──▶ Interface ──}──▶ Text
//!                         │
//!                         ├──@PREFIX@ {──▶ Dynamic ──}──▶ Interface   (template only)
//!                         └──other {─────▶ Nested  ──}──▶ Interface
//! ```
//!
//! Only `interface` and `prefix` headers can fail; everything else that is
//! unexpected is logged and skipped.

mod error;
mod line;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use error::ParseError;
pub use line::{Directive, Line, PLACEHOLDER, classify, indent_of};
pub(crate) use line::track_depth;

use std::net::Ipv6Addr;

use crate::session::{DYNAMIC, Field, Lifetime, Mode, PrefixFacts, Session};

/// Parser state between lines.
#[derive(Debug)]
enum State {
    Text,
    Interface(String),
    Prefix {
        iface: String,
        prefix: String,
        facts: PrefixFacts,
    },
    Dynamic {
        iface: String,
        facts: PrefixFacts,
    },
    Nested {
        iface: String,
        depth: usize,
    },
}

/// Parses `content` into `session` under `mode`.
///
/// `document` names the input in errors and log messages.
///
/// # Errors
///
/// Returns [`ParseError`] when an `interface` or `prefix` header cannot be
/// parsed. The session may hold partial facts in that case.
pub fn parse_document(
    session: &mut Session,
    content: &str,
    mode: Mode,
    document: &str,
) -> Result<(), ParseError> {
    ConfigParser::new(session, mode, document).parse(content)
}

/// State machine reading one document.
pub struct ConfigParser<'s> {
    session: &'s mut Session,
    mode: Mode,
    document: String,
    line: usize,
}

impl<'s> ConfigParser<'s> {
    /// Creates a parser recording into `session` under `mode`.
    pub fn new(session: &'s mut Session, mode: Mode, document: impl Into<String>) -> Self {
        Self {
            session,
            mode,
            document: document.into(),
            line: 0,
        }
    }

    /// Feeds every line of `content` through the state machine.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for an unparsable `interface` or `prefix` header.
    pub fn parse(mut self, content: &str) -> Result<(), ParseError> {
        let mut state = State::Text;
        for (index, raw) in content.lines().enumerate() {
            self.line = index + 1;
            state = self.step(state, raw)?;
        }

        if !matches!(state, State::Text) {
            tracing::warn!(
                "{}: document ended inside an unterminated block",
                self.document
            );
        }

        let count = self
            .session
            .interfaces()
            .filter(|name| self.session.has_interface(name, self.mode))
            .count();
        tracing::debug!(
            "Parsed {} document {}: {count} interface(s)",
            self.mode,
            self.document
        );
        Ok(())
    }

    fn step(&mut self, state: State, raw: &str) -> Result<State, ParseError> {
        match state {
            State::Text => self.on_text(raw),
            State::Interface(iface) => self.on_interface(iface, raw),
            State::Prefix {
                iface,
                prefix,
                facts,
            } => Ok(self.on_prefix(iface, prefix, facts, raw)),
            State::Dynamic { iface, facts } => Ok(self.on_dynamic(iface, facts, raw)),
            State::Nested { iface, depth } => Ok(Self::on_nested(iface, depth, raw)),
        }
    }

    fn on_text(&mut self, raw: &str) -> Result<State, ParseError> {
        match classify(raw) {
            Line::Interface(Some(name)) => {
                self.session.add_interface(name, self.mode);
                Ok(State::Interface(name.to_string()))
            }
            Line::Interface(None) => Err(ParseError::MissingInterfaceName {
                document: self.document.clone(),
                line: self.line,
                text: raw.trim().to_string(),
            }),
            Line::Placeholder { .. } => {
                tracing::warn!(
                    "{}:{}: placeholder outside of an interface block, skipped",
                    self.document,
                    self.line
                );
                Ok(State::Text)
            }
            _ => Ok(State::Text),
        }
    }

    fn on_interface(&mut self, iface: String, raw: &str) -> Result<State, ParseError> {
        match classify(raw) {
            Line::Close => Ok(State::Text),
            Line::Prefix(Some(address)) => {
                let prefix = self.canonical_prefix(address)?;
                Ok(State::Prefix {
                    iface,
                    prefix,
                    facts: PrefixFacts::default(),
                })
            }
            Line::Prefix(None) => Err(ParseError::MissingPrefixAddress {
                document: self.document.clone(),
                line: self.line,
                text: raw.trim().to_string(),
            }),
            Line::Placeholder { has_body } => Ok(self.on_placeholder(iface, has_body)),
            Line::BlockOpen => Ok(State::Nested { iface, depth: 1 }),
            _ => Ok(State::Interface(iface)),
        }
    }

    fn on_placeholder(&mut self, iface: String, has_body: bool) -> State {
        if self.mode != Mode::Source {
            tracing::warn!(
                "{}:{}: placeholder {PLACEHOLDER} found outside the template, left unprocessed",
                self.document,
                self.line
            );
            return if has_body {
                State::Nested { iface, depth: 1 }
            } else {
                State::Interface(iface)
            };
        }

        self.session.mark_dynamic_section(&iface);
        if has_body {
            return State::Dynamic {
                iface,
                facts: PrefixFacts::placeholder(),
            };
        }

        self.session
            .record_prefix(&iface, DYNAMIC, Mode::Source, &PrefixFacts::placeholder());
        State::Interface(iface)
    }

    fn on_prefix(
        &mut self,
        iface: String,
        prefix: String,
        mut facts: PrefixFacts,
        raw: &str,
    ) -> State {
        match classify(raw) {
            Line::Directive(directive) => {
                self.apply(&mut facts, directive);
                State::Prefix {
                    iface,
                    prefix,
                    facts,
                }
            }
            Line::Close => {
                self.session.record_prefix(&iface, &prefix, self.mode, &facts);
                if self.mode == Mode::Source && facts.decrement {
                    self.session.mark_decrementing(&iface, &prefix);
                }
                State::Interface(iface)
            }
            _ => State::Prefix {
                iface,
                prefix,
                facts,
            },
        }
    }

    fn on_dynamic(&mut self, iface: String, mut facts: PrefixFacts, raw: &str) -> State {
        match classify(raw) {
            Line::Close => {
                self.session
                    .record_prefix(&iface, DYNAMIC, Mode::Source, &facts);
                State::Interface(iface)
            }
            line => {
                if let Line::Directive(directive) = line {
                    self.apply(&mut facts, directive);
                }
                self.session.push_saved_line(&iface, raw);
                State::Dynamic { iface, facts }
            }
        }
    }

    fn on_nested(iface: String, depth: usize, raw: &str) -> State {
        match track_depth(depth, raw) {
            0 => State::Interface(iface),
            depth => State::Nested { iface, depth },
        }
    }

    fn apply(&self, facts: &mut PrefixFacts, directive: Directive<'_>) {
        let (field, value) = match directive {
            Directive::Decrement(on) => {
                facts.set_decrement(on);
                return;
            }
            Directive::Valid(value) => (Field::Valid, value),
            Directive::Preferred(value) => (Field::Preferred, value),
        };

        match value.parse::<Lifetime>() {
            Ok(lifetime) => facts.set_lifetime(field, lifetime),
            Err(e) => tracing::warn!(
                "{}:{}: {e}; {} ignored",
                self.document,
                self.line,
                field.directive()
            ),
        }
    }

    fn canonical_prefix(&self, address: &str) -> Result<String, ParseError> {
        canonical_network(address).map_err(|reason| ParseError::InvalidPrefix {
            document: self.document.clone(),
            line: self.line,
            prefix: address.to_string(),
            reason,
        })
    }
}

/// Parses `<ipv6>/<length>` and returns it in canonical form, so that
/// `FD00:0001::/64` and the probed `fd00:1::/64` name the same prefix.
///
/// # Errors
///
/// Returns a reason if the address or the length is malformed.
pub fn canonical_network(address: &str) -> Result<String, String> {
    let (addr, len) = address
        .split_once('/')
        .ok_or_else(|| "missing prefix length".to_string())?;

    let addr = addr
        .parse::<Ipv6Addr>()
        .map_err(|e| format!("bad address: {e}"))?;

    match len.parse::<u8>() {
        Ok(len) if len <= 128 => Ok(format!("{addr}/{len}")),
        _ => Err(format!("bad prefix length '{len}'")),
    }
}
