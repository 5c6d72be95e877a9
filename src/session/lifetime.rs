//! Advertised lifetime values.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Raw kernel value meaning "infinite lifetime".
pub const KERNEL_INFINITY: u64 = 0xFFFF_FFFF;

/// A prefix lifetime: whole seconds or the `infinity` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// A finite lifetime in seconds.
    Seconds(u64),
    /// Never expires.
    Infinity,
}

impl Lifetime {
    /// Converts a lifetime reported by the kernel, where `0xFFFFFFFF` is infinite.
    #[must_use]
    pub const fn from_kernel(secs: u64) -> Self {
        if secs >= KERNEL_INFINITY {
            Self::Infinity
        } else {
            Self::Seconds(secs)
        }
    }

    /// Returns true for the `infinity` sentinel.
    #[must_use]
    pub const fn is_infinite(self) -> bool {
        matches!(self, Self::Infinity)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds(secs) => write!(f, "{secs}"),
            Self::Infinity => write!(f, "infinity"),
        }
    }
}

/// Error returned when a lifetime token cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid lifetime '{0}': expected seconds, '<n>sec', 'infinity' or 'forever'")]
pub struct InvalidLifetime(pub String);

impl FromStr for Lifetime {
    type Err = InvalidLifetime;

    /// Normalizes `forever` to `infinity` and strips a `sec` suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().trim_end_matches(';').to_ascii_lowercase();
        match token.as_str() {
            "infinity" | "forever" => return Ok(Self::Infinity),
            _ => {}
        }

        let digits = token.strip_suffix("sec").unwrap_or(&token);
        digits
            .parse::<u64>()
            .map(Self::Seconds)
            .map_err(|_| InvalidLifetime(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_seconds() {
        assert_eq!("1800".parse::<Lifetime>(), Ok(Lifetime::Seconds(1800)));
    }

    #[test]
    fn normalizes_sec_suffix() {
        assert_eq!("600sec".parse::<Lifetime>(), Ok(Lifetime::Seconds(600)));
    }

    #[test]
    fn normalizes_forever_to_infinity() {
        assert_eq!("forever".parse::<Lifetime>(), Ok(Lifetime::Infinity));
        assert_eq!("Infinity".parse::<Lifetime>(), Ok(Lifetime::Infinity));
    }

    #[test]
    fn tolerates_trailing_semicolon() {
        assert_eq!("900;".parse::<Lifetime>(), Ok(Lifetime::Seconds(900)));
    }

    #[test]
    fn rejects_garbage() {
        let err = "soon".parse::<Lifetime>().unwrap_err();
        assert!(err.to_string().contains("soon"));
        assert!("-5".parse::<Lifetime>().is_err());
    }

    #[test]
    fn displays_in_config_syntax() {
        assert_eq!(Lifetime::Seconds(42).to_string(), "42");
        assert_eq!(Lifetime::Infinity.to_string(), "infinity");
    }

    #[test]
    fn kernel_all_ones_is_infinite() {
        assert!(Lifetime::from_kernel(4_294_967_295).is_infinite());
        assert_eq!(Lifetime::from_kernel(3600), Lifetime::Seconds(3600));
    }
}
