use std::fmt;
use std::str::FromStr;

/// Snapshot version counter.
///
/// The value doubles as the file stem of the archive it names, so `Display`
/// must stay plain decimal with no padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(u64);

impl Version {
    pub const ZERO: Version = Version(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The version the next run will consume.
    ///
    /// Saturates at `u64::MAX`; only a hand-edited counter file can get there.
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<u64> for Version {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counter text that is not a non-negative base-10 integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version counter {input:?}")]
pub struct ParseVersionError {
    input: String,
}

impl ParseVersionError {
    /// The rejected text, before trimming.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl FromStr for Version {
    type Err = ParseVersionError;

    /// Parse counter text. Surrounding whitespace (the trailing newline the
    /// counter file is written with) and a single leading `+` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError {
            input: s.to_string(),
        };
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        digits.parse::<u64>().map(Self).map_err(|_| err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_plain_decimal() {
        assert_eq!(Version::ZERO.to_string(), "0");
        assert_eq!(Version::new(7).to_string(), "7");
        assert_eq!(Version::new(1200).to_string(), "1200");
    }

    #[test]
    fn next_increments_by_one() {
        assert_eq!(Version::ZERO.next(), Version::new(1));
        assert_eq!(Version::new(5).next().get(), 6);
    }

    #[test]
    fn next_saturates_at_max() {
        assert_eq!(Version::new(u64::MAX).next().get(), u64::MAX);
    }

    #[test]
    fn parse_accepts_counter_file_format() {
        assert_eq!("5\n".parse::<Version>().unwrap(), Version::new(5));
        assert_eq!("  42  ".parse::<Version>().unwrap(), Version::new(42));
        assert_eq!("+3".parse::<Version>().unwrap(), Version::new(3));
        assert_eq!("007".parse::<Version>().unwrap(), Version::new(7));
    }

    #[test]
    fn parse_rejects_garbage() {
        for input in ["", "\n", "abc", "-1", "1.5", "++1", "1 2", "0x10", "1_0"] {
            let err = input.parse::<Version>().unwrap_err();
            assert_eq!(err.input(), input);
        }
    }

    #[test]
    fn parse_rejects_overflow() {
        assert!("18446744073709551616".parse::<Version>().is_err());
        assert_eq!(
            "18446744073709551615".parse::<Version>().unwrap().get(),
            u64::MAX
        );
    }
}
