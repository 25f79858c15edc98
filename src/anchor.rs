use std::fmt;
use std::fmt::{Display, Formatter};

/// Reference point a seek offset is measured from.
///
/// Parsed leniently from the host's `whence` symbol: only the first character
/// counts (case-insensitively), and anything that isn't recognized means
/// `Current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeekAnchor {
    Start,
    End,
    #[default]
    Current,
}

impl SeekAnchor {
    pub fn from_symbol(symbol: &str) -> SeekAnchor {
        match symbol.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('s') => SeekAnchor::Start,
            Some('e') => SeekAnchor::End,
            _ => SeekAnchor::Current,
        }
    }
}

impl Display for SeekAnchor {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            SeekAnchor::Start => write!(f, "set"),
            SeekAnchor::End => write!(f, "end"),
            SeekAnchor::Current => write!(f, "cur"),
        }
    }
}
