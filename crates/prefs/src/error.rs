use std::fmt;

/// Error type for preference persistence.
///
/// Malformed *data* (a non-numeric rectangle component, a bad list
/// count) never surfaces here; typed getters absorb it and return
/// `None`. Only the top-level parse or file-system failure of
/// `load`/`save` is reported.
#[derive(Debug)]
pub enum PrefError {
    /// The preference document is not well-formed, or has no
    /// recognizable root element.
    Parse(String),
    /// File or directory could not be read or written.
    Io(String),
}

impl fmt::Display for PrefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "preference parse error: {msg}"),
            Self::Io(msg) => write!(f, "preference I/O error: {msg}"),
        }
    }
}

impl std::error::Error for PrefError {}

impl From<std::io::Error> for PrefError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
