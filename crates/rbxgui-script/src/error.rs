use std::fmt;

/// Extraction could not run at all.
///
/// Unrecognised or malformed statements are never errors; they are skipped.
/// This type only covers input that cannot be treated as a script in the
/// first place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The source is longer than [`ExtractOptions::max_source_len`](crate::ExtractOptions).
    SourceTooLarge { len: usize, limit: usize },
    /// The source contains a NUL byte at `offset` and is treated as binary.
    Binary { offset: usize },
    /// Elements nest `depth` levels deep, past [`ExtractOptions::max_depth`](crate::ExtractOptions).
    TooDeep { depth: usize, limit: usize },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::SourceTooLarge { len, limit } => {
                write!(f, "script is {} bytes, limit is {}", len, limit)
            }
            ExtractError::Binary { offset } => {
                write!(f, "script contains a NUL byte at offset {}", offset)
            }
            ExtractError::TooDeep { depth, limit } => {
                write!(f, "elements nest {} levels deep, limit is {}", depth, limit)
            }
        }
    }
}

impl std::error::Error for ExtractError {}
