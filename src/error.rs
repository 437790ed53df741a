use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("missing {0} in header")]
    MissingField(&'static str),
    #[error("malformed digest {0:?}: expected 64 hex characters")]
    InvalidDigest(String),
    #[error("{field} must be an integer, got {value:?}")]
    InvalidInteger { field: &'static str, value: String },
    #[error(
        "could not find proof of work with {target_bits} leading zero bits after {max_iterations} attempts"
    )]
    Exhausted {
        target_bits: u32,
        max_iterations: u64,
    },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("{0} search worker(s) panicked before finding a proof")]
    WorkerPanicked(usize),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether verification could not run at all: an unreadable file or a
    /// header missing a required field or carrying a non-integer bit count.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::MissingField(_) | Error::InvalidInteger { .. } | Error::Io { .. }
        )
    }
}
