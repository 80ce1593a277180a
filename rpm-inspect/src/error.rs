//! Errors returned by this crate

use thiserror::Error;

/// Errors that can occur while inspecting a package
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The source ended before a field could be read
    #[error("truncated input: source ended while reading {what}")]
    TruncatedInput {
        /// The structure being read
        what: &'static str,
    },
    /// Index or store counts imply an impossible size, or the header
    /// structure is otherwise invalid
    #[error("malformed header: {0}")]
    MalformedHeader(String),
    /// Two EVRs of differently-named packages were compared
    #[error("cannot compare versions of different packages ({left:?} and {right:?})")]
    MismatchedName {
        /// Name of the left-hand package
        left: String,
        /// Name of the right-hand package
        right: String,
    },
    /// The lead failed strict validation
    #[error("invalid lead: {0}")]
    InvalidLead(String),
    /// Any other I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-wide result type
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fill `buf` from `r`, mapping a short read to [`Error::TruncatedInput`].
pub(crate) fn read_exact<R: std::io::Read + ?Sized>(
    r: &mut R,
    buf: &mut [u8],
    what: &'static str,
) -> Result<()> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::TruncatedInput { what },
        _ => Error::Io(e),
    })
}
