//! Expansion error types.

/// Error during occurrence expansion.
///
/// Both variants are permanent: the input must be corrected by the caller.
/// Exhaustion of a bounded rule is not an error; it is reported as an
/// absent occurrence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpandError {
    /// Unknown or invalid time-zone identifier.
    #[error("Unknown time zone: {0}")]
    UnknownZone(String),

    /// Anchor or series start lacks required time-zone information.
    #[error("Anchor lacks time-zone information: {0}")]
    InvalidAnchor(String),
}
