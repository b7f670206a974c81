use crate::error::Error;

/// Result type alias used throughout the smith crates.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
