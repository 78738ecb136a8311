use thiserror::Error;

/// Errors raised while setting up a grid view.
///
/// Interactions on an existing view never fail; bad input there is absorbed
/// into a no-op or an empty page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("unsupported page size {0}, expected one of 10, 25, 50 or 100")]
    UnsupportedPageSize(usize),
    #[error("invalid page size \"{0}\"")]
    InvalidPageSize(String),
}
