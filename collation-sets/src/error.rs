use displaydoc::Display;

/// Errors surfaced while enumerating collation data.
///
/// Rule violations do not exist on this side of the library; every error here
/// means the supplied [`CollationData`](crate::CollationData) is inconsistent
/// with its own declared structure.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CollationSetError {
    /// invalid collation data: {0}
    InvalidData(&'static str),
    /// internal program error: {0}
    Internal(&'static str),
}

impl std::error::Error for CollationSetError {}
