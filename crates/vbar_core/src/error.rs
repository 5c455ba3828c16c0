use thiserror::Error;

/// Conditions reported by scrollbar operations.
///
/// None of these are fatal to the host page: callers log them and carry on
/// with a plain native scroll area.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VbarError {
    #[error("element with scrollbar doesn't have exactly one content child (found {found})")]
    MissingContent { found: usize },

    #[error("can't initialize on already initialized element")]
    AlreadyInitialized,

    #[error("scrollbar on this element has been destroyed")]
    Destroyed,

    #[error("element has no scrollbar")]
    NotInitialized,

    #[error("invalid scroll position: {0}")]
    InvalidScrollPosition(f64),

    #[error("host document error: {0}")]
    Host(String),
}

pub type Result<T> = std::result::Result<T, VbarError>;
