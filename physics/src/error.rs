use thiserror::Error;

/// Precondition failures reported by [`crate::list::IntrusiveList`].
///
/// Every variant is returned before the list is touched, so a failed call
/// leaves the chain exactly as it was.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum ListError {
    #[error("list is full (max_size {max_size})")]
    CapacityExceeded { max_size: usize },
    #[error("list is empty")]
    Empty,
    #[error("cursor is at the end of the list")]
    EndCursor,
    #[error("handle refers to a freed entity")]
    StaleHandle,
    #[error("entity is not linked into this list")]
    NotLinked,
    #[error("entity is already linked into a list")]
    AlreadyLinked,
    #[error("list is corrupt: {0}")]
    Corrupt(&'static str),
}

#[derive(Copy, Clone, Debug, Error, PartialEq)]
pub enum SweepError {
    #[error("alpha {0} is not finite")]
    NonFinite(f32),
    #[error("alpha {alpha} outside [{alpha0}, 1)")]
    OutOfRange { alpha: f32, alpha0: f32 },
    #[error("sweep has no remaining motion (alpha0 {0})")]
    Exhausted(f32),
}

#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error(transparent)]
    List(#[from] ListError),
    #[error(transparent)]
    Sweep(#[from] SweepError),
    #[error("body handle is not live")]
    InvalidBody,
    #[error("fixture handle is not live")]
    InvalidFixture,
    #[error("contact handle is not live")]
    InvalidContact,
    #[error("joint handle is not live")]
    InvalidJoint,
    #[error("a {0} cannot connect a body to itself")]
    SameBody(&'static str),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
