use navsync_history::HistoryError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error raised by a [`Navigator`](crate::Navigator).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The history entry could not be pushed. Nothing else happened.
    #[error(transparent)]
    History(#[from] HistoryError),

    /// A user supplied hook failed. The error is passed through untouched.
    #[error(transparent)]
    Hook(anyhow::Error),

    /// The host does not provide something the navigator needs, like `window` or `document`.
    #[error("{0} is not available")]
    Unavailable(&'static str),
}
