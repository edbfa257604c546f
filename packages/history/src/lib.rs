//! History Integration
//!
//! navsync relies on so-called [`History`] providers to store the current URL, a past (i.e. a
//! browsers back button) and a future (i.e. a browsers forward button).
//!
//! To integrate navsync with any kind of session history, implement the [`History`] trait. This
//! crate ships an in-memory provider and, behind the `web` feature, one backed by the browser's
//! [History API](https://developer.mozilla.org/en-US/docs/Web/API/History_API).

use std::rc::Rc;

mod memory;
pub use memory::*;

#[cfg(feature = "web")]
mod web;
#[cfg(feature = "web")]
pub use web::*;

/// A callback invoked when the current entry changes because of a traversal (back/forward).
pub type HistoryListener = Rc<dyn Fn()>;

/// Identifies the listener installed by [`History::listen`].
///
/// Ids are only meaningful for the provider that handed them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// An error raised while mutating the history stack.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// The url cannot be pushed onto this history (for example a protocol relative `//host` url).
    #[error("cannot navigate to {url:?}")]
    InvalidUrl { url: String },

    /// The host rejected the operation.
    #[error("history operation failed: {0}")]
    Host(String),
}

/// An integration with some kind of navigation history.
///
/// Implementations should mimic a web browser:
/// - [`History::push`] adds an entry and clears the future, but never notifies the listener.
/// - [`History::go_back`] and [`History::go_forward`] move through existing entries and notify
///   the listener once the current entry changed.
pub trait History {
    /// Get the path of the current URL.
    ///
    /// **Must start** with `/`.
    ///
    /// ```rust
    /// # use navsync_history::{History, MemoryHistory};
    /// let history = MemoryHistory::default();
    /// assert_eq!(history.current_path(), "/");
    ///
    /// history.push("/path?q=1").unwrap();
    /// assert_eq!(history.current_path(), "/path");
    /// ```
    #[must_use]
    fn current_path(&self) -> String;

    /// Get the query of the current URL, including the leading `?`.
    ///
    /// Returns an empty string if the current URL has no query.
    ///
    /// ```rust
    /// # use navsync_history::{History, MemoryHistory};
    /// let history = MemoryHistory::default();
    /// assert_eq!(history.current_query(), "");
    ///
    /// history.push("/search?q=rust").unwrap();
    /// assert_eq!(history.current_query(), "?q=rust");
    /// ```
    #[must_use]
    fn current_query(&self) -> String;

    /// Push a new entry for `url` onto the stack.
    ///
    /// This must not notify the installed listener. The future is cleared.
    fn push(&self, url: &str) -> Result<(), HistoryError>;

    /// Check whether there is a previous page to navigate back to.
    ///
    /// If a [`History`] cannot know this, it should return [`true`].
    #[must_use]
    fn can_go_back(&self) -> bool {
        true
    }

    /// Go back to a previous page.
    ///
    /// If there is no previous page, this does nothing.
    fn go_back(&self);

    /// Check whether there is a future page to navigate forward to.
    ///
    /// If a [`History`] cannot know this, it should return [`true`].
    #[must_use]
    fn can_go_forward(&self) -> bool {
        true
    }

    /// Go forward to a future page.
    ///
    /// If there is no future page, this does nothing.
    fn go_forward(&self);

    /// Install `callback` as the traversal listener, replacing any listener installed before.
    fn listen(&self, callback: HistoryListener) -> ListenerId;

    /// Remove the listener identified by `id`.
    ///
    /// Returns [`false`] if `id` is not the currently installed listener, in which case nothing
    /// changes.
    fn unlisten(&self, id: ListenerId) -> bool;

    /// Whether `id` identifies the currently installed listener.
    #[must_use]
    fn is_listening(&self, id: ListenerId) -> bool;
}
