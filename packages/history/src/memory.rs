use std::cell::{Cell, RefCell};

use url::Url;

use crate::{History, HistoryError, HistoryListener, ListenerId};

// A special scheme, so relative urls resolve the way `location` resolves them in a browser.
const BASE: &str = "http://localhost/";

struct MemoryHistoryState {
    current: Url,
    history: Vec<Url>,
    future: Vec<Url>,
}

/// A [`History`] provider that stores all navigation information in memory.
///
/// Traversals notify the installed listener the same way a browser fires `popstate`, which makes
/// this provider suitable for tests and non-browser hosts.
pub struct MemoryHistory {
    state: RefCell<MemoryHistoryState>,
    listener: RefCell<Option<(ListenerId, HistoryListener)>>,
    next_listener: Cell<u64>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::with_initial_path("/")
    }
}

impl MemoryHistory {
    /// Create a [`MemoryHistory`] starting at `path`.
    ///
    /// ```rust
    /// # use navsync_history::{History, MemoryHistory};
    /// let history = MemoryHistory::with_initial_path("/blog?page=2");
    /// assert_eq!(history.current_path(), "/blog");
    /// assert_eq!(history.current_query(), "?page=2");
    /// assert_eq!(history.can_go_back(), false);
    /// ```
    pub fn with_initial_path(path: impl AsRef<str>) -> Self {
        let base = base_url();
        let current = match resolve(&base, path.as_ref()) {
            Ok(url) => url,
            Err(err) => {
                tracing::error!("{err}, starting at `/` instead");
                base
            }
        };

        Self {
            state: MemoryHistoryState {
                current,
                history: Vec::new(),
                future: Vec::new(),
            }
            .into(),
            listener: RefCell::new(None),
            next_listener: Cell::new(0),
        }
    }

    /// The current entry as a path, query and fragment, e.g. `/search?q=1#top`.
    pub fn current_url(&self) -> String {
        let state = self.state.borrow();
        let url = &state.current;
        let mut out = url.path().to_string();
        if let Some(query) = url.query() {
            out.push('?');
            out.push_str(query);
        }
        if let Some(fragment) = url.fragment() {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }

    /// The number of entries in the stack, including past, current and future entries.
    pub fn len(&self) -> usize {
        let state = self.state.borrow();
        state.history.len() + 1 + state.future.len()
    }

    /// A history always contains the current entry.
    pub fn is_empty(&self) -> bool {
        false
    }

    fn notify(&self) {
        // The listener may push new entries, so no borrow can be held while it runs.
        let listener = self
            .listener
            .borrow()
            .as_ref()
            .map(|(_, listener)| listener.clone());

        if let Some(listener) = listener {
            listener();
        }
    }
}

impl History for MemoryHistory {
    fn current_path(&self) -> String {
        self.state.borrow().current.path().to_string()
    }

    fn current_query(&self) -> String {
        match self.state.borrow().current.query() {
            Some(query) => format!("?{query}"),
            None => String::new(),
        }
    }

    fn push(&self, url: &str) -> Result<(), HistoryError> {
        let mut write = self.state.borrow_mut();
        let new = resolve(&write.current, url)?;
        let old = std::mem::replace(&mut write.current, new);
        write.history.push(old);
        write.future.clear();
        Ok(())
    }

    fn can_go_back(&self) -> bool {
        !self.state.borrow().history.is_empty()
    }

    fn go_back(&self) {
        let moved = {
            let mut write = self.state.borrow_mut();
            match write.history.pop() {
                Some(last) => {
                    let old = std::mem::replace(&mut write.current, last);
                    write.future.push(old);
                    true
                }
                None => false,
            }
        };

        if moved {
            self.notify();
        }
    }

    fn can_go_forward(&self) -> bool {
        !self.state.borrow().future.is_empty()
    }

    fn go_forward(&self) {
        let moved = {
            let mut write = self.state.borrow_mut();
            match write.future.pop() {
                Some(next) => {
                    let old = std::mem::replace(&mut write.current, next);
                    write.history.push(old);
                    true
                }
                None => false,
            }
        };

        if moved {
            self.notify();
        }
    }

    fn listen(&self, callback: HistoryListener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        *self.listener.borrow_mut() = Some((id, callback));
        id
    }

    fn unlisten(&self, id: ListenerId) -> bool {
        let mut listener = self.listener.borrow_mut();
        match listener.as_ref() {
            Some((installed, _)) if *installed == id => {
                *listener = None;
                true
            }
            _ => false,
        }
    }

    fn is_listening(&self, id: ListenerId) -> bool {
        matches!(self.listener.borrow().as_ref(), Some((installed, _)) if *installed == id)
    }
}

fn base_url() -> Url {
    Url::parse(BASE).unwrap_or_else(|err| unreachable!("{BASE} is a valid url: {err}"))
}

/// Resolve `url` against `current`, refusing anything that would leave the current origin.
fn resolve(current: &Url, url: &str) -> Result<Url, HistoryError> {
    let invalid = || HistoryError::InvalidUrl {
        url: url.to_string(),
    };

    if url.starts_with("//") {
        return Err(invalid());
    }

    let resolved = current.join(url).map_err(|_| invalid())?;
    if resolved.origin() != current.origin() {
        return Err(invalid());
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn counter(history: &MemoryHistory) -> (ListenerId, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        let id = history.listen({
            let count = count.clone();
            Rc::new(move || count.set(count.get() + 1))
        });
        (id, count)
    }

    #[test]
    fn push_keeps_query_and_clears_future() {
        let history = MemoryHistory::default();
        history.push("/a?x=1&y=2").unwrap();
        history.push("/b").unwrap();
        history.go_back();
        assert!(history.can_go_forward());

        history.push("/c#section").unwrap();
        assert!(!history.can_go_forward());
        assert_eq!(history.current_url(), "/c#section");
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn push_resolves_relative_urls() {
        let history = MemoryHistory::with_initial_path("/docs/intro");
        history.push("guide").unwrap();
        assert_eq!(history.current_path(), "/docs/guide");

        history.push("?page=3").unwrap();
        assert_eq!(history.current_path(), "/docs/guide");
        assert_eq!(history.current_query(), "?page=3");
    }

    #[test]
    fn backslashes_resolve_like_slashes() {
        let history = MemoryHistory::with_initial_path("/docs/intro");
        history.push("\\blog\\post").unwrap();
        assert_eq!(history.current_path(), "/blog/post");

        history.push("..\\about").unwrap();
        assert_eq!(history.current_path(), "/about");
    }

    #[test]
    fn push_rejects_other_origins() {
        let history = MemoryHistory::default();
        assert_eq!(
            history.push("//evil.example/x"),
            Err(HistoryError::InvalidUrl {
                url: "//evil.example/x".to_string()
            })
        );
        assert!(history.push("https://evil.example/x").is_err());
        assert!(history.push("/\\evil.example/x").is_err());
        assert!(history.push("http://localhost:8080/x").is_err());
        assert_eq!(history.current_path(), "/");
        assert!(!history.can_go_back());
    }

    #[test]
    fn push_does_not_notify() {
        let history = MemoryHistory::default();
        let (_, count) = counter(&history);
        history.push("/a").unwrap();
        history.push("/b").unwrap();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn traversal_notifies_only_when_moving() {
        let history = MemoryHistory::default();
        let (_, count) = counter(&history);

        history.go_back();
        history.go_forward();
        assert_eq!(count.get(), 0);

        history.push("/a").unwrap();
        history.go_back();
        assert_eq!(history.current_path(), "/");
        history.go_forward();
        assert_eq!(history.current_path(), "/a");
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn listen_replaces_previous_listener() {
        let history = MemoryHistory::default();
        let (first, first_count) = counter(&history);
        let (second, second_count) = counter(&history);
        assert_ne!(first, second);

        history.push("/a").unwrap();
        history.go_back();
        assert_eq!(first_count.get(), 0);
        assert_eq!(second_count.get(), 1);

        // a stale id leaves the current listener alone
        assert!(!history.unlisten(first));
        history.go_forward();
        assert_eq!(second_count.get(), 2);

        assert!(!history.is_listening(first));
        assert!(history.is_listening(second));
        assert!(history.unlisten(second));
        assert!(!history.unlisten(second));
        assert!(!history.is_listening(second));
        history.go_back();
        assert_eq!(second_count.get(), 2);
    }

    #[test]
    fn listener_can_push_while_notified() {
        let history = Rc::new(MemoryHistory::default());
        history.push("/a").unwrap();
        history.listen({
            let history = Rc::downgrade(&history);
            Rc::new(move || {
                if let Some(history) = history.upgrade() {
                    history.push("/redirected").unwrap();
                }
            })
        });

        history.go_back();
        assert_eq!(history.current_path(), "/redirected");
    }

    #[test]
    fn invalid_initial_path_falls_back_to_root() {
        let history = MemoryHistory::with_initial_path("//elsewhere/");
        assert_eq!(history.current_path(), "/");
    }
}
