use std::cell::{Cell, RefCell};

use gloo::events::EventListener;
use wasm_bindgen::JsValue;
use web_sys::Window;

use crate::{History, HistoryError, HistoryListener, ListenerId};

/// A [`History`] that integrates with a browser via the [History API](https://developer.mozilla.org/en-US/docs/Web/API/History_API).
///
/// Entries are pushed with a `null` state; the live `location` is the only source of truth when
/// the user travels back or forward. The `popstate` listener lives as long as this provider or
/// until it is removed with [`History::unlisten`].
pub struct WebHistory {
    window: Window,
    history: web_sys::History,
    listener: RefCell<Option<(ListenerId, EventListener)>>,
    next_listener: Cell<u64>,
}

impl WebHistory {
    /// Create a [`WebHistory`] for the current window.
    ///
    /// Returns [`None`] outside of a browser main thread.
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        Self::for_window(window)
    }

    /// Create a [`WebHistory`] for `window`.
    pub fn for_window(window: Window) -> Option<Self> {
        let history = match window.history() {
            Ok(history) => history,
            Err(err) => {
                tracing::error!("`window` has no access to `history`: {err:?}");
                return None;
            }
        };

        Some(Self {
            window,
            history,
            listener: RefCell::new(None),
            next_listener: Cell::new(0),
        })
    }
}

fn host_error(err: JsValue) -> HistoryError {
    HistoryError::Host(format!("{err:?}"))
}

impl History for WebHistory {
    fn current_path(&self) -> String {
        self.window
            .location()
            .pathname()
            .unwrap_or_else(|_| String::from("/"))
    }

    fn current_query(&self) -> String {
        self.window.location().search().unwrap_or_default()
    }

    fn push(&self, url: &str) -> Result<(), HistoryError> {
        // pushState never fires popstate, so the listener stays quiet here.
        self.history
            .push_state_with_url(&JsValue::NULL, "", Some(url))
            .map_err(host_error)
    }

    fn go_back(&self) {
        if let Err(e) = self.history.back() {
            tracing::error!("failed to go back: {e:?}")
        }
    }

    fn go_forward(&self) {
        if let Err(e) = self.history.forward() {
            tracing::error!("failed to go forward: {e:?}")
        }
    }

    fn listen(&self, callback: HistoryListener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);

        let listener = EventListener::new(&self.window, "popstate", move |_| callback());

        // Dropping the previous `EventListener` detaches it from the window.
        *self.listener.borrow_mut() = Some((id, listener));
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
