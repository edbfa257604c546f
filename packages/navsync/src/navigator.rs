use std::{
    cell::Cell,
    rc::{Rc, Weak},
};

use navsync_document::Document;
use navsync_history::{History, ListenerId};

use crate::{
    config::{Config, Events, SiteConfig},
    query::{decode_query, QueryMap},
    Error, NavigationRequest, Result,
};

/// Activate a [`Navigator`] on top of `history` and `document`.
///
/// A listener for browser driven traversals is installed on `history`; it replaces whatever
/// listener was installed there before. Each traversal runs [`Navigator::nav_by_browser`].
///
/// ```rust
/// # use std::rc::Rc;
/// # use navsync::prelude::*;
/// let history = Rc::new(MemoryHistory::default());
/// let document = Rc::new(MemoryDocument::new());
/// let navigator = navsync::on(
///     Config::default().canonical_domain("https://example.com"),
///     history.clone(),
///     document.clone(),
/// );
///
/// navigator.nav(NavigationRequest::new("/about", "About us")).unwrap();
/// assert_eq!(history.current_path(), "/about");
/// assert_eq!(document.title(), "About us");
/// assert_eq!(document.canonical().as_deref(), Some("https://example.com/about"));
/// ```
#[must_use = "dropping the navigator removes its traversal listener"]
pub fn on(config: Config, history: Rc<dyn History>, document: Rc<dyn Document>) -> Navigator {
    let Config { site, events } = config;
    let inner = Rc::new(NavigatorInner {
        site,
        events,
        history,
        document,
        listener: Cell::new(None),
    });

    let weak = Rc::downgrade(&inner);
    let id = inner.history.listen(Rc::new(move || on_popstate(&weak)));
    inner.listener.set(Some(id));

    tracing::debug!(
        canonical_domain = ?inner.site.canonical_domain,
        "navigator activated"
    );

    Navigator { inner }
}

/// Activate a [`Navigator`] on the browser window the code runs in.
#[cfg(feature = "web")]
#[must_use = "dropping the navigator removes its traversal listener"]
pub fn on_web(config: Config) -> Result<Navigator> {
    let history = navsync_history::WebHistory::new().ok_or(Error::Unavailable("window.history"))?;
    let document =
        navsync_document::WebDocument::new().ok_or(Error::Unavailable("window.document"))?;
    Ok(on(config, Rc::new(history), Rc::new(document)))
}

fn on_popstate(inner: &Weak<NavigatorInner>) {
    let Some(inner) = inner.upgrade() else {
        return;
    };

    // There is no caller to hand the error to, the event loop dispatched us.
    if let Err(err) = (Navigator { inner }).nav_by_browser() {
        tracing::error!("browser navigation failed: {err}");
    }
}

struct NavigatorInner {
    site: SiteConfig,
    events: Events,
    history: Rc<dyn History>,
    document: Rc<dyn Document>,
    listener: Cell<Option<ListenerId>>,
}

impl NavigatorInner {
    fn off(&self) {
        if let Some(id) = self.listener.take() {
            if !self.history.unlisten(id) {
                tracing::trace!("listener was already replaced by another navigator");
            }
        }
    }
}

impl Drop for NavigatorInner {
    fn drop(&mut self) {
        self.off();
    }
}

/// A handle to an activated navigation controller.
///
/// Cloning is cheap, all clones share the same activation. The controller is deactivated with
/// [`Navigator::off`] or when the last clone is dropped.
#[derive(Clone)]
#[must_use = "dropping the navigator removes its traversal listener"]
pub struct Navigator {
    inner: Rc<NavigatorInner>,
}

impl Navigator {
    /// Navigate to `request.url` without reloading the page.
    ///
    /// In order, this:
    /// 1. pushes a history entry for the url, which does not trigger the browser listener,
    /// 2. reconciles the document with [`Navigator::update_doc`],
    /// 3. defaults `data` to `null` if it was not supplied,
    /// 4. calls the `events.js.after` hook with the normalized request.
    ///
    /// If the push fails nothing else happens. Errors from the hook are returned as they are.
    pub fn nav(&self, request: NavigationRequest) -> Result<()> {
        tracing::debug!(url = %request.url, "pushing history entry");
        self.inner.history.push(&request.url)?;

        self.update_doc(&request);

        let navigation = request.normalize();
        (self.inner.events.js.after)(&navigation).map_err(Error::Hook)
    }

    /// Reconcile after the user moved through history with back/forward.
    ///
    /// The path and query are read from the live location, not from anything stored when the
    /// entry was pushed. The document is left alone: the `events.browser.after` hook decides what
    /// to render and calls [`Navigator::update_doc`] itself.
    pub fn nav_by_browser(&self) -> Result<()> {
        let path = self.inner.history.current_path();
        let query = decode_query(&self.inner.history.current_query());

        tracing::debug!(%path, ?query, "browser navigation");
        (self.inner.events.browser.after)(self, &path, &query).map_err(Error::Hook)
    }

    /// Bring the title, canonical link and description in line with `request`.
    ///
    /// - The title is always set.
    /// - The canonical link is set to `canonical_domain + url` only if a domain is configured.
    /// - The description is only set if `request.doc.meta_desc` is present.
    ///
    /// Anything that is not set is left as it was.
    pub fn update_doc(&self, request: &NavigationRequest) {
        let document = &self.inner.document;

        document.set_title(&request.doc.title);

        if let Some(domain) = &self.inner.site.canonical_domain {
            document.set_canonical(&format!("{domain}{}", request.url));
        }

        if let Some(meta_desc) = &request.doc.meta_desc {
            document.set_description(meta_desc);
        }
    }

    /// Stop reacting to browser driven traversals.
    ///
    /// Calling this more than once, or after another navigator took over the same history, does
    /// nothing.
    pub fn off(&self) {
        self.inner.off();
    }

    /// Whether this navigator still owns a traversal listener.
    pub fn is_active(&self) -> bool {
        self.inner
            .listener
            .get()
            .is_some_and(|id| self.inner.history.is_listening(id))
    }

    /// The site settings this navigator was activated with.
    pub fn site(&self) -> &SiteConfig {
        &self.inner.site
    }

    /// The path of the live location.
    pub fn current_path(&self) -> String {
        self.inner.history.current_path()
    }

    /// The decoded query of the live location.
    pub fn current_query(&self) -> QueryMap {
        decode_query(&self.inner.history.current_query())
    }

    pub fn can_go_back(&self) -> bool {
        self.inner.history.can_go_back()
    }

    /// Go back one entry, as if the user pressed the back button.
    pub fn go_back(&self) {
        self.inner.history.go_back();
    }

    pub fn can_go_forward(&self) -> bool {
        self.inner.history.can_go_forward()
    }

    /// Go forward one entry, as if the user pressed the forward button.
    pub fn go_forward(&self) {
        self.inner.history.go_forward();
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("site", &self.inner.site)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}
