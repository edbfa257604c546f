use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{query::QueryMap, Navigation, Navigator};

/// The hook invoked after the user travelled through history with the browser's back/forward
/// buttons. It receives the navigator, the live path and the decoded live query.
pub type BrowserAfter = Rc<dyn Fn(&Navigator, &str, &QueryMap) -> anyhow::Result<()>>;

/// The hook invoked after every [`Navigator::nav`], with the normalized request.
pub type JsAfter = Rc<dyn Fn(&Navigation) -> anyhow::Result<()>>;

/// The environment variable read at compile time by [`SiteConfig::from_build_env`].
pub const CANONICAL_DOMAIN_ENV: &str = "NAVSYNC_CANONICAL_DOMAIN";

const BUILD_CANONICAL_DOMAIN: Option<&str> = std::option_env!("NAVSYNC_CANONICAL_DOMAIN");

/// An error raised while reading a [`SiteConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid site config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Site wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// The origin prepended to every pushed url to build the canonical link, e.g.
    /// `https://example.com`. [`None`] leaves the canonical link alone entirely.
    pub canonical_domain: Option<String>,
}

impl SiteConfig {
    /// Parse a site config from TOML.
    ///
    /// ```rust
    /// # use navsync::SiteConfig;
    /// let site = SiteConfig::from_toml_str(r#"canonicalDomain = "https://example.com""#).unwrap();
    /// assert_eq!(site.canonical_domain.as_deref(), Some("https://example.com"));
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// The site config baked in at compile time through the `NAVSYNC_CANONICAL_DOMAIN`
    /// environment variable. An empty value counts as unset.
    pub fn from_build_env() -> Self {
        let site = Self::from_env_value(BUILD_CANONICAL_DOMAIN);
        if site.canonical_domain.is_none() {
            tracing::trace!("{CANONICAL_DOMAIN_ENV} was not set at build time");
        }
        site
    }

    fn from_env_value(canonical_domain: Option<&str>) -> Self {
        Self {
            canonical_domain: canonical_domain
                .filter(|domain| !domain.is_empty())
                .map(str::to_string),
        }
    }
}

/// Hooks for history traversals driven by the browser.
#[derive(Clone)]
pub struct BrowserEvents {
    pub after: BrowserAfter,
}

impl Default for BrowserEvents {
    fn default() -> Self {
        Self {
            after: Rc::new(|_, _, _| Ok(())),
        }
    }
}

/// Hooks for navigations issued by the application.
#[derive(Clone)]
pub struct JsEvents {
    pub after: JsAfter,
}

impl Default for JsEvents {
    fn default() -> Self {
        Self {
            after: Rc::new(|_| Ok(())),
        }
    }
}

/// Lifecycle hooks of a [`Navigator`].
#[derive(Clone, Default)]
pub struct Events {
    pub browser: BrowserEvents,
    pub js: JsEvents,
}

/// Configuration of a [`Navigator`].
///
/// Every field has a default: no canonical domain and hooks that do nothing. A field that is set
/// replaces its default as a whole, so struct update syntax and the builder below behave the same:
///
/// ```rust
/// # use navsync::{Config, SiteConfig};
/// let cfg = Config {
///     site: SiteConfig { canonical_domain: Some("https://example.com".into()) },
///     ..Default::default()
/// };
///
/// let same = Config::default().canonical_domain("https://example.com");
/// assert_eq!(cfg.site, same.site);
/// ```
#[derive(Clone, Default)]
pub struct Config {
    pub site: SiteConfig,
    pub events: Events,
}

impl Config {
    /// Replace the site settings.
    pub fn site(self, site: SiteConfig) -> Self {
        Self { site, ..self }
    }

    /// Write the canonical link as `domain + url` on every navigation.
    ///
    /// Defaults to [`None`], which leaves the canonical link untouched.
    pub fn canonical_domain(mut self, domain: impl Into<String>) -> Self {
        self.site.canonical_domain = Some(domain.into());
        self
    }

    /// A function to be called whenever the user travels through history with back/forward.
    ///
    /// The navigator does not update the document after such a traversal. Call
    /// [`Navigator::update_doc`] from the hook to reconcile the title and head.
    ///
    /// Defaults to a hook that does nothing.
    pub fn on_browser_after(
        mut self,
        hook: impl Fn(&Navigator, &str, &QueryMap) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.events.browser.after = Rc::new(hook);
        self
    }

    /// A function to be called after every [`Navigator::nav`], once the history entry was pushed
    /// and the document updated.
    ///
    /// Defaults to a hook that does nothing.
    pub fn on_js_after(mut self, hook: impl Fn(&Navigation) -> anyhow::Result<()> + 'static) -> Self {
        self.events.js.after = Rc::new(hook);
        self
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("site", &self.site)
            .finish_non_exhaustive()
    }
}
