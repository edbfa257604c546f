//! Document metadata for soft navigations.
//!
//! A [`Document`] owns the title of the page and the handful of `<head>` elements search engines
//! read: the canonical link and the meta description. Every write is an upsert: the element is
//! looked up first and only created when missing, so repeated navigations never stack duplicate
//! tags in the head.

mod memory;
pub use memory::*;

#[cfg(feature = "web")]
mod web;
#[cfg(feature = "web")]
pub use web::*;

/// Describes a singleton element in the document head.
///
/// The element is identified by `tag[key_attribute="key_value"]`, and its payload lives in
/// `value_attribute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadElement {
    pub tag: &'static str,
    pub key_attribute: &'static str,
    pub key_value: &'static str,
    pub value_attribute: &'static str,
}

impl HeadElement {
    /// `<link rel="canonical" href="...">`
    pub const CANONICAL: HeadElement = HeadElement {
        tag: "link",
        key_attribute: "rel",
        key_value: "canonical",
        value_attribute: "href",
    };

    /// `<meta name="description" content="...">`
    pub const DESCRIPTION: HeadElement = HeadElement {
        tag: "meta",
        key_attribute: "name",
        key_value: "description",
        value_attribute: "content",
    };

    /// The CSS selector that finds this element.
    ///
    /// ```rust
    /// # use navsync_document::HeadElement;
    /// assert_eq!(HeadElement::CANONICAL.selector(), r#"link[rel="canonical"]"#);
    /// ```
    pub fn selector(&self) -> String {
        format!(
            r#"{}[{}="{}"]"#,
            self.tag, self.key_attribute, self.key_value
        )
    }
}

/// A provider for the document state a navigation reconciles.
pub trait Document {
    /// Set the title of the document
    fn set_title(&self, title: &str);

    /// Find the element described by `element`, creating and appending it to the head if it does
    /// not exist yet, then set its value attribute to `value`.
    ///
    /// Implementations must never create a second element when one already matches.
    fn upsert_head_element(&self, element: &HeadElement, value: &str);

    /// Point the canonical link of the page at `href`.
    fn set_canonical(&self, href: &str) {
        self.upsert_head_element(&HeadElement::CANONICAL, href);
    }

    /// Set the meta description of the page.
    fn set_description(&self, content: &str) {
        self.upsert_head_element(&HeadElement::DESCRIPTION, content);
    }
}
