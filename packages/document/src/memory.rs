use std::cell::RefCell;

use crate::{Document, HeadElement};

/// A node in the head of a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadNode {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
}

impl HeadNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Get the value of the attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    fn matches(&self, element: &HeadElement) -> bool {
        self.tag == element.tag && self.attribute(element.key_attribute) == Some(element.key_value)
    }
}

/// A [`Document`] that keeps the title and head in memory.
///
/// Used for tests and for hosts that render the head themselves after a navigation.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    title: RefCell<String>,
    head: RefCell<Vec<HeadNode>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a head that already contains `nodes`, e.g. the server rendered tags.
    pub fn with_head(nodes: impl IntoIterator<Item = HeadNode>) -> Self {
        Self {
            title: RefCell::default(),
            head: RefCell::new(nodes.into_iter().collect()),
        }
    }

    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    /// A snapshot of every node in the head, in insertion order.
    pub fn head(&self) -> Vec<HeadNode> {
        self.head.borrow().clone()
    }

    /// The first node matching `element`.
    pub fn find(&self, element: &HeadElement) -> Option<HeadNode> {
        self.head
            .borrow()
            .iter()
            .find(|node| node.matches(element))
            .cloned()
    }

    /// The value attribute of the first node matching `element`.
    pub fn value(&self, element: &HeadElement) -> Option<String> {
        self.find(element)
            .and_then(|node| node.attribute(element.value_attribute).map(str::to_string))
    }

    /// How many nodes match `element`.
    pub fn count(&self, element: &HeadElement) -> usize {
        self.head
            .borrow()
            .iter()
            .filter(|node| node.matches(element))
            .count()
    }

    pub fn canonical(&self) -> Option<String> {
        self.value(&HeadElement::CANONICAL)
    }

    pub fn description(&self) -> Option<String> {
        self.value(&HeadElement::DESCRIPTION)
    }
}

impl Document for MemoryDocument {
    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    fn upsert_head_element(&self, element: &HeadElement, value: &str) {
        let mut head = self.head.borrow_mut();
        let index = match head.iter().position(|node| node.matches(element)) {
            Some(index) => index,
            None => {
                tracing::trace!("creating {} in the head", element.selector());
                head.push(
                    HeadNode::new(element.tag)
                        .with_attribute(element.key_attribute, element.key_value),
                );
                head.len() - 1
            }
        };
        head[index].set_attribute(element.value_attribute, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonical_is_created_once() {
        let document = MemoryDocument::new();
        document.set_canonical("https://x.com/a");
        document.set_canonical("https://x.com/b");

        assert_eq!(document.count(&HeadElement::CANONICAL), 1);
        assert_eq!(document.canonical().as_deref(), Some("https://x.com/b"));
        assert_eq!(
            document.head(),
            vec![HeadNode::new("link")
                .with_attribute("rel", "canonical")
                .with_attribute("href", "https://x.com/b")]
        );
    }

    #[test]
    fn description_is_created_then_mutated() {
        let document = MemoryDocument::new();
        assert_eq!(document.count(&HeadElement::DESCRIPTION), 0);

        document.set_description("first");
        assert_eq!(document.count(&HeadElement::DESCRIPTION), 1);

        document.set_description("second");
        document.set_description("second");
        assert_eq!(document.count(&HeadElement::DESCRIPTION), 1);
        assert_eq!(document.description().as_deref(), Some("second"));
        assert_eq!(document.find(&HeadElement::DESCRIPTION).unwrap().tag, "meta");
    }

    #[test]
    fn existing_elements_are_reused() {
        let document = MemoryDocument::with_head([
            HeadNode::new("meta").with_attribute("charset", "utf-8"),
            HeadNode::new("link")
                .with_attribute("rel", "stylesheet")
                .with_attribute("href", "/main.css"),
            HeadNode::new("meta")
                .with_attribute("name", "description")
                .with_attribute("content", "server rendered"),
        ]);

        document.set_description("client");
        document.set_canonical("https://x.com/");

        let head = document.head();
        assert_eq!(head.len(), 4);
        assert_eq!(head[1].attribute("href"), Some("/main.css"));
        assert_eq!(head[2].attribute("content"), Some("client"));
        assert_eq!(head[3].attribute("href"), Some("https://x.com/"));
    }

    #[test]
    fn title_is_replaced() {
        let document = MemoryDocument::new();
        assert_eq!(document.title(), "");
        document.set_title("A");
        document.set_title("B");
        assert_eq!(document.title(), "B");
    }
}
