use wasm_bindgen::JsValue;

use crate::{Document, HeadElement};

/// The web-target's document provider.
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    /// Get the document of the current window.
    ///
    /// Returns [`None`] outside of a browser main thread.
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self::from_document(document))
    }

    pub fn from_document(document: web_sys::Document) -> Self {
        Self { document }
    }

    fn try_upsert(&self, element: &HeadElement, value: &str) -> Result<(), JsValue> {
        let node = match self.document.query_selector(&element.selector())? {
            Some(node) => node,
            None => {
                let head = self
                    .document
                    .head()
                    .ok_or_else(|| JsValue::from_str("document has no head"))?;
                let node = self.document.create_element(element.tag)?;
                node.set_attribute(element.key_attribute, element.key_value)?;
                head.append_child(&node)?;
                tracing::trace!("created {} in the head", element.selector());
                node
            }
        };

        node.set_attribute(element.value_attribute, value)
    }
}

impl Document for WebDocument {
    fn set_title(&self, title: &str) {
        self.document.set_title(title);
    }

    fn upsert_head_element(&self, element: &HeadElement, value: &str) {
        if let Err(err) = self.try_upsert(element, value) {
            tracing::error!("failed to update {}: {err:?}", element.selector());
        }
    }
}
