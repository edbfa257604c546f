use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The document state a navigation declares for its page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocMeta {
    /// Always written to the document title.
    #[serde(default)]
    pub title: String,

    /// Written to the meta description when present. When absent the current description stays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_desc: Option<String>,
}

impl DocMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            meta_desc: None,
        }
    }

    pub fn meta_desc(mut self, meta_desc: impl Into<String>) -> Self {
        self.meta_desc = Some(meta_desc.into());
        self
    }
}

/// An application initiated navigation, as passed to [`Navigator::nav`](crate::Navigator::nav).
///
/// The serialized form is `{ "url", "doc": { "title", "metaDesc" }, "data" }`:
///
/// ```rust
/// # use navsync::NavigationRequest;
/// let request: NavigationRequest =
///     serde_json::from_str(r#"{ "url": "/a", "doc": { "title": "A" } }"#).unwrap();
/// assert_eq!(request, NavigationRequest::new("/a", "A"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationRequest {
    /// The url pushed onto the history, relative to the origin (e.g. `/posts/1?draft=true`).
    pub url: String,

    #[serde(default)]
    pub doc: DocMeta,

    /// Opaque application data. [`None`] means no data was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl NavigationRequest {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            doc: DocMeta::new(title),
            data: None,
        }
    }

    pub fn meta_desc(mut self, meta_desc: impl Into<String>) -> Self {
        self.doc.meta_desc = Some(meta_desc.into());
        self
    }

    pub fn data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Fill in the defaults of optional fields: missing `data` becomes [`Value::Null`].
    pub fn normalize(self) -> Navigation {
        Navigation {
            url: self.url,
            doc: self.doc,
            data: self.data.unwrap_or(Value::Null),
        }
    }
}

/// A [`NavigationRequest`] after its optional fields were defaulted.
///
/// This is what the `events.js.after` hook receives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Navigation {
    pub url: String,
    pub doc: DocMeta,
    pub data: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn wire_shape() {
        let request: NavigationRequest = serde_json::from_value(json!({
            "url": "/b",
            "doc": { "title": "B", "metaDesc": "desc" },
            "data": { "k": 1 }
        }))
        .unwrap();

        assert_eq!(
            request,
            NavigationRequest::new("/b", "B")
                .meta_desc("desc")
                .data(json!({ "k": 1 }))
        );
        assert_eq!(
            serde_json::to_value(request.normalize()).unwrap(),
            json!({
                "url": "/b",
                "doc": { "title": "B", "metaDesc": "desc" },
                "data": { "k": 1 }
            })
        );
    }

    #[test]
    fn missing_fields_degrade() {
        let request: NavigationRequest = serde_json::from_value(json!({ "url": "/x" })).unwrap();
        assert_eq!(request.doc.title, "");
        assert_eq!(request.doc.meta_desc, None);
        assert_eq!(request.data, None);
    }

    #[test]
    fn normalize_defaults_data_to_null() {
        assert_eq!(NavigationRequest::new("/c", "C").normalize().data, Value::Null);
        assert_eq!(
            NavigationRequest::new("/c", "C").data(false).normalize().data,
            Value::Bool(false)
        );
    }
}
