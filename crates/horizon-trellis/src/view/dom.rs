//! Document and element seams.
//!
//! The binding layer never touches a concrete element tree; it consumes
//! these two traits. [`MemoryDocument`] is the bundled reference
//! implementation (enough for headless use and for tests); host
//! integrations provide their own.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::view::selector::Selector;

/// One element of the host tree.
///
/// Implementations must tolerate reads after detachment: a detached element
/// keeps its attributes and content (template extraction holds on to
/// elements it has removed from the document).
pub trait Element: Send + Sync {
    /// The element's tag name.
    fn tag(&self) -> String;

    /// Reads an attribute by name.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Reads a data value by key. The default reads the `data-` prefixed
    /// attribute; hosts with a separate data store override this.
    fn data(&self, key: &str) -> Option<String> {
        self.attribute(&format!("data-{key}"))
    }

    /// The element's inner content.
    fn inner_content(&self) -> String;

    /// Replaces the element's inner content.
    fn set_inner_content(&self, content: &str);

    /// Removes the element from its document. Selection no longer yields
    /// it; existing handles stay readable.
    fn detach(&self);

    /// Returns `true` once the element has been detached.
    fn is_detached(&self) -> bool;
}

/// A selectable tree of elements.
pub trait Document: Send + Sync {
    /// All attached elements matching the selector, in document order.
    fn select(&self, selector: &Selector) -> Vec<Arc<dyn Element>>;
}

/// An in-memory element: a tag, attributes, and text content.
///
/// Built with consuming `with_*` methods, then shared via
/// [`into_shared`](Self::into_shared) or [`MemoryDocument::insert`].
pub struct MemoryElement {
    tag: String,
    attributes: HashMap<String, String>,
    content: RwLock<String>,
    detached: AtomicBool,
}

impl MemoryElement {
    /// Creates an element with the given tag and no attributes or content.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: HashMap::new(),
            content: RwLock::new(String::new()),
            detached: AtomicBool::new(false),
        }
    }

    /// Adds an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets the inner content.
    pub fn with_content(self, content: impl Into<String>) -> Self {
        *self.content.write() = content.into();
        self
    }

    /// Wraps the element in a shared handle.
    pub fn into_shared(self) -> Arc<MemoryElement> {
        Arc::new(self)
    }
}

impl Element for MemoryElement {
    fn tag(&self) -> String {
        self.tag.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn inner_content(&self) -> String {
        self.content.read().clone()
    }

    fn set_inner_content(&self, content: &str) {
        *self.content.write() = content.to_string();
    }

    fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }

    fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }
}

/// An in-memory document: a flat, ordered sequence of elements.
///
/// The flat shape is deliberate: the restricted selector grammar has no
/// hierarchy tests, so nesting would buy nothing.
#[derive(Default)]
pub struct MemoryDocument {
    nodes: RwLock<Vec<Arc<MemoryElement>>>,
}

impl MemoryDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an element, returning its shared handle.
    pub fn insert(&self, element: MemoryElement) -> Arc<MemoryElement> {
        let shared = element.into_shared();
        self.nodes.write().push(shared.clone());
        shared
    }

    /// Number of attached elements.
    pub fn len(&self) -> usize {
        self.nodes
            .read()
            .iter()
            .filter(|node| !node.is_detached())
            .count()
    }

    /// Returns `true` if no elements are attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Document for MemoryDocument {
    fn select(&self, selector: &Selector) -> Vec<Arc<dyn Element>> {
        self.nodes
            .read()
            .iter()
            .filter(|node| !node.is_detached() && selector.matches(node.as_ref()))
            .map(|node| node.clone() as Arc<dyn Element>)
            .collect()
    }
}

static_assertions::assert_impl_all!(MemoryDocument: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_reads() {
        let element = MemoryElement::new("div")
            .with_attribute("data-model", "gadget")
            .with_content("hello");
        assert_eq!(element.tag(), "div");
        assert_eq!(element.attribute("data-model").as_deref(), Some("gadget"));
        assert_eq!(element.data("model").as_deref(), Some("gadget"));
        assert_eq!(element.inner_content(), "hello");
    }

    #[test]
    fn test_select_and_order() {
        let doc = MemoryDocument::new();
        doc.insert(
            MemoryElement::new("div")
                .with_attribute("data-view", "Item")
                .with_attribute("id", "first"),
        );
        doc.insert(MemoryElement::new("span"));
        doc.insert(
            MemoryElement::new("div")
                .with_attribute("data-view", "Item")
                .with_attribute("id", "second"),
        );

        let selector = Selector::parse("div[data-view='Item']").unwrap();
        let matched = doc.select(&selector);
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].attribute("id").as_deref(), Some("first"));
        assert_eq!(matched[1].attribute("id").as_deref(), Some("second"));
    }

    #[test]
    fn test_detached_elements_not_selected() {
        let doc = MemoryDocument::new();
        let node = doc.insert(MemoryElement::new("script").with_content("body"));
        let selector = Selector::parse("script").unwrap();
        assert_eq!(doc.select(&selector).len(), 1);

        node.detach();
        assert!(doc.select(&selector).is_empty());
        // Content survives detachment.
        assert_eq!(node.inner_content(), "body");
    }

    #[test]
    fn test_set_inner_content() {
        let element = MemoryElement::new("div").into_shared();
        element.set_inner_content("rendered");
        assert_eq!(element.inner_content(), "rendered");
    }
}
