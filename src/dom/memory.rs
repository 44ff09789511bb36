//! Arena-backed in-memory document.
//!
//! [`MemoryDom`] implements [`Dom`] without a browser. Layout is not
//! computed: geometry is whatever the host assigned with
//! [`MemoryDom::set_rect`]. This is enough for headless rendering of the
//! gallery pass and for driving the controllers in tests.
//!
//! # Example
//!
//! ```ignore
//! use article_widgets::dom::{ElementSpec, MemoryDom, Rect};
//!
//! let dom = MemoryDom::new();
//! let figure = dom.build(
//!     dom.root(),
//!     ElementSpec::new("div")
//!         .class("image-compare-container")
//!         .rect(Rect::new(0.0, 0.0, 800.0, 450.0)),
//! );
//! println!("{}", dom.outer_html(figure));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::fmt::Write as _;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::identifiers::NodeId;

use super::{Dom, Rect};

// ============================================================================
// Constants
// ============================================================================

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Tag name of the synthetic document root.
const ROOT_TAG: &str = "#document";

// ============================================================================
// Types
// ============================================================================

/// Storage for one element.
#[derive(Debug, Clone, Default)]
struct NodeData {
    tag: String,
    /// Attributes in insertion order; `class` lives here too.
    attributes: Vec<(String, String)>,
    /// Inline style declarations in insertion order.
    styles: Vec<(String, String)>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Rect,
    offset_height: Option<f64>,
    complete: bool,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            complete: true,
            ..Default::default()
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn classes(&self) -> Vec<String> {
        self.attribute("class")
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Arena state guarded by the outer lock.
#[derive(Debug)]
struct Arena {
    nodes: FxHashMap<NodeId, NodeData>,
    next_id: u64,
    root: NodeId,
}

impl Arena {
    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, data);
        id
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.nodes.get(&candidate).and_then(|n| n.parent);
        }
        false
    }

    fn detach(&mut self, child: NodeId) {
        let parent = self.nodes.get_mut(&child).and_then(|n| n.parent.take());
        if let Some(parent) = parent
            && let Some(data) = self.nodes.get_mut(&parent)
        {
            data.children.retain(|c| *c != child);
        }
    }

    fn drop_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(data) = self.nodes.remove(&current) {
                stack.extend(data.children);
            }
        }
    }

    /// Validates that `child` can be placed under `parent`.
    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.nodes.contains_key(&parent) {
            return Err(Error::node_not_found(parent));
        }
        if !self.nodes.contains_key(&child) {
            return Err(Error::node_not_found(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(Error::config(format!(
                "cannot insert {child} into its own descendant {parent}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// MemoryDom
// ============================================================================

/// In-memory implementation of [`Dom`].
///
/// Thread-safe; every method takes `&self`.
pub struct MemoryDom {
    arena: RwLock<Arena>,
}

// ============================================================================
// MemoryDom - Display
// ============================================================================

impl fmt::Debug for MemoryDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arena = self.arena.read();
        f.debug_struct("MemoryDom")
            .field("root", &arena.root)
            .field("node_count", &arena.nodes.len())
            .finish_non_exhaustive()
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// MemoryDom - Constructor
// ============================================================================

impl MemoryDom {
    /// Creates an empty document holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        let mut arena = Arena {
            nodes: FxHashMap::default(),
            next_id: 1,
            root: NodeId::new(0),
        };
        arena.root = arena.alloc(NodeData::new(ROOT_TAG));

        Self {
            arena: RwLock::new(arena),
        }
    }
}

// ============================================================================
// MemoryDom - Host Helpers
// ============================================================================

impl MemoryDom {
    /// Builds `spec` and appends it under `parent`. Returns the new element.
    ///
    /// If `parent` is not in the document the subtree is left detached.
    pub fn build(&self, parent: NodeId, spec: ElementSpec) -> NodeId {
        let node = self.materialize(spec);
        // Detached parents leave the subtree floating, same as the DOM's
        // behaviour for orphaned fragments.
        let _ = self.append_child(parent, node);
        node
    }

    fn materialize(&self, spec: ElementSpec) -> NodeId {
        let ElementSpec {
            tag,
            attributes,
            text,
            rect,
            complete,
            children,
        } = spec;

        let node = {
            let mut arena = self.arena.write();
            let mut data = NodeData::new(&tag);
            data.attributes = attributes;
            data.text = text;
            data.rect = rect;
            data.complete = complete;
            arena.alloc(data)
        };

        for child in children {
            let child = self.materialize(child);
            let _ = self.append_child(node, child);
        }

        node
    }

    /// Assigns the rendered box of `node`. Also sets its offset height.
    pub fn set_rect(&self, node: NodeId, rect: Rect) {
        if let Some(data) = self.arena.write().nodes.get_mut(&node) {
            data.rect = rect;
            data.offset_height = None;
        }
    }

    /// Overrides the offset height independently of the bounding box.
    pub fn set_offset_height(&self, node: NodeId, height: f64) {
        if let Some(data) = self.arena.write().nodes.get_mut(&node) {
            data.offset_height = Some(height);
        }
    }

    /// Marks an image as loaded or pending.
    pub fn set_complete(&self, node: NodeId, complete: bool) {
        if let Some(data) = self.arena.write().nodes.get_mut(&node) {
            data.complete = complete;
        }
    }

    /// Detaches `node` and discards it together with its subtree.
    pub fn remove(&self, node: NodeId) {
        let mut arena = self.arena.write();
        if node == arena.root {
            return;
        }
        arena.detach(node);
        arena.drop_subtree(node);
    }

    /// Number of live nodes, the root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.arena.read().nodes.len()
    }

    /// Serializes `node` and its subtree as HTML.
    #[must_use]
    pub fn outer_html(&self, node: NodeId) -> String {
        let arena = self.arena.read();
        let mut out = String::new();
        write_node(&arena, node, &mut out);
        out
    }
}

fn write_node(arena: &Arena, node: NodeId, out: &mut String) {
    let Some(data) = arena.nodes.get(&node) else {
        return;
    };

    if data.tag == ROOT_TAG {
        for child in &data.children {
            write_node(arena, *child, out);
        }
        return;
    }

    let _ = write!(out, "<{}", data.tag);
    for (name, value) in &data.attributes {
        let _ = write!(out, " {}=\"{}\"", name, escape(value, true));
    }
    if !data.styles.is_empty() {
        let style = data
            .styles
            .iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        let _ = write!(out, " style=\"{}\"", escape(&style, true));
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&data.tag.to_ascii_lowercase().as_str()) {
        return;
    }

    out.push_str(&escape(&data.text, false));
    for child in &data.children {
        write_node(arena, *child, out);
    }
    let _ = write!(out, "</{}>", data.tag);
}

fn escape(value: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if attribute => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// MemoryDom - Dom
// ============================================================================

impl Dom for MemoryDom {
    fn root(&self) -> NodeId {
        self.arena.read().root
    }

    fn contains(&self, node: NodeId) -> bool {
        let arena = self.arena.read();
        arena.nodes.contains_key(&node) && arena.is_ancestor(arena.root, node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.read().nodes.get(&node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.arena
            .read()
            .nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.arena.read().nodes.get(&node).map(|n| n.tag.clone())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.arena
            .read()
            .nodes
            .get(&node)
            .and_then(|n| n.attribute(name).map(str::to_string))
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.arena.write().nodes.get_mut(&node) {
            data.set_attribute(name, value);
        }
    }

    fn class_list(&self, node: NodeId) -> Vec<String> {
        self.arena
            .read()
            .nodes
            .get(&node)
            .map(NodeData::classes)
            .unwrap_or_default()
    }

    fn add_class(&self, node: NodeId, class: &str) {
        if let Some(data) = self.arena.write().nodes.get_mut(&node) {
            let mut classes = data.classes();
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
                data.set_attribute("class", &classes.join(" "));
            }
        }
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(data) = self.arena.write().nodes.get_mut(&node) {
            let mut classes = data.classes();
            let before = classes.len();
            classes.retain(|c| c != class);
            if classes.len() != before {
                data.set_attribute("class", &classes.join(" "));
            }
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.arena.read().nodes.get(&node).and_then(|n| {
            n.styles
                .iter()
                .find(|(key, _)| key == property)
                .map(|(_, value)| value.clone())
        })
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) {
        if let Some(data) = self.arena.write().nodes.get_mut(&node) {
            match data.styles.iter_mut().find(|(key, _)| key == property) {
                Some(entry) => entry.1 = value.to_string(),
                None => data.styles.push((property.to_string(), value.to_string())),
            }
        }
    }

    fn text(&self, node: NodeId) -> String {
        let arena = self.arena.read();
        let mut text = String::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(data) = arena.nodes.get(&current) {
                text.push_str(&data.text);
                stack.extend(data.children.iter().rev().copied());
            }
        }
        text
    }

    fn set_text(&self, node: NodeId, text: &str) {
        let mut arena = self.arena.write();
        let children = match arena.nodes.get_mut(&node) {
            Some(data) => {
                data.text = text.to_string();
                std::mem::take(&mut data.children)
            }
            None => return,
        };
        for child in children {
            arena.drop_subtree(child);
        }
    }

    fn create_element(&self, tag: &str) -> NodeId {
        self.arena.write().alloc(NodeData::new(tag))
    }

    fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let mut arena = self.arena.write();
        arena.check_insert(parent, child)?;

        arena.detach(child);
        if let Some(data) = arena.nodes.get_mut(&child) {
            data.parent = Some(parent);
        }
        if let Some(data) = arena.nodes.get_mut(&parent) {
            data.children.push(child);
        }
        Ok(())
    }

    fn insert_before(&self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<()> {
        let mut arena = self.arena.write();
        arena.check_insert(parent, child)?;

        let is_child_of_parent = arena
            .nodes
            .get(&parent)
            .is_some_and(|p| p.children.contains(&reference));
        if !is_child_of_parent {
            return Err(Error::node_not_found(reference));
        }

        arena.detach(child);
        if let Some(data) = arena.nodes.get_mut(&child) {
            data.parent = Some(parent);
        }
        if let Some(data) = arena.nodes.get_mut(&parent) {
            let position = data
                .children
                .iter()
                .position(|c| *c == reference)
                .unwrap_or(data.children.len());
            data.children.insert(position, child);
        }
        Ok(())
    }

    fn clear_children(&self, node: NodeId) {
        let mut arena = self.arena.write();
        let children = match arena.nodes.get_mut(&node) {
            Some(data) => std::mem::take(&mut data.children),
            None => return,
        };
        for child in children {
            arena.drop_subtree(child);
        }
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.arena
            .read()
            .nodes
            .get(&node)
            .map(|n| n.rect)
            .unwrap_or_default()
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.arena
            .read()
            .nodes
            .get(&node)
            .map(|n| n.offset_height.unwrap_or(n.rect.height))
            .unwrap_or(0.0)
    }

    fn is_image_complete(&self, node: NodeId) -> bool {
        self.arena
            .read()
            .nodes
            .get(&node)
            .is_some_and(|n| n.complete)
    }
}

// ============================================================================
// ElementSpec
// ============================================================================

/// Declarative description of an element subtree.
///
/// Consumed by [`MemoryDom::build`].
#[derive(Debug, Clone)]
pub struct ElementSpec {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    rect: Rect,
    complete: bool,
    children: Vec<ElementSpec>,
}

impl ElementSpec {
    /// Starts an element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            text: String::new(),
            rect: Rect::default(),
            complete: true,
            children: Vec::new(),
        }
    }

    /// Sets the `id` attribute.
    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Adds a class.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        match self.attributes.iter_mut().find(|(key, _)| key == "class") {
            Some(entry) => {
                entry.1.push(' ');
                entry.1.push_str(class);
            }
            None => self.attributes.push(("class".into(), class.into())),
        }
        self
    }

    /// Sets an attribute.
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.attributes.push((name.into(), value.into())),
        }
        self
    }

    /// Sets the element's own text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets the rendered box.
    #[must_use]
    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Marks an image as still loading.
    #[must_use]
    pub fn pending(mut self) -> Self {
        self.complete = false;
        self
    }

    /// Appends a child.
    #[must_use]
    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
