//! Mutable XML document tree.
//!
//! Documents are parsed with quick-xml into an arena of element nodes. Each
//! element keeps its qualified name, its attributes in document order, the
//! text that immediately follows its start tag (`text`) and the text that
//! follows its end tag (`tail`). That split mirrors how token-level markup is
//! usually mixed with whitespace and lets the merge pass clear and re-insert
//! elements without disturbing surrounding text.
//!
//! Namespace handling is deliberately shallow: qualified names are stored as
//! written and queries match on the local part, which is what the TEI and
//! corpus formats handled here need.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::errors::DocumentError;

/// Index of a node inside the document arena.
pub type NodeId = usize;

/// A single element node.
#[derive(Debug, Clone)]
pub struct XmlNode {
    /// Qualified name as written in the source, e.g. `tei:w` or `w`
    name: String,
    /// Attributes in document order, keys as written
    attributes: Vec<(String, String)>,
    /// Text between the start tag and the first child
    text: Option<String>,
    /// Text between this element's end tag and the next sibling
    tail: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl XmlNode {
    fn new(name: String) -> Self {
        XmlNode {
            name,
            attributes: Vec::new(),
            text: None,
            tail: None,
            children: Vec::new(),
            parent: None,
        }
    }
}

/// Matches elements by local name. The query surface the readers need from
/// an XPath-like selector: one element test against a small set of names.
#[derive(Debug, Clone)]
pub struct Selector {
    names: Vec<String>,
}

impl Selector {
    /// Create a selector matching any of the given local names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selector {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether a local name matches this selector
    pub fn matches(&self, local_name: &str) -> bool {
        self.names.iter().any(|n| n == local_name)
    }
}

/// A mutable XML document backed by a node arena.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<XmlNode>,
    root: NodeId,
}

impl XmlDocument {
    /// Parse a document from a string
    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(xml);
        let mut nodes: Vec<XmlNode> = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut root: Option<NodeId> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let id = Self::push_element(&mut nodes, &mut stack, &mut root, &start)?;
                    stack.push(id);
                }
                Event::Empty(start) => {
                    Self::push_element(&mut nodes, &mut stack, &mut root, &start)?;
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(text) => {
                    let unescaped = text.unescape()?.into_owned();
                    Self::push_text(&mut nodes, &stack, unescaped);
                }
                Event::CData(data) => {
                    let raw = String::from_utf8_lossy(data.as_ref()).into_owned();
                    Self::push_text(&mut nodes, &stack, raw);
                }
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        let root = root.ok_or(DocumentError::NoRoot)?;
        Ok(XmlDocument { nodes, root })
    }

    fn push_element(
        nodes: &mut Vec<XmlNode>,
        stack: &mut [NodeId],
        root: &mut Option<NodeId>,
        start: &BytesStart<'_>,
    ) -> Result<NodeId, DocumentError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut node = XmlNode::new(name);
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            node.attributes.push((key, value));
        }

        let id = nodes.len();
        if let Some(&parent) = stack.last() {
            node.parent = Some(parent);
            nodes.push(node);
            nodes[parent].children.push(id);
        } else {
            nodes.push(node);
            if root.is_none() {
                *root = Some(id);
            }
        }
        Ok(id)
    }

    fn push_text(nodes: &mut [XmlNode], stack: &[NodeId], content: String) {
        let Some(&current) = stack.last() else {
            // Whitespace around the root element carries no information
            return;
        };
        let slot = match nodes[current].children.last() {
            Some(&last_child) => &mut nodes[last_child].tail,
            None => &mut nodes[current].text,
        };
        match slot {
            Some(existing) => existing.push_str(&content),
            None => *slot = Some(content),
        }
    }

    /// The root element
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Qualified name of a node as written in the source
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id].name
    }

    /// Local part of a node's name
    pub fn local_name(&self, id: NodeId) -> &str {
        let name = &self.nodes[id].name;
        match name.rsplit_once(':') {
            Some((_, local)) => local,
            None => name,
        }
    }

    /// Attribute value by exact key, e.g. `xml:id`
    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.nodes[id]
            .attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value or appending a new one
    pub fn set_attr(&mut self, id: NodeId, key: &str, value: &str) {
        let attrs = &mut self.nodes[id].attributes;
        match attrs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value.to_string(),
            None => attrs.push((key.to_string(), value.to_string())),
        }
    }

    /// Text immediately inside the element, before the first child
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes[id].text.as_deref()
    }

    /// Child element ids in document order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Parent element, if any
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// The next element sibling, if any
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes[id].parent?;
        let siblings = &self.nodes[parent].children;
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// Position of a node among its parent's element children
    pub fn child_index(&self, parent: NodeId, id: NodeId) -> Option<usize> {
        self.nodes[parent].children.iter().position(|&c| c == id)
    }

    /// Create a detached element with the given name
    pub fn new_element(&mut self, name: &str) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(XmlNode::new(name.to_string()));
        id
    }

    /// Append a detached node as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Insert a detached node among `parent`'s children at `position`
    pub fn insert_child(&mut self, parent: NodeId, position: usize, child: NodeId) {
        self.nodes[child].parent = Some(parent);
        let children = &mut self.nodes[parent].children;
        let position = position.min(children.len());
        children.insert(position, child);
    }

    /// Deep-copy a subtree, returning a detached copy of `id`
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let copy = XmlNode {
            name: self.nodes[id].name.clone(),
            attributes: self.nodes[id].attributes.clone(),
            text: self.nodes[id].text.clone(),
            tail: self.nodes[id].tail.clone(),
            children: Vec::new(),
            parent: None,
        };
        let copy_id = self.nodes.len();
        self.nodes.push(copy);
        let children = self.nodes[id].children.clone();
        for child in children {
            let child_copy = self.deep_copy(child);
            self.append_child(copy_id, child_copy);
        }
        copy_id
    }

    /// Remove all content from a node, keeping only its name. The node stays
    /// in place among its siblings; detached former children become orphans
    /// in the arena and are never serialized.
    pub fn clear(&mut self, id: NodeId) {
        let node = &mut self.nodes[id];
        node.attributes.clear();
        node.text = None;
        node.tail = None;
        node.children.clear();
    }

    /// All descendant element ids of `id` in document order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        self.collect_descendants(id, &mut result);
        result
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[id].children {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// Descendants of `id` whose local name matches the selector, document order
    pub fn select(&self, id: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&d| selector.matches(self.local_name(d)))
            .collect()
    }

    /// First descendant of `id` with the given local name
    pub fn find_first(&self, id: NodeId, local_name: &str) -> Option<NodeId> {
        self.descendants(id)
            .into_iter()
            .find(|&d| self.local_name(d) == local_name)
    }

    /// First descendant of `id` with the given local name carrying
    /// `attribute == value`
    pub fn find_by_attr(
        &self,
        id: NodeId,
        local_name: &str,
        attribute: &str,
        value: &str,
    ) -> Option<NodeId> {
        self.descendants(id).into_iter().find(|&d| {
            self.local_name(d) == local_name && self.attr(d, attribute) == Some(value)
        })
    }

    /// All text content under `id`: its own text plus, per child, the child's
    /// recursive text and its tail. The tail of `id` itself is excluded.
    pub fn collect_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text_into(id, &mut out);
        out
    }

    fn collect_text_into(&self, id: NodeId, out: &mut String) {
        if let Some(text) = &self.nodes[id].text {
            out.push_str(text);
        }
        for &child in &self.nodes[id].children {
            self.collect_text_into(child, out);
            if let Some(tail) = &self.nodes[child].tail {
                out.push_str(tail);
            }
        }
    }

    /// Serialize the document back to an XML string
    pub fn to_xml(&self) -> Result<String, DocumentError> {
        let mut writer = Writer::new(Vec::new());
        self.write_node(&mut writer, self.root)?;
        let bytes = writer.into_inner();
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> std::io::Result<()> {
        let node = &self.nodes[id];
        let mut start = BytesStart::new(node.name.as_str());
        for (key, value) in &node.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if node.children.is_empty() && node.text.is_none() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = &node.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for &child in &node.children {
            self.write_node(writer, child)?;
            if let Some(tail) = &self.nodes[child].tail {
                writer.write_event(Event::Text(BytesText::new(tail)))?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new(node.name.as_str())))?;
        Ok(())
    }
}
