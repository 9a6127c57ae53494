//! Node definition.
//!
//! The tree node every rule reads, allocated in an [`AstArena`](crate::AstArena).

use std::fmt;

use serde::Serialize;

use crate::{NodeType, Span};

/// A node in the markdown syntax tree.
///
/// The `'a` lifetime ties the node to its arena, so child slices and
/// borrowed strings stay valid for as long as the arena does.
///
/// ```rust
/// use mdstyle_ast::{AstArena, AttrValue, Node, NodeData, NodeType, Span};
///
/// let arena = AstArena::new();
/// let item = Node::new_parent(NodeType::ListItem, Span::new(0, 3), &[]);
/// let children = arena.alloc_slice_copy(&[item]);
/// let list = Node::new_parent(NodeType::List, Span::new(0, 3), children)
///     .with_data(NodeData::list(false, None, false));
///
/// assert_eq!(list.attribute("ordered"), Some(AttrValue::Bool(false)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    /// The type of this node.
    pub node_type: NodeType,

    /// Byte span in the source text.
    pub span: Span,

    /// Child nodes, in source order.
    pub children: &'a [Node<'a>],

    /// Literal value for leaf nodes (`text`, `code`, `inlineCode`, `html`).
    pub value: Option<&'a str>,

    /// Typed attributes.
    pub data: NodeData<'a>,
}

/// Typed per-type attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeData<'a> {
    #[default]
    None,
    Heading {
        depth: u8,
    },
    List {
        ordered: bool,
        start: Option<u32>,
        spread: bool,
    },
    ListItem {
        checked: Option<bool>,
        spread: bool,
    },
    Code {
        lang: Option<&'a str>,
        meta: Option<&'a str>,
    },
    Link {
        url: &'a str,
        title: Option<&'a str>,
    },
    Reference {
        identifier: &'a str,
        label: Option<&'a str>,
    },
    Definition {
        identifier: &'a str,
        url: &'a str,
        title: Option<&'a str>,
        label: Option<&'a str>,
    },
}

/// A runtime attribute value, compared against selector literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum AttrValue<'a> {
    Bool(bool),
    Int(i64),
    Str(&'a str),
}

impl fmt::Display for AttrValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Int(n) => write!(f, "{n}"),
            AttrValue::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl<'a> Node<'a> {
    /// Creates a parent node with children.
    #[inline]
    pub const fn new_parent(node_type: NodeType, span: Span, children: &'a [Node<'a>]) -> Self {
        Self {
            node_type,
            span,
            children,
            value: None,
            data: NodeData::None,
        }
    }

    /// Creates a leaf node carrying a literal value.
    #[inline]
    pub const fn new_text(node_type: NodeType, span: Span, value: &'a str) -> Self {
        Self {
            node_type,
            span,
            children: &[],
            value: Some(value),
            data: NodeData::None,
        }
    }

    /// Creates a leaf node (no children, no value).
    #[inline]
    pub const fn new_leaf(node_type: NodeType, span: Span) -> Self {
        Self {
            node_type,
            span,
            children: &[],
            value: None,
            data: NodeData::None,
        }
    }

    /// Replaces the node's attributes.
    #[inline]
    pub const fn with_data(mut self, data: NodeData<'a>) -> Self {
        self.data = data;
        self
    }

    /// Returns true if this node has children.
    #[inline]
    pub const fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Looks up an attribute by name.
    ///
    /// Returns `None` both for attributes this node type never carries and
    /// for optional attributes that are absent (e.g. a code block without
    /// a language).
    pub fn attribute(&self, name: &str) -> Option<AttrValue<'a>> {
        match (self.data, name) {
            (NodeData::Heading { depth }, "depth") => Some(AttrValue::Int(i64::from(depth))),
            (NodeData::List { ordered, .. }, "ordered") => Some(AttrValue::Bool(ordered)),
            (NodeData::List { start, .. }, "start") => start.map(|n| AttrValue::Int(i64::from(n))),
            (NodeData::List { spread, .. } | NodeData::ListItem { spread, .. }, "spread") => {
                Some(AttrValue::Bool(spread))
            }
            (NodeData::ListItem { checked, .. }, "checked") => checked.map(AttrValue::Bool),
            (NodeData::Code { lang, .. }, "lang") => lang.map(AttrValue::Str),
            (NodeData::Code { meta, .. }, "meta") => meta.map(AttrValue::Str),
            (NodeData::Link { url, .. } | NodeData::Definition { url, .. }, "url") => {
                Some(AttrValue::Str(url))
            }
            (NodeData::Link { title, .. } | NodeData::Definition { title, .. }, "title") => {
                title.map(AttrValue::Str)
            }
            (
                NodeData::Reference { identifier, .. } | NodeData::Definition { identifier, .. },
                "identifier",
            ) => Some(AttrValue::Str(identifier)),
            (NodeData::Reference { label, .. } | NodeData::Definition { label, .. }, "label") => {
                label.map(AttrValue::Str)
            }
            _ => None,
        }
    }

    /// Returns the fenced-code language, if any.
    #[inline]
    pub fn lang(&self) -> Option<&'a str> {
        match self.data {
            NodeData::Code { lang, .. } => lang,
            _ => None,
        }
    }

    /// Returns true for `list` nodes with `ordered = false`.
    #[inline]
    pub fn is_unordered_list(&self) -> bool {
        matches!(self.data, NodeData::List { ordered: false, .. })
    }
}

impl<'a> NodeData<'a> {
    /// Attributes of a heading.
    #[inline]
    pub const fn heading(depth: u8) -> Self {
        Self::Heading { depth }
    }

    /// Attributes of a list.
    #[inline]
    pub const fn list(ordered: bool, start: Option<u32>, spread: bool) -> Self {
        Self::List {
            ordered,
            start,
            spread,
        }
    }

    /// Attributes of a code block.
    #[inline]
    pub const fn code(lang: Option<&'a str>, meta: Option<&'a str>) -> Self {
        Self::Code { lang, meta }
    }

    /// Attributes of a link or image.
    #[inline]
    pub const fn link(url: &'a str, title: Option<&'a str>) -> Self {
        Self::Link { url, title }
    }
}

impl Serialize for Node<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.node_type)?;
        map.serialize_entry("range", &[self.span.start, self.span.end])?;

        for name in ATTRIBUTE_NAMES {
            if let Some(value) = self.attribute(name) {
                map.serialize_entry(name, &value)?;
            }
        }
        if let Some(value) = self.value {
            map.serialize_entry("value", value)?;
        }
        if self.node_type.is_parent() {
            map.serialize_entry("children", self.children)?;
        }

        map.end()
    }
}

const ATTRIBUTE_NAMES: [&str; 11] = [
    "depth",
    "ordered",
    "start",
    "spread",
    "checked",
    "lang",
    "meta",
    "identifier",
    "label",
    "url",
    "title",
];
