//! Node type tags and their attribute schema.
//!
//! Type names follow mdast (`list`, `listItem`, `inlineCode`, ...), since
//! those are the names selectors are written against.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Node types of the markdown syntax tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    // Document structure
    /// Root document node.
    Root,

    // Block elements
    /// Paragraph containing inline content.
    Paragraph,
    /// ATX or setext heading.
    Heading,
    /// Block quote.
    Blockquote,
    /// Ordered or unordered list.
    List,
    /// Item in a list.
    ListItem,
    /// Fenced or indented code block.
    Code,
    /// Thematic break (`***`, `---`).
    ThematicBreak,
    /// Raw HTML.
    Html,
    /// Display math block.
    Math,
    /// YAML or TOML frontmatter.
    Frontmatter,

    // Inline elements
    /// Plain text.
    Text,
    /// Hard line break.
    Break,
    /// Emphasis (`*a*`, `_a_`).
    Emphasis,
    /// Strong emphasis (`**a**`, `__a__`).
    Strong,
    /// Strikethrough (GFM).
    Delete,
    /// Inline code span.
    InlineCode,
    /// Inline math.
    InlineMath,
    /// Hyperlink.
    Link,
    /// Image.
    Image,

    // Reference elements
    /// Link reference (`[text][id]`).
    LinkReference,
    /// Image reference (`![alt][id]`).
    ImageReference,
    /// Link reference definition.
    Definition,

    // GFM extensions
    /// Table.
    Table,
    /// Table row.
    TableRow,
    /// Table cell.
    TableCell,
    /// Footnote definition.
    FootnoteDefinition,
    /// Footnote reference.
    FootnoteReference,
}

/// The kind of value an attribute holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKind {
    Bool,
    Int,
    Str,
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttrKind::Bool => "boolean",
            AttrKind::Int => "integer",
            AttrKind::Str => "string",
        })
    }
}

/// Error returned when a type name does not name a [`NodeType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNodeType(pub String);

impl fmt::Display for UnknownNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown node type `{}`", self.0)
    }
}

impl std::error::Error for UnknownNodeType {}

impl NodeType {
    /// Every node type, in declaration order.
    pub const ALL: [NodeType; 28] = [
        NodeType::Root,
        NodeType::Paragraph,
        NodeType::Heading,
        NodeType::Blockquote,
        NodeType::List,
        NodeType::ListItem,
        NodeType::Code,
        NodeType::ThematicBreak,
        NodeType::Html,
        NodeType::Math,
        NodeType::Frontmatter,
        NodeType::Text,
        NodeType::Break,
        NodeType::Emphasis,
        NodeType::Strong,
        NodeType::Delete,
        NodeType::InlineCode,
        NodeType::InlineMath,
        NodeType::Link,
        NodeType::Image,
        NodeType::LinkReference,
        NodeType::ImageReference,
        NodeType::Definition,
        NodeType::Table,
        NodeType::TableRow,
        NodeType::TableCell,
        NodeType::FootnoteDefinition,
        NodeType::FootnoteReference,
    ];

    /// Returns the mdast name of this node type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            NodeType::Root => "root",
            NodeType::Paragraph => "paragraph",
            NodeType::Heading => "heading",
            NodeType::Blockquote => "blockquote",
            NodeType::List => "list",
            NodeType::ListItem => "listItem",
            NodeType::Code => "code",
            NodeType::ThematicBreak => "thematicBreak",
            NodeType::Html => "html",
            NodeType::Math => "math",
            NodeType::Frontmatter => "frontmatter",
            NodeType::Text => "text",
            NodeType::Break => "break",
            NodeType::Emphasis => "emphasis",
            NodeType::Strong => "strong",
            NodeType::Delete => "delete",
            NodeType::InlineCode => "inlineCode",
            NodeType::InlineMath => "inlineMath",
            NodeType::Link => "link",
            NodeType::Image => "image",
            NodeType::LinkReference => "linkReference",
            NodeType::ImageReference => "imageReference",
            NodeType::Definition => "definition",
            NodeType::Table => "table",
            NodeType::TableRow => "tableRow",
            NodeType::TableCell => "tableCell",
            NodeType::FootnoteDefinition => "footnoteDefinition",
            NodeType::FootnoteReference => "footnoteReference",
        }
    }

    /// Returns the kind of the named attribute on this node type, or `None`
    /// if nodes of this type never carry it.
    pub fn attribute_kind(&self, name: &str) -> Option<AttrKind> {
        use AttrKind::*;

        match (self, name) {
            (NodeType::List, "ordered" | "spread") => Some(Bool),
            (NodeType::List, "start") => Some(Int),
            (NodeType::ListItem, "checked" | "spread") => Some(Bool),
            (NodeType::Heading, "depth") => Some(Int),
            (NodeType::Code, "lang" | "meta") => Some(Str),
            (NodeType::Link | NodeType::Image, "url" | "title") => Some(Str),
            (NodeType::Definition, "identifier" | "url" | "title" | "label") => Some(Str),
            (
                NodeType::LinkReference
                | NodeType::ImageReference
                | NodeType::FootnoteDefinition
                | NodeType::FootnoteReference,
                "identifier" | "label",
            ) => Some(Str),
            _ => None,
        }
    }

    /// Returns true if nodes of this type can contain children.
    pub const fn is_parent(&self) -> bool {
        !matches!(
            self,
            NodeType::Code
                | NodeType::ThematicBreak
                | NodeType::Html
                | NodeType::Math
                | NodeType::Frontmatter
                | NodeType::Text
                | NodeType::Break
                | NodeType::InlineCode
                | NodeType::InlineMath
                | NodeType::Image
                | NodeType::ImageReference
                | NodeType::Definition
                | NodeType::FootnoteReference
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = UnknownNodeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| UnknownNodeType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for ty in NodeType::ALL {
            assert_eq!(ty.as_str().parse::<NodeType>(), Ok(ty));
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "bulletList".parse::<NodeType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown node type `bulletList`");
    }

    #[test]
    fn test_serde_uses_mdast_names() {
        let json = serde_json::to_string(&NodeType::ListItem).unwrap();
        assert_eq!(json, r#""listItem""#);
    }

    #[rstest]
    #[case(NodeType::List, "ordered", Some(AttrKind::Bool))]
    #[case(NodeType::List, "start", Some(AttrKind::Int))]
    #[case(NodeType::Heading, "depth", Some(AttrKind::Int))]
    #[case(NodeType::Code, "lang", Some(AttrKind::Str))]
    #[case(NodeType::ListItem, "ordered", None)]
    #[case(NodeType::Paragraph, "depth", None)]
    fn test_attribute_schema(
        #[case] ty: NodeType,
        #[case] name: &str,
        #[case] expected: Option<AttrKind>,
    ) {
        assert_eq!(ty.attribute_kind(name), expected);
    }

    #[test]
    fn test_is_parent() {
        assert!(NodeType::List.is_parent());
        assert!(NodeType::Emphasis.is_parent());
        assert!(!NodeType::Code.is_parent());
        assert!(!NodeType::InlineCode.is_parent());
    }
}
