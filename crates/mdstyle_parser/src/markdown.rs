//! Markdown parser using markdown-rs (wooorm/markdown-rs).
//!
//! markdown-rs produces mdast with byte offsets, which map one-to-one onto
//! our node spans.

use markdown::mdast;
use markdown::{Constructs, ParseOptions, to_mdast};
use mdstyle_ast::{AstArena, Node, NodeData, NodeType, Span};
use tracing::trace;

use crate::{ParseError, Parser};

/// CommonMark + GFM parser.
///
/// Only the enabled constructs are stored: `ParseOptions` can hold MDX
/// callbacks that are not `Sync`, so options are built per parse.
#[derive(Debug, Clone)]
pub struct MarkdownParser {
    constructs: Constructs,
}

impl MarkdownParser {
    /// Creates a parser with GFM enabled.
    pub fn new() -> Self {
        Self {
            constructs: Constructs::gfm(),
        }
    }

    /// Creates a parser with an explicit set of markdown-rs constructs.
    pub fn with_constructs(constructs: Constructs) -> Self {
        Self { constructs }
    }

    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            constructs: self.constructs.clone(),
            ..ParseOptions::default()
        }
    }

    fn convert<'a>(&self, arena: &'a AstArena, node: &mdast::Node) -> Node<'a> {
        use mdast::Node as M;

        let span = node_span(node);

        match node {
            M::Root(n) => self.parent(arena, NodeType::Root, span, &n.children),
            M::Paragraph(n) => self.parent(arena, NodeType::Paragraph, span, &n.children),
            M::Heading(n) => self
                .parent(arena, NodeType::Heading, span, &n.children)
                .with_data(NodeData::heading(n.depth)),
            M::Blockquote(n) => self.parent(arena, NodeType::Blockquote, span, &n.children),
            M::List(n) => self
                .parent(arena, NodeType::List, span, &n.children)
                .with_data(NodeData::list(n.ordered, n.start, n.spread)),
            M::ListItem(n) => self
                .parent(arena, NodeType::ListItem, span, &n.children)
                .with_data(NodeData::ListItem {
                    checked: n.checked,
                    spread: n.spread,
                }),
            M::Code(n) => Node::new_text(NodeType::Code, span, arena.alloc_str(&n.value))
                .with_data(NodeData::code(
                    alloc_opt(arena, &n.lang),
                    alloc_opt(arena, &n.meta),
                )),
            M::ThematicBreak(_) => Node::new_leaf(NodeType::ThematicBreak, span),
            M::Html(n) => Node::new_text(NodeType::Html, span, arena.alloc_str(&n.value)),
            M::Math(n) => Node::new_text(NodeType::Math, span, arena.alloc_str(&n.value)),
            M::Yaml(n) => Node::new_text(NodeType::Frontmatter, span, arena.alloc_str(&n.value)),
            M::Toml(n) => Node::new_text(NodeType::Frontmatter, span, arena.alloc_str(&n.value)),

            M::Text(n) => Node::new_text(NodeType::Text, span, arena.alloc_str(&n.value)),
            M::Break(_) => Node::new_leaf(NodeType::Break, span),
            M::Emphasis(n) => self.parent(arena, NodeType::Emphasis, span, &n.children),
            M::Strong(n) => self.parent(arena, NodeType::Strong, span, &n.children),
            M::Delete(n) => self.parent(arena, NodeType::Delete, span, &n.children),
            M::InlineCode(n) => {
                Node::new_text(NodeType::InlineCode, span, arena.alloc_str(&n.value))
            }
            M::InlineMath(n) => {
                Node::new_text(NodeType::InlineMath, span, arena.alloc_str(&n.value))
            }
            M::Link(n) => self
                .parent(arena, NodeType::Link, span, &n.children)
                .with_data(NodeData::link(
                    arena.alloc_str(&n.url),
                    alloc_opt(arena, &n.title),
                )),
            M::Image(n) => Node::new_leaf(NodeType::Image, span).with_data(NodeData::link(
                arena.alloc_str(&n.url),
                alloc_opt(arena, &n.title),
            )),

            M::LinkReference(n) => self
                .parent(arena, NodeType::LinkReference, span, &n.children)
                .with_data(NodeData::Reference {
                    identifier: arena.alloc_str(&n.identifier),
                    label: alloc_opt(arena, &n.label),
                }),
            M::ImageReference(n) => Node::new_leaf(NodeType::ImageReference, span).with_data(
                NodeData::Reference {
                    identifier: arena.alloc_str(&n.identifier),
                    label: alloc_opt(arena, &n.label),
                },
            ),
            M::Definition(n) => {
                Node::new_leaf(NodeType::Definition, span).with_data(NodeData::Definition {
                    identifier: arena.alloc_str(&n.identifier),
                    url: arena.alloc_str(&n.url),
                    title: alloc_opt(arena, &n.title),
                    label: alloc_opt(arena, &n.label),
                })
            }

            M::Table(n) => self.parent(arena, NodeType::Table, span, &n.children),
            M::TableRow(n) => self.parent(arena, NodeType::TableRow, span, &n.children),
            M::TableCell(n) => self.parent(arena, NodeType::TableCell, span, &n.children),
            M::FootnoteDefinition(n) => self
                .parent(arena, NodeType::FootnoteDefinition, span, &n.children)
                .with_data(NodeData::Reference {
                    identifier: arena.alloc_str(&n.identifier),
                    label: alloc_opt(arena, &n.label),
                }),
            M::FootnoteReference(n) => Node::new_leaf(NodeType::FootnoteReference, span)
                .with_data(NodeData::Reference {
                    identifier: arena.alloc_str(&n.identifier),
                    label: alloc_opt(arena, &n.label),
                }),

            // MDX constructs only appear with MDX options; keep them opaque.
            _ => {
                trace!("treating unsupported mdast node as html: {:?}", span);
                Node::new_leaf(NodeType::Html, span)
            }
        }
    }

    fn parent<'a>(
        &self,
        arena: &'a AstArena,
        node_type: NodeType,
        span: Span,
        children: &[mdast::Node],
    ) -> Node<'a> {
        let children =
            arena.alloc_slice_fill_iter(children.iter().map(|child| self.convert(arena, child)));
        Node::new_parent(node_type, span, children)
    }
}

fn node_span(node: &mdast::Node) -> Span {
    node.position()
        .map(|pos| Span::new(pos.start.offset as u32, pos.end.offset as u32))
        .unwrap_or(Span::new(0, 0))
}

fn alloc_opt<'a>(arena: &'a AstArena, value: &Option<String>) -> Option<&'a str> {
    value.as_deref().map(|s| arena.alloc_str(s))
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for MarkdownParser {
    fn name(&self) -> &str {
        "markdown"
    }

    fn extensions(&self) -> &[&str] {
        &["md", "markdown", "mdown", "mkdn", "mkd"]
    }

    fn parse<'a>(&self, arena: &'a AstArena, source: &str) -> Result<Node<'a>, ParseError> {
        if u32::try_from(source.len()).is_err() {
            return Err(ParseError::TooLarge(source.len()));
        }

        let mdast = to_mdast(source, &self.parse_options())
            .map_err(|e| ParseError::invalid_source(e.to_string()))?;

        let mut root = self.convert(arena, &mdast);
        root.span = Span::new(0, source.len() as u32);
        Ok(root)
    }
}
