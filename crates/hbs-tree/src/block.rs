//! Interior nodes.

use std::fmt;

use hbs_tokenizer::Location;

use crate::{Span, SpanKind};

/// What a [`Block`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// The document root.
    Text,
    /// A `{{#name}} ... {{/name}}` pair and its body.
    Tag,
    /// The markup of a single tag, delimiter to delimiter.
    TagElement,
    /// A standalone `{{expression}}` tag.
    Expression,
}

/// A child of a [`Block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A leaf.
    Span(Span),
    /// A nested block.
    Block(Block),
}

impl Node {
    /// Get as a span.
    pub fn as_span(&self) -> Option<&Span> {
        match self {
            Node::Span(span) => Some(span),
            Node::Block(_) => None,
        }
    }

    /// Get as a block.
    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Span(_) => None,
        }
    }

    /// Source range covered by this node, if it holds any text.
    pub fn location(&self) -> Option<Location> {
        match self {
            Node::Span(span) => Some(span.location),
            Node::Block(block) => block.location(),
        }
    }
}

impl From<Span> for Node {
    fn from(span: Span) -> Self {
        Node::Span(span)
    }
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Node::Block(block)
    }
}

/// An interior node owning its children in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// What the block represents.
    pub kind: BlockKind,
    /// Tag or expression name. Empty until known, and for markup blocks.
    pub name: String,
    /// Children in document order.
    pub children: Vec<Node>,
}

impl Block {
    /// Create an unnamed, empty block.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            name: String::new(),
            children: Vec::new(),
        }
    }

    /// Create an empty block with a name.
    pub fn named(kind: BlockKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Whether the block carries the given name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
    }

    /// Append a child.
    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Direct child blocks.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.children.iter().filter_map(Node::as_block)
    }

    /// Direct child spans.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.children.iter().filter_map(Node::as_span)
    }

    /// Direct children holding tag markup.
    pub fn tag_elements(&self) -> impl Iterator<Item = &Block> {
        self.blocks().filter(|b| b.kind == BlockKind::TagElement)
    }

    /// All nodes below this block, depth-first in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// All spans below this block in document order.
    pub fn descendant_spans(&self) -> impl Iterator<Item = &Span> {
        self.descendants().filter_map(Node::as_span)
    }

    /// First block below this one with the given name.
    pub fn find(&self, name: &str) -> Option<&Block> {
        self.descendants()
            .filter_map(Node::as_block)
            .find(|b| b.is_named(name))
    }

    /// The first direct span of the given kind.
    pub fn first_span(&self, kind: SpanKind) -> Option<&Span> {
        self.spans().find(|s| s.kind == kind)
    }

    /// Reassemble the source text this block was parsed from.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for span in self.descendant_spans() {
            out.push_str(&span.content);
        }
        out
    }

    /// Source range covered by the spans below this block.
    pub fn location(&self) -> Option<Location> {
        self.descendant_spans()
            .map(|s| s.location)
            .reduce(|a, b| a.extend(b))
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{:?}", "", self.kind, indent = depth * 2)?;
        if !self.name.is_empty() {
            write!(f, " {:?}", self.name)?;
        }
        for child in &self.children {
            writeln!(f)?;
            match child {
                Node::Span(span) => write!(
                    f,
                    "{:indent$}{:?} {:?}",
                    "",
                    span.kind,
                    span.content,
                    indent = (depth + 1) * 2
                )?,
                Node::Block(block) => block.write_outline(f, depth + 1)?,
            }
        }
        Ok(())
    }
}

/// Dropped iteratively so deeply nested templates cannot overflow the stack.
impl Drop for Block {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let Node::Block(mut block) = node {
                pending.append(&mut block.children);
            }
        }
    }
}

/// Outline view, one node per line, children indented by two spaces.
impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0)
    }
}

/// Depth-first iterator returned by [`Block::descendants`].
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(node) => {
                    if let Node::Block(block) = node {
                        self.stack.push(block.children.iter());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
