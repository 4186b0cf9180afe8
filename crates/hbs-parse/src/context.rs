//! The open-block stack.

use hbs_tokenizer::Location;
use hbs_tree::{Block, BlockKind, Node, Span};
use tracing::debug;

use crate::{Diagnostic, DiagnosticKind, ParseError};

/// Owns the blocks being filled while a template is parsed.
///
/// The stack is the path from the root text block to the block currently
/// receiving children. A block is attached to its parent when it is popped,
/// so finished blocks never point back up the tree.
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    stack: Vec<Block>,
    diagnostics: Vec<Diagnostic>,
}

impl ParseContext {
    /// Create an empty, uninitialized context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a root block exists.
    pub fn is_initialized(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Open the root text block.
    pub fn begin(&mut self) -> Result<(), ParseError> {
        if self.is_initialized() {
            return Err(ParseError::InvalidState { operation: "begin" });
        }
        self.stack.push(Block::new(BlockKind::Text));
        Ok(())
    }

    /// Number of open blocks, root included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Open a child of the current block. Returns the stack index of the new
    /// block, to be handed to [`release`](Self::release).
    pub fn start_block(&mut self, kind: BlockKind) -> Result<usize, ParseError> {
        if !self.is_initialized() {
            return Err(ParseError::InvalidState {
                operation: "start_block",
            });
        }
        debug!(?kind, depth = self.stack.len(), "open block");
        self.stack.push(Block::new(kind));
        Ok(self.stack.len() - 1)
    }

    /// The block currently receiving children.
    pub fn current_block(&mut self) -> Result<&mut Block, ParseError> {
        self.stack.last_mut().ok_or(ParseError::InvalidState {
            operation: "current_block",
        })
    }

    /// Name of the current block, empty when there is none.
    pub fn current_name(&self) -> String {
        self.stack
            .last()
            .map(|b| b.name.clone())
            .unwrap_or_default()
    }

    /// Whether only the root block is open.
    pub fn is_at_root(&self) -> bool {
        self.stack.len() <= 1
    }

    /// Append a span to the current block.
    pub fn push_span(&mut self, span: Span) -> Result<(), ParseError> {
        self.current_block()?.push(span);
        Ok(())
    }

    /// Pop the current block and attach it to its parent.
    pub fn end_block(&mut self) -> Result<(), ParseError> {
        if self.stack.len() < 2 {
            return Err(ParseError::InvalidState {
                operation: "end_block",
            });
        }
        if let Some(block) = self.stack.pop() {
            debug!(kind = ?block.kind, name = %block.name, "close block");
            self.current_block()?.push(block);
        }
        Ok(())
    }

    /// Close every block opened at or above `index`.
    ///
    /// Does nothing if those blocks were already closed or merged away.
    pub fn release(&mut self, index: usize) -> Result<(), ParseError> {
        while self.stack.len() > index {
            self.end_block()?;
        }
        Ok(())
    }

    /// Move the current block's children onto the end of its parent and drop
    /// the current block. The parent becomes current again.
    pub fn merge_current_with_parent(&mut self) -> Result<(), ParseError> {
        if self.stack.len() < 2 {
            return Err(ParseError::InvalidState {
                operation: "merge_current_with_parent",
            });
        }
        if let Some(mut block) = self.stack.pop() {
            let parent = self.current_block()?;
            debug!(into = %parent.name, children = block.children.len(), "merge block");
            parent.children.append(&mut block.children);
        }
        Ok(())
    }

    /// Record a recoverable problem.
    pub fn on_error(&mut self, location: Location, kind: DiagnosticKind) {
        let diagnostic = Diagnostic::new(kind, location);
        debug!(%diagnostic, "diagnostic");
        self.diagnostics.push(diagnostic);
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Close everything still open and hand out the root block.
    ///
    /// With `report_unclosed`, every tag block still open is reported at
    /// its opening markup.
    pub fn finish(mut self, report_unclosed: bool) -> Result<(Block, Vec<Diagnostic>), ParseError> {
        while self.stack.len() > 1 {
            if report_unclosed
                && let Some(block) = self.stack.last()
                && block.kind == BlockKind::Tag
            {
                let name = block.name.clone();
                let location = block
                    .children
                    .first()
                    .and_then(Node::location)
                    .or_else(|| block.location())
                    .unwrap_or_default();
                self.on_error(location, DiagnosticKind::UnclosedBlock { name });
            }
            self.end_block()?;
        }
        let root = self.stack.pop().ok_or(ParseError::InvalidState {
            operation: "finish",
        })?;
        Ok((root, self.diagnostics))
    }
}
