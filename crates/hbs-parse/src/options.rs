//! Parser options.

/// Options controlling how templates are parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Block names whose bodies may contain `{{else}}` and `elseif`
    /// continuations (default: `["if"]`)
    pub branch_blocks: Vec<String>,

    /// Report blocks still open at end of input as diagnostics (default: true)
    pub report_unclosed: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            branch_blocks: vec!["if".to_string()],
            report_unclosed: true,
        }
    }
}

impl ParseOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also treat blocks with this name as branch blocks.
    pub fn with_branch_block(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.is_branch_block(&name) {
            self.branch_blocks.push(name);
        }
        self
    }

    /// Set whether unclosed blocks are reported.
    pub fn report_unclosed(mut self, report: bool) -> Self {
        self.report_unclosed = report;
        self
    }

    /// Whether `name` accepts `else`/`elseif` continuations.
    pub fn is_branch_block(&self, name: &str) -> bool {
        self.branch_blocks.iter().any(|b| b == name)
    }
}
