//! Tolerant line-oriented pseudo-lexer for C sources.
//!
//! The scanner never fails: unbalanced braces, unterminated comments and
//! odd formatting only degrade the precision of the facts derived later.

use crate::patterns::{is_isr_name, CPatterns};

/// Kind of function body a line sits in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FunctionKind {
    /// File scope or a non-function block.
    #[default]
    None,
    /// Body of an ordinary function.
    Ordinary,
    /// Body of an interrupt service routine.
    Isr,
}

/// Scanner state at a line boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeContext {
    /// Inside an unterminated `/* ... */`.
    pub in_block_comment: bool,
    /// Brace depth, never negative.
    pub depth: usize,
    /// Enclosing function body kind.
    pub function: FunctionKind,
}

/// One physical line after scanning.
#[derive(Debug, Clone)]
pub struct ScannedLine<'t> {
    /// 1-based line number.
    pub number: usize,
    /// The line as written.
    pub raw: &'t str,
    /// The line with comments removed and trailing whitespace trimmed.
    pub code: String,
    /// State before the line.
    pub start: ScopeContext,
    /// State after the line.
    pub end: ScopeContext,
    /// Index into [`ScannedFile::functions`] if the line belongs to a
    /// function definition (header through closing brace).
    pub function: Option<usize>,
}

/// A function definition found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpan {
    /// Function name.
    pub name: String,
    /// Ordinary or ISR.
    pub kind: FunctionKind,
    /// Line of the definition header.
    pub header_line: usize,
    /// Line of the closing brace.
    pub end_line: usize,
    /// Byte offset in the header line's code where the body starts.
    pub body_offset: usize,
}

/// Scanner output for a whole file.
#[derive(Debug, Clone, Default)]
pub struct ScannedFile<'t> {
    /// One entry per physical line.
    pub lines: Vec<ScannedLine<'t>>,
    /// Function definitions in source order.
    pub functions: Vec<FunctionSpan>,
}

impl ScannedFile<'_> {
    /// Returns the function span a line belongs to.
    #[must_use]
    pub fn function_of(&self, line: &ScannedLine<'_>) -> Option<&FunctionSpan> {
        line.function.and_then(|idx| self.functions.get(idx))
    }
}

struct OpenFunction {
    index: usize,
    entry_depth: usize,
    saw_brace: bool,
}

/// Splits C text into lines and tracks comment, brace and function state.
pub struct LineScanner<'p> {
    patterns: &'p CPatterns,
}

impl<'p> LineScanner<'p> {
    /// Creates a scanner using the given compiled patterns.
    #[must_use]
    pub const fn new(patterns: &'p CPatterns) -> Self {
        Self { patterns }
    }

    /// Scans a whole file. State starts fresh for every call.
    #[must_use]
    pub fn scan<'t>(&self, text: &'t str) -> ScannedFile<'t> {
        let mut lines: Vec<ScannedLine<'t>> = Vec::new();
        let mut functions: Vec<FunctionSpan> = Vec::new();
        let mut ctx = ScopeContext::default();
        let mut linkage = 0usize;
        let mut open: Option<OpenFunction> = None;

        for (idx, raw) in text.lines().enumerate() {
            let number = idx + 1;
            let mut in_block = ctx.in_block_comment;
            let code = strip_comments(raw, &mut in_block);
            let header = self
                .patterns
                .function
                .captures(&code)
                .map(|caps| caps["name"].to_string());

            // A header in column 0 ends a body whose braces never balanced,
            // e.g. one `{` per preprocessor branch.
            let column_zero = code.starts_with(|c: char| !c.is_whitespace());
            if column_zero && header.is_some() && open.as_ref().is_some_and(|f| f.saw_brace) {
                if let Some(f) = open.take() {
                    ctx.depth = f.entry_depth;
                    ctx.function = FunctionKind::None;
                }
            }
            let start = ctx;

            if open.is_none() && ctx.depth == 0 {
                if let Some(name) = header {
                    let kind = if is_isr_name(&name) {
                        FunctionKind::Isr
                    } else {
                        FunctionKind::Ordinary
                    };
                    functions.push(FunctionSpan {
                        name,
                        kind,
                        header_line: number,
                        end_line: number,
                        body_offset: code.len(),
                    });
                    open = Some(OpenFunction {
                        index: functions.len() - 1,
                        entry_depth: ctx.depth,
                        saw_brace: false,
                    });
                }
            }
            let mut function = open.as_ref().map(|f| f.index);

            let linkage_brace = self
                .patterns
                .extern_c_block
                .find(&code)
                .map(|m| m.end() - 1);
            let mut depth = ctx.depth;

            for (pos, ch) in structural_chars(&code) {
                match ch {
                    '{' if Some(pos) == linkage_brace => linkage += 1,
                    '{' => {
                        if let Some(f) = open.as_mut() {
                            if !f.saw_brace {
                                f.saw_brace = true;
                                let span = &mut functions[f.index];
                                if span.header_line == number {
                                    span.body_offset = pos + 1;
                                }
                            }
                        }
                        depth += 1;
                    }
                    '}' if depth == 0 && linkage > 0 => linkage -= 1,
                    '}' => {
                        depth = depth.saturating_sub(1);
                        let closes = open
                            .as_ref()
                            .is_some_and(|f| f.saw_brace && depth == f.entry_depth);
                        if closes {
                            if let Some(f) = open.take() {
                                functions[f.index].end_line = number;
                            }
                        }
                    }
                    ';' if open.as_ref().is_some_and(|f| !f.saw_brace) => {
                        // A prototype, not a definition.
                        if let Some(f) = open.take() {
                            let span = functions.remove(f.index);
                            for line in &mut lines[span.header_line - 1..] {
                                line.function = None;
                                line.start.function = FunctionKind::None;
                                line.end.function = FunctionKind::None;
                            }
                            function = None;
                        }
                    }
                    _ => {}
                }
            }

            // So does a `}` in column 0.
            if code.starts_with('}') && open.as_ref().is_some_and(|f| f.saw_brace) {
                if let Some(f) = open.take() {
                    functions[f.index].end_line = number;
                    depth = f.entry_depth;
                }
            }
            if let Some(f) = &open {
                functions[f.index].end_line = number;
            }
            ctx = ScopeContext {
                in_block_comment: in_block,
                depth,
                function: open
                    .as_ref()
                    .map_or(FunctionKind::None, |f| functions[f.index].kind),
            };

            lines.push(ScannedLine {
                number,
                raw,
                code,
                start,
                end: ctx,
                function,
            });
        }

        ScannedFile { lines, functions }
    }
}

/// Removes `//` and `/* */` comments from one line.
///
/// `in_block` carries block-comment state across lines. Comment markers
/// inside string or character literals are left alone. A removed block
/// comment leaves a single space so tokens on either side stay apart.
#[must_use]
pub fn strip_comments(line: &str, in_block: &mut bool) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if *in_block {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                *in_block = false;
                out.push(' ');
            }
            continue;
        }
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => break,
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                *in_block = true;
            }
            _ => out.push(c),
        }
    }

    out.truncate(out.trim_end().len());
    out
}

/// Positions of `{`, `}` and `;` outside string and character literals.
fn structural_chars(code: &str) -> Vec<(usize, char)> {
    let mut found = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (pos, c) in code.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' | '}' | ';' => found.push((pos, c)),
            _ => {}
        }
    }
    found
}
