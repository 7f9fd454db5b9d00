//! Heuristic symbol extraction from scanned C lines.
//!
//! Each scanned line runs through an ordered list of matchers; the first
//! one that recognizes the line decides what it declares. Annotations are
//! looked up in the raw lines above a declaration.

use crate::config::{MarkPrecedence, ScanConfig};
use crate::patterns::{CPatterns, CALL_KEYWORDS};
use crate::scanner::{FunctionKind, LineScanner, ScopeContext};

/// Linkage of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Declared `static`.
    Static,
    /// External linkage.
    Public,
}

/// ISR-context classification of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsrMark {
    /// `@isr_safe` / `ISR_SAFE`.
    Safe,
    /// `@isr_unsafe` / `ISR_UNSAFE`.
    Unsafe,
}

/// Which traceability tags were seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceTags {
    /// `@req`
    pub req: bool,
    /// `@design`
    pub design: bool,
    /// `@asil`
    pub asil: bool,
}

impl TraceTags {
    /// True when all three tags are present.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.req && self.design && self.asil
    }

    /// Missing tags in canonical order.
    #[must_use]
    pub fn missing(self) -> Vec<&'static str> {
        [
            (self.req, "@req"),
            (self.design, "@design"),
            (self.asil, "@asil"),
        ]
        .into_iter()
        .filter_map(|(present, tag)| (!present).then_some(tag))
        .collect()
    }
}

/// Annotations found above a symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Annotations {
    /// ISR classification, if any marker was found.
    pub isr: Option<IsrMark>,
    /// Traceability tags.
    pub trace: TraceTags,
}

/// What a symbol is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    /// A function header (definition or prototype).
    Function {
        /// `static` or public.
        visibility: Visibility,
        /// Return type as written, without qualifiers.
        return_type: String,
    },
    /// A `typedef` name.
    Type,
    /// An event enumerator.
    EventType,
    /// A function returning `EventHandlerResult`.
    EventHandler,
    /// A file-scope variable.
    GlobalVar {
        /// Declared `const`.
        is_const: bool,
    },
    /// A quoted `#include`; the symbol name is the header path.
    Include,
}

/// A declaration found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Identifier (or header path for includes).
    pub name: String,
    /// Kind and kind-specific data.
    pub kind: SymbolKind,
    /// 1-based declaring line.
    pub line: usize,
    /// Annotations from the lookback windows (functions only).
    pub annotations: Annotations,
}

impl Symbol {
    fn new(name: impl Into<String>, kind: SymbolKind, line: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            line,
            annotations: Annotations::default(),
        }
    }

    /// Returns true for function symbols.
    #[must_use]
    pub const fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function { .. })
    }

    /// Returns true for `static` functions.
    #[must_use]
    pub const fn is_static_function(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Function {
                visibility: Visibility::Static,
                ..
            }
        )
    }
}

/// A call made from inside an ISR body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsrCall {
    /// Line of the call.
    pub line: usize,
    /// Name of the enclosing ISR.
    pub isr: String,
    /// Called identifier.
    pub callee: String,
}

/// Everything the rules need to know about one file.
#[derive(Debug, Clone, Default)]
pub struct FileFacts {
    /// Declarations in source order.
    pub symbols: Vec<Symbol>,
    /// Lines calling the domain event publish function.
    pub publish_calls: Vec<usize>,
    /// Calls made inside ISR bodies.
    pub isr_calls: Vec<IsrCall>,
    /// Traceability tags in the file header.
    pub header_tags: TraceTags,
    /// Number of physical lines.
    pub line_count: usize,
}

impl FileFacts {
    /// Function symbols in source order.
    pub fn functions(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| s.is_function())
    }

    /// Symbols of a kind matched by `pred`.
    pub fn symbols_where<'a>(
        &'a self,
        pred: impl Fn(&SymbolKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Symbol> + 'a {
        self.symbols.iter().filter(move |s| pred(&s.kind))
    }
}

/// A function header recognized on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    /// Function name.
    pub name: String,
    /// `static` or public.
    pub visibility: Visibility,
    /// Return type.
    pub return_type: String,
}

/// A file-scope variable recognized on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalDecl {
    /// Variable name.
    pub name: String,
    /// Declared `const`.
    pub is_const: bool,
}

/// What a single line declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMatch {
    /// Nothing recognized.
    NoMatch,
    /// `#include "path"`.
    Include(String),
    /// A typedef name.
    Type(String),
    /// A function header.
    Function(FunctionDecl),
    /// An event enumerator.
    EventType(String),
    /// A file-scope variable.
    GlobalVar(GlobalDecl),
}

type Matcher = fn(&CPatterns, &str, ScopeContext, ScopeContext) -> LineMatch;

/// Matchers in evaluation order. The first non-`NoMatch` result wins.
const MATCHERS: [(&str, Matcher); 5] = [
    ("include", match_include),
    ("type", match_type),
    ("function", match_function),
    ("event-type", match_event_type),
    ("global-var", match_global_var),
];

/// Names of the line matchers in the order they are tried.
#[must_use]
pub fn matcher_order() -> Vec<&'static str> {
    MATCHERS.iter().map(|(name, _)| *name).collect()
}

fn match_include(p: &CPatterns, code: &str, _: ScopeContext, _: ScopeContext) -> LineMatch {
    p.include
        .captures(code)
        .map_or(LineMatch::NoMatch, |c| LineMatch::Include(c[1].to_string()))
}

fn match_type(p: &CPatterns, code: &str, _: ScopeContext, _: ScopeContext) -> LineMatch {
    [&p.typedef_aggregate, &p.typedef_simple, &p.typedef_fn_pointer]
        .into_iter()
        .find_map(|re| re.captures(code))
        .map_or(LineMatch::NoMatch, |c| LineMatch::Type(c[1].to_string()))
}

fn match_function(p: &CPatterns, code: &str, start: ScopeContext, _: ScopeContext) -> LineMatch {
    if start.depth != 0 || start.function != FunctionKind::None {
        return LineMatch::NoMatch;
    }
    p.function
        .captures(code)
        .map_or(LineMatch::NoMatch, |c| {
            LineMatch::Function(FunctionDecl {
                name: c["name"].to_string(),
                visibility: if c.name("static").is_some() {
                    Visibility::Static
                } else {
                    Visibility::Public
                },
                return_type: c["ret"].to_string(),
            })
        })
}

fn match_event_type(p: &CPatterns, code: &str, _: ScopeContext, _: ScopeContext) -> LineMatch {
    p.event_type
        .captures(code)
        .map_or(LineMatch::NoMatch, |c| LineMatch::EventType(c[1].to_string()))
}

fn match_global_var(p: &CPatterns, code: &str, start: ScopeContext, end: ScopeContext) -> LineMatch {
    if start.depth != 0 || end.depth != 0 || start.function != FunctionKind::None {
        return LineMatch::NoMatch;
    }
    let stmt = code.trim();
    if stmt.starts_with('#')
        || stmt.starts_with("typedef")
        || stmt.starts_with("extern")
        || stmt.contains('(')
        || !stmt.ends_with(';')
    {
        return LineMatch::NoMatch;
    }
    let Some(caps) = p.global_var.captures(stmt) else {
        return LineMatch::NoMatch;
    };
    let head = caps["head"].trim();
    // `struct Foo;` declares a tag, not a variable.
    if matches!(head, "struct" | "union" | "enum") {
        return LineMatch::NoMatch;
    }
    LineMatch::GlobalVar(GlobalDecl {
        name: caps["name"].to_string(),
        is_const: head.split_whitespace().any(|tok| tok == "const"),
    })
}

/// Turns C text into [`FileFacts`].
pub struct SymbolExtractor {
    patterns: CPatterns,
    config: ScanConfig,
}

impl Default for SymbolExtractor {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl SymbolExtractor {
    /// Creates an extractor with the given lookback settings.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self {
            patterns: CPatterns::new(),
            config,
        }
    }

    /// Classifies one comment-stripped line given its scope state.
    #[must_use]
    pub fn classify_line(&self, code: &str, start: ScopeContext, end: ScopeContext) -> LineMatch {
        MATCHERS
            .iter()
            .map(|(_, matcher)| matcher(&self.patterns, code, start, end))
            .find(|m| *m != LineMatch::NoMatch)
            .unwrap_or(LineMatch::NoMatch)
    }

    /// Extracts all facts from a file's text.
    #[must_use]
    pub fn extract(&self, text: &str) -> FileFacts {
        let scanned = LineScanner::new(&self.patterns).scan(text);
        let raw: Vec<&str> = scanned.lines.iter().map(|l| l.raw).collect();
        let mut facts = FileFacts {
            line_count: scanned.lines.len(),
            header_tags: self.trace_tags(&raw[..raw.len().min(self.config.header_lines)]),
            ..FileFacts::default()
        };
        let mut pending_typedef: Option<usize> = None;

        for (idx, line) in scanned.lines.iter().enumerate() {
            let code = line.code.as_str();

            match self.classify_line(code, line.start, line.end) {
                LineMatch::NoMatch => {
                    if self.patterns.typedef_open.is_match(code) {
                        pending_typedef = Some(line.number);
                    }
                }
                LineMatch::Include(path) => {
                    facts.symbols.push(Symbol::new(path, SymbolKind::Include, line.number));
                }
                LineMatch::Type(name) => {
                    facts.symbols.push(Symbol::new(name, SymbolKind::Type, line.number));
                }
                LineMatch::EventType(name) => {
                    facts
                        .symbols
                        .push(Symbol::new(name, SymbolKind::EventType, line.number));
                }
                LineMatch::GlobalVar(decl) => {
                    facts.symbols.push(Symbol::new(
                        decl.name,
                        SymbolKind::GlobalVar {
                            is_const: decl.is_const,
                        },
                        line.number,
                    ));
                }
                LineMatch::Function(decl) => {
                    let annotations = Annotations {
                        isr: self.isr_mark(&raw, idx),
                        trace: self.trace_tags(&raw[idx.saturating_sub(self.config.trace_lookback)..idx]),
                    };
                    let is_handler = decl.return_type == "EventHandlerResult";
                    let mut symbol = Symbol::new(
                        decl.name.clone(),
                        SymbolKind::Function {
                            visibility: decl.visibility,
                            return_type: decl.return_type,
                        },
                        line.number,
                    );
                    symbol.annotations = annotations;
                    facts.symbols.push(symbol);
                    if is_handler {
                        facts
                            .symbols
                            .push(Symbol::new(decl.name, SymbolKind::EventHandler, line.number));
                    }
                }
            }

            if let Some(typedef_line) = pending_typedef {
                if line.end.depth == 0 && line.number != typedef_line {
                    if let Some(caps) = self.patterns.typedef_close.captures(code) {
                        let name = &caps[1];
                        if name.starts_with(|c: char| c.is_ascii_uppercase()) {
                            facts
                                .symbols
                                .push(Symbol::new(name, SymbolKind::Type, typedef_line));
                        }
                    }
                    pending_typedef = None;
                }
            }

            if self.patterns.publish_call.is_match(code) {
                facts.publish_calls.push(line.number);
            }

            if let Some(span) = scanned.function_of(line) {
                if span.kind == FunctionKind::Isr {
                    let body = if line.number == span.header_line {
                        code.get(span.body_offset..).unwrap_or("")
                    } else {
                        code
                    };
                    for caps in self.patterns.call.captures_iter(body) {
                        let callee = &caps[1];
                        if CALL_KEYWORDS.contains(&callee) {
                            continue;
                        }
                        facts.isr_calls.push(IsrCall {
                            line: line.number,
                            isr: span.name.clone(),
                            callee: callee.to_string(),
                        });
                    }
                }
            }
        }

        // Keep declaration order stable for symbols reported at an earlier line.
        facts.symbols.sort_by_key(|s| s.line);
        facts
    }

    fn isr_mark(&self, raw: &[&str], idx: usize) -> Option<IsrMark> {
        let window = &raw[idx.saturating_sub(self.config.isr_lookback)..idx];
        let mark = |line: &&str| {
            if self.patterns.isr_safe.is_match(line) {
                Some(IsrMark::Safe)
            } else if self.patterns.isr_unsafe.is_match(line) {
                Some(IsrMark::Unsafe)
            } else {
                None
            }
        };
        match self.config.isr_mark_precedence {
            MarkPrecedence::Farthest => window.iter().find_map(mark),
            MarkPrecedence::Nearest => window.iter().rev().find_map(mark),
        }
    }

    fn trace_tags(&self, window: &[&str]) -> TraceTags {
        let mut tags = TraceTags::default();
        for line in window {
            for caps in self.patterns.trace_tag.captures_iter(line) {
                match &caps[1] {
                    "req" => tags.req = true,
                    "design" => tags.design = true,
                    _ => tags.asil = true,
                }
            }
        }
        tags
    }
}
