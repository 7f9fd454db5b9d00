//! Context types for rule execution.

use crate::extractor::FileFacts;
use crate::layer::{self, Layer};
use crate::types::Location;
use std::path::{Path, PathBuf};

/// Context provided to per-file rules.
///
/// Contains metadata about the file being analyzed that rules can use
/// to make context-aware decisions (e.g., skip checks in test files).
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    /// Layer the file belongs to.
    pub layer: Layer,
    /// Whether this file is detected as a test file.
    pub is_test: bool,
    /// Whether this is a `.h` header.
    pub is_header: bool,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path, layer: Layer) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);
        let is_test = Self::detect_test_file(&relative_path);
        let is_header = path.extension().is_some_and(|ext| ext == "h");

        Self {
            path,
            content,
            relative_path,
            layer,
            is_test,
            is_header,
        }
    }

    /// Detects if a file is a test file based on path conventions.
    fn detect_test_file(path: &Path) -> bool {
        // Check path components for test directories
        for component in path.components() {
            if let std::path::Component::Normal(s) = component {
                let s = s.to_string_lossy();
                if s == "tests" || s == "test" {
                    return true;
                }
            }
        }

        // Check file name patterns
        if let Some(stem) = path.file_stem().and_then(|n| n.to_str()) {
            if stem.starts_with("test_") || stem.ends_with("_test") || stem.ends_with("_tests") {
                return true;
            }
        }

        false
    }

    /// Returns true if a directory segment of the relative path equals `segment`.
    #[must_use]
    pub fn has_segment(&self, segment: &str) -> bool {
        layer::has_segment(&self.relative_path, segment)
    }

    /// Calculates byte offset for a given line and column.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-indexed line number
    /// * `column` - 1-indexed column number
    ///
    /// # Returns
    ///
    /// Byte offset from the start of the file, or 0 if out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in self.content.split_inclusive('\n').enumerate() {
            if i + 1 == line {
                return offset + column.saturating_sub(1);
            }
            offset += line_content.len();
        }

        0
    }

    /// Byte offset and length of a line's non-blank text, for labels.
    #[must_use]
    pub fn line_span(&self, line: usize) -> (usize, usize) {
        let Some(text) = self.content.lines().nth(line.saturating_sub(1)) else {
            return (0, 0);
        };
        let indent = text.len() - text.trim_start().len();
        let start = self.offset_for(line, indent + 1);
        (start, text.trim().len())
    }

    /// Builds a location for a whole line, with the span covering its text.
    #[must_use]
    pub fn location(&self, line: usize) -> Location {
        let (offset, length) = self.line_span(line);
        let column = self
            .content
            .lines()
            .nth(line.saturating_sub(1))
            .map_or(1, |text| text.len() - text.trim_start().len() + 1);
        Location::new(self.relative_path.clone(), line, column).with_span(offset, length)
    }
}

/// Per-file facts retained after the parallel pass for project-wide rules.
#[derive(Debug, Clone)]
pub struct AnalyzedFile {
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    /// Extracted facts.
    pub facts: FileFacts,
}

/// Context provided to project-wide rules.
///
/// Contains every classified file of the run with its extracted facts.
#[derive(Debug, Clone)]
pub struct ProjectContext<'a> {
    /// Root directory of the project.
    pub root: &'a Path,
    /// All analyzed files, sorted by path.
    pub files: &'a [AnalyzedFile],
}

impl<'a> ProjectContext<'a> {
    /// Creates a new project context.
    #[must_use]
    pub fn new(root: &'a Path, files: &'a [AnalyzedFile]) -> Self {
        Self { root, files }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(content: &'static str) -> FileContext<'static> {
        FileContext::new(
            Path::new("/repo/src/domain/a.c"),
            content,
            Path::new("/repo"),
            Layer::Domain,
        )
    }

    #[test]
    fn test_detect_test_file() {
        assert!(FileContext::detect_test_file(Path::new("tests/domain/foo.c")));
        assert!(FileContext::detect_test_file(Path::new("src/test/foo.c")));
        assert!(FileContext::detect_test_file(Path::new("src/domain/test_foo.c")));
        assert!(FileContext::detect_test_file(Path::new("src/domain/foo_test.c")));
        assert!(FileContext::detect_test_file(Path::new("src/domain/foo_tests.h")));
        assert!(!FileContext::detect_test_file(Path::new("src/domain/foo.c")));
        assert!(!FileContext::detect_test_file(Path::new("src/domain/latest.c")));
    }

    #[test]
    fn test_relative_path_and_flags() {
        let c = ctx("");
        assert_eq!(c.relative_path, PathBuf::from("src/domain/a.c"));
        assert!(!c.is_header);
        assert!(!c.is_test);
        assert!(c.has_segment("domain"));
        assert!(!c.has_segment("port"));
    }

    #[test]
    fn test_offset_calculation() {
        let c = ctx("line1\r\nline2\nline3");
        assert_eq!(c.offset_for(1, 1), 0);
        assert_eq!(c.offset_for(2, 1), 7);
        assert_eq!(c.offset_for(3, 3), 15);
    }

    #[test]
    fn test_location_spans_trimmed_line() {
        let c = ctx("int a;\n    static int counter = 0;\n");
        let loc = c.location(2);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 5);
        assert_eq!(loc.offset, 11);
        assert_eq!(loc.length, "static int counter = 0;".len());
    }
}
