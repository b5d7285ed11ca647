//! Text fragments of generated code.
//!
//! A [`Fragment`] is an ordered list of unindented lines. Builders consume
//! and return fragments, and nesting is expressed with [`Fragment::indent`],
//! so generator functions compose pieces without sharing a mutable buffer.
//! Each artifact is rendered once at the end.
//!
//! # Example
//!
//! ```
//! use scriptbind_codegen::Fragment;
//!
//! let body = Fragment::new().line("return JS_TRUE;");
//! let function = Fragment::new()
//!     .line("JSBool f() {")
//!     .append(body.indent(1))
//!     .line("}");
//! assert_eq!(function.render(), "JSBool f() {\n\treturn JS_TRUE;\n}\n");
//! ```

use std::fmt;

/// Lines of generated code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    lines: Vec<String>,
}

impl Fragment {
    /// An empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line.
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    /// Append an empty line.
    pub fn blank(self) -> Self {
        self.line(String::new())
    }

    /// Append several lines.
    pub fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Append `other` after this fragment.
    pub fn append(mut self, other: Fragment) -> Self {
        self.lines.extend(other.lines);
        self
    }

    /// Append `other` only when present.
    pub fn append_opt(self, other: Option<Fragment>) -> Self {
        match other {
            Some(other) => self.append(other),
            None => self,
        }
    }

    /// Copy with `levels` tabs in front of every non-empty line.
    pub fn indent(&self, levels: usize) -> Fragment {
        let prefix = "\t".repeat(levels);
        Fragment {
            lines: self
                .lines
                .iter()
                .map(|l| {
                    if l.is_empty() {
                        String::new()
                    } else {
                        format!("{prefix}{l}")
                    }
                })
                .collect(),
        }
    }

    /// Concatenate fragments in order.
    pub fn concat(parts: impl IntoIterator<Item = Fragment>) -> Fragment {
        parts.into_iter().fold(Fragment::new(), Fragment::append)
    }

    /// Concatenate fragments, separating non-empty ones with a blank line.
    pub fn join_blocks(parts: impl IntoIterator<Item = Fragment>) -> Fragment {
        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .fold(Fragment::new(), |acc, part| {
                if acc.is_empty() { part } else { acc.blank().append(part) }
            })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Render with a trailing newline after every line.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Fragment {
    fn from(line: &str) -> Self {
        Fragment::new().line(line)
    }
}

/// Wrap `body` in a `do { ... } while (0);` block.
pub fn do_while(body: Fragment) -> Fragment {
    Fragment::new()
        .line("do {")
        .append(body.indent(1))
        .line("} while (0);")
}
