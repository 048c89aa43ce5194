// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indented outline notation for forests of strings.
//!
//! One node per line; indentation gives the depth and an optional bullet
//! precedes the value:
//!
//! ```text
//! - fruit
//!   - apple
//!   - pear
//! - bread
//! ```

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use crate::error::TreeError;
use crate::forest::Forest;
use crate::node::Node;
use crate::path::TreePath;

/// Layout of the outline notation.
///
/// The default is two spaces per level and a `"- "` bullet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutlineFormat {
    indent: usize,
    bullet: &'static str,
}

impl Default for OutlineFormat {
    fn default() -> Self {
        Self {
            indent: 2,
            bullet: "- ",
        }
    }
}

impl OutlineFormat {
    /// The default format.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `indent` spaces per level.
    ///
    /// # Panics
    ///
    /// Panics if `indent` is zero.
    pub fn with_indent(mut self, indent: usize) -> Self {
        assert!(indent > 0, "outline indent must be at least one space");
        self.indent = indent;
        self
    }

    /// Use `bullet` before each value. An empty bullet prints bare values.
    pub fn with_bullet(mut self, bullet: &'static str) -> Self {
        self.bullet = bullet;
        self
    }

    /// Spaces per level.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Bullet printed before each value and stripped when parsing.
    pub fn bullet(&self) -> &'static str {
        self.bullet
    }
}

/// Parse outline text into a forest.
///
/// Blank lines are skipped. Leading spaces divided by the indent width give a
/// line's depth; the bullet, if present, is stripped and the rest of the line
/// (minus trailing whitespace) becomes the value.
///
/// # Errors
///
/// - [`TreeError::IndentMisaligned`] if leading spaces are not a whole number
///   of levels.
/// - [`TreeError::IndentJump`] if a line is more than one level deeper than the
///   line before it (or the first line is indented at all).
///
/// ```rust
/// use understory_forest::{OutlineFormat, parse_outline};
///
/// let forest = parse_outline("- A\n  - B\n- C\n", &OutlineFormat::default()).unwrap();
/// assert_eq!(forest.len(), 2);
/// assert_eq!(forest.nodes[0].children[0].value, "B");
/// ```
pub fn parse_outline(text: &str, format: &OutlineFormat) -> Result<Forest<String>, TreeError> {
    let mut forest = Forest::new();
    // Path of the most recently added node.
    let mut last = TreePath::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;
        let leading = line.len() - line.trim_start_matches(' ').len();
        if leading % format.indent != 0 {
            return Err(TreeError::IndentMisaligned { line: line_number });
        }
        let depth = leading / format.indent;
        if depth > last.len() {
            return Err(TreeError::IndentJump {
                line: line_number,
                depth,
                max: last.len(),
            });
        }

        let content = &line[leading..];
        let content = if format.bullet.is_empty() {
            content
        } else {
            content.strip_prefix(format.bullet).unwrap_or(content)
        };
        let node = Node::new(content.trim_end().to_string());

        while last.len() > depth {
            last.pop();
        }
        let siblings = if last.is_empty() {
            &mut forest.nodes
        } else {
            &mut forest[&last].children
        };
        siblings.push(node);
        last.push(siblings.len() - 1);
    }
    Ok(forest)
}

impl FromStr for Forest<String> {
    type Err = TreeError;

    /// Parse with the default [`OutlineFormat`]; bullets are optional.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_outline(text, &OutlineFormat::default())
    }
}

/// Renders a forest in outline notation; see [`Forest::outline`].
#[derive(Clone, Copy, Debug)]
pub struct Outline<'a, V> {
    forest: &'a Forest<V>,
    format: OutlineFormat,
}

impl<V: fmt::Display> fmt::Display for Outline<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (path, node) in self.forest.iter_paths() {
            let width = (path.len() - 1) * self.format.indent;
            writeln!(f, "{:width$}{}{}", "", self.format.bullet, node.value)?;
        }
        Ok(())
    }
}

impl<V> Forest<V> {
    /// Display adapter printing the forest in outline notation.
    pub fn outline(&self, format: &OutlineFormat) -> Outline<'_, V> {
        Outline {
            forest: self,
            format: *format,
        }
    }
}

/// Print `forest` in outline notation, one line per node.
///
/// Parsing the result with the same format reproduces the forest as long as
/// no value has leading or trailing whitespace or starts with the bullet.
pub fn to_outline<V: fmt::Display>(forest: &Forest<V>, format: &OutlineFormat) -> String {
    forest.outline(format).to_string()
}
