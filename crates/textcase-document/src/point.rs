//! Line/column positions

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Zero-based position: line and byte column
///
/// Ordering is lexicographic (line first), which is what span containment
/// checks rely on.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Point {
    /// Zero-based line
    pub line: usize,
    /// Zero-based byte column
    pub column: usize,
}

impl Point {
    /// Create point
    #[inline]
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Shift by signed deltas, saturating at zero
    #[must_use]
    pub fn offset(self, lines: i64, columns: i64) -> Self {
        Self {
            line: shift(self.line, lines),
            column: shift(self.column, columns),
        }
    }
}

fn shift(value: usize, delta: i64) -> usize {
    let magnitude = usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX);
    if delta < 0 {
        value.saturating_sub(magnitude)
    } else {
        value.saturating_add(magnitude)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl From<tree_sitter::Point> for Point {
    fn from(p: tree_sitter::Point) -> Self {
        Self::new(p.row, p.column)
    }
}

impl From<Point> for tree_sitter::Point {
    fn from(p: Point) -> Self {
        Self::new(p.line, p.column)
    }
}
