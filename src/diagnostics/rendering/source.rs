//! Source windows for diagnostics
//!
//! A window is the handful of source lines around a fault or call site: the
//! eight lines before the target, the target itself and the line after it.
//! Reading is best-effort; an unreadable file yields an empty window.

use std::fs;
use std::path::Path;

/// Lines shown before the target line.
pub const LINES_BEFORE: u32 = 8;
/// Lines shown after the target line.
pub const LINES_AFTER: u32 = 1;
/// Upper bound on the number of lines in a window.
pub const MAX_WINDOW_LINES: usize = (LINES_BEFORE + 1 + LINES_AFTER) as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number.
    pub number: u32,
    /// Line text without its terminator. Not escaped.
    pub text: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceWindow {
    lines: Vec<SourceLine>,
    target: u32,
}

impl SourceWindow {
    pub fn empty(target: u32) -> Self {
        Self {
            lines: Vec::new(),
            target,
        }
    }

    /// Reads `path` and cuts the window around `target` (1-based).
    ///
    /// Missing or unreadable files give an empty window. Invalid UTF-8 is
    /// replaced rather than rejected.
    pub fn extract(path: impl AsRef<Path>, target: u32) -> Self {
        match fs::read(path.as_ref()) {
            Ok(bytes) => Self::from_source(&String::from_utf8_lossy(&bytes), target),
            Err(_) => Self::empty(target),
        }
    }

    /// Cuts the window out of already-loaded source text.
    pub fn from_source(source: &str, target: u32) -> Self {
        // 1-based line n is kept when target - 9 < n < target + 2.
        let first = target.saturating_sub(LINES_BEFORE).max(1);
        let last = target.saturating_add(LINES_AFTER);

        let lines = source
            .lines()
            .enumerate()
            .skip((first - 1) as usize)
            .take_while(|(index, _)| (*index as u64) < u64::from(last))
            .map(|(index, text)| {
                let number = index as u32 + 1;
                SourceLine {
                    number,
                    text: text.to_string(),
                    highlighted: number == target,
                }
            })
            .collect();

        Self { lines, target }
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The line the window is centred on.
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Number of the first line in the window, if any.
    pub fn first_line(&self) -> Option<u32> {
        self.lines.first().map(|line| line.number)
    }

    pub fn highlighted(&self) -> Option<&SourceLine> {
        self.lines.iter().find(|line| line.highlighted)
    }
}
