//! ANSI color codes for terminal output
//!
//! This module provides color codes that respect the NO_COLOR environment variable.

use std::env;

use crate::diagnostics::types::Category;

/// ANSI color codes for plain-text fault rendering
pub struct Colors {
    pub red: &'static str,
    pub magenta: &'static str,
    pub yellow: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Colors {
    /// Get colors based on NO_COLOR environment variable
    pub fn new() -> Self {
        if colors_disabled() {
            Self::no_color()
        } else {
            Self::with_color()
        }
    }

    pub fn with_color() -> Self {
        Self {
            red: "\u{1b}[31m",
            magenta: "\u{1b}[35m",
            yellow: "\u{1b}[33m",
            cyan: "\u{1b}[36m",
            green: "\u{1b}[32m",
            dim: "\u{1b}[2m",
            reset: "\u{1b}[0m",
        }
    }

    pub fn no_color() -> Self {
        Self {
            red: "",
            magenta: "",
            yellow: "",
            cyan: "",
            green: "",
            dim: "",
            reset: "",
        }
    }

    /// Title color for a fault category, mirroring the page stylesheet.
    pub fn for_category(&self, category: Category) -> &'static str {
        match category {
            Category::Fatal | Category::Parse => self.red,
            Category::Exception | Category::Strict => self.magenta,
            Category::Warning => self.yellow,
            Category::Notice => self.cyan,
            Category::Deprecated => self.green,
            Category::Unknown => self.reset,
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if colors should be disabled
pub fn colors_disabled() -> bool {
    env::var("NO_COLOR").is_ok()
}
