//! Fault severity levels and their classification

use std::fmt;
use std::ops::{BitAnd, BitOr};

use serde::Deserialize;

use super::fault::RawType;

/// Severity bits carried by a runtime fault.
///
/// Levels are bit flags so a reporting mask is itself a `Level`: a fault is
/// reported when `mask & level` is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(transparent)]
pub struct Level(u32);

impl Level {
    pub const ERROR: Level = Level(1);
    pub const WARNING: Level = Level(2);
    pub const PARSE: Level = Level(4);
    pub const NOTICE: Level = Level(8);
    pub const CORE_ERROR: Level = Level(16);
    pub const CORE_WARNING: Level = Level(32);
    pub const COMPILE_ERROR: Level = Level(64);
    pub const COMPILE_WARNING: Level = Level(128);
    pub const USER_ERROR: Level = Level(256);
    pub const USER_WARNING: Level = Level(512);
    pub const USER_NOTICE: Level = Level(1024);
    pub const STRICT: Level = Level(2048);
    pub const RECOVERABLE_ERROR: Level = Level(4096);
    pub const DEPRECATED: Level = Level(8192);
    pub const USER_DEPRECATED: Level = Level(16384);
    pub const ALL: Level = Level(32767);
    pub const NONE: Level = Level(0);

    const NAMES: [(Level, &'static str); 15] = [
        (Level::ERROR, "ERROR"),
        (Level::WARNING, "WARNING"),
        (Level::PARSE, "PARSE"),
        (Level::NOTICE, "NOTICE"),
        (Level::CORE_ERROR, "CORE_ERROR"),
        (Level::CORE_WARNING, "CORE_WARNING"),
        (Level::COMPILE_ERROR, "COMPILE_ERROR"),
        (Level::COMPILE_WARNING, "COMPILE_WARNING"),
        (Level::USER_ERROR, "USER_ERROR"),
        (Level::USER_WARNING, "USER_WARNING"),
        (Level::USER_NOTICE, "USER_NOTICE"),
        (Level::STRICT, "STRICT"),
        (Level::RECOVERABLE_ERROR, "RECOVERABLE_ERROR"),
        (Level::DEPRECATED, "DEPRECATED"),
        (Level::USER_DEPRECATED, "USER_DEPRECATED"),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        Level(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true when the two levels share at least one bit.
    pub const fn intersects(self, other: Level) -> bool {
        self.0 & other.0 != 0
    }

    /// Looks a single level up by its name, e.g. `"USER_WARNING"`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(level, _)| *level)
    }

    pub fn name(self) -> Option<&'static str> {
        Self::NAMES
            .iter()
            .find(|(level, _)| *level == self)
            .map(|(_, n)| *n)
    }
}

impl BitOr for Level {
    type Output = Level;

    fn bitor(self, rhs: Level) -> Level {
        Level(self.0 | rhs.0)
    }
}

impl BitAnd for Level {
    type Output = Level;

    fn bitand(self, rhs: Level) -> Level {
        Level(self.0 & rhs.0)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Presentation category of a fault, derived from its raw type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Fatal,
    Parse,
    Warning,
    Notice,
    Strict,
    Deprecated,
    Exception,
    Unknown,
}

impl Category {
    pub fn of_level(level: Level) -> Self {
        match level {
            Level::ERROR
            | Level::USER_ERROR
            | Level::CORE_ERROR
            | Level::COMPILE_ERROR
            | Level::RECOVERABLE_ERROR => Category::Fatal,
            Level::PARSE => Category::Parse,
            Level::WARNING | Level::USER_WARNING | Level::CORE_WARNING | Level::COMPILE_WARNING => {
                Category::Warning
            }
            Level::NOTICE | Level::USER_NOTICE => Category::Notice,
            Level::STRICT => Category::Strict,
            Level::DEPRECATED | Level::USER_DEPRECATED => Category::Deprecated,
            _ => Category::Unknown,
        }
    }

    /// Human title for level-based faults. Exceptions use their kind instead.
    pub fn title(self) -> &'static str {
        match self {
            Category::Fatal => "Fatal Error",
            Category::Parse => "Parse Error",
            Category::Warning => "Warning",
            Category::Notice => "Notice",
            Category::Strict => "Strict Standards",
            Category::Deprecated => "Deprecated",
            Category::Exception => "Exception",
            Category::Unknown => "Unknown Error",
        }
    }

    /// CSS modifier used by the diagnostic page (`error-header--{class}`).
    pub fn css_class(self) -> &'static str {
        match self {
            Category::Fatal => "fatal",
            Category::Parse => "parse",
            Category::Warning => "warning",
            Category::Notice => "notice",
            Category::Strict => "strict",
            Category::Deprecated => "deprecated",
            Category::Exception => "exception",
            Category::Unknown => "",
        }
    }
}

/// Result of classifying a fault: what to call it and how to style it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub title: String,
    pub category: Category,
}

impl Classification {
    pub fn css_class(&self) -> &'static str {
        self.category.css_class()
    }
}

/// Maps a raw fault type to its title and category. Total: unmatched levels
/// classify as `Unknown`.
pub fn classify(raw: &RawType) -> Classification {
    match raw {
        RawType::Caught(exception) => Classification {
            title: exception.kind().to_string(),
            category: Category::Exception,
        },
        RawType::Severity(level) => {
            let category = Category::of_level(*level);
            Classification {
                title: category.title().to_string(),
                category,
            }
        }
    }
}
