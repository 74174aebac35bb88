//! Pipeline configuration.
//!
//! Loaded from a JSON file, then overridden by `FAULTPAGE_*` environment
//! variables:
//!
//! ```json
//! {
//!   "display_errors": true,
//!   "format": "html",
//!   "reporting": 32767,
//!   "policy": "both",
//!   "hidden_templates": { "404": { "file": "pages/404.html" } }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::diagnostics::types::Level;
use crate::error::ConfigError;
use crate::format::{
    DisplayPolicy, Formatter, HiddenTemplate, HtmlFormatter, JsonFormatter, PageTemplate,
    TextFormatter,
};
use crate::pipeline::{DEFAULT_PROTOCOL, Errors};

pub const ENV_DISPLAY: &str = "FAULTPAGE_DISPLAY";
pub const ENV_REPORTING: &str = "FAULTPAGE_REPORTING";
pub const ENV_FORMAT: &str = "FAULTPAGE_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
    Text,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "html" => Some(OutputFormat::Html),
            "json" => Some(OutputFormat::Json),
            "text" => Some(OutputFormat::Text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateConfig {
    Literal(String),
    File(PathBuf),
}

impl From<&TemplateConfig> for PageTemplate {
    fn from(config: &TemplateConfig) -> Self {
        match config {
            TemplateConfig::Literal(text) => PageTemplate::literal(text.clone()),
            TemplateConfig::File(path) => PageTemplate::file(path.clone()),
        }
    }
}

impl From<&TemplateConfig> for HiddenTemplate {
    fn from(config: &TemplateConfig) -> Self {
        match config {
            TemplateConfig::Literal(text) => HiddenTemplate::literal(text.clone()),
            TemplateConfig::File(path) => HiddenTemplate::file(path.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ErrorsConfig {
    pub display_errors: bool,
    pub format: OutputFormat,
    pub page_template: Option<TemplateConfig>,
    pub hidden_templates: BTreeMap<u16, TemplateConfig>,
    /// Reporting mask for level-based faults. Every level when unset.
    pub reporting: Option<Level>,
    pub policy: DisplayPolicy,
    pub protocol: String,
    /// ANSI colors in text reports.
    pub color: bool,
}

impl Default for ErrorsConfig {
    fn default() -> Self {
        Self {
            display_errors: false,
            format: OutputFormat::default(),
            page_template: None,
            hidden_templates: BTreeMap::new(),
            reporting: None,
            policy: DisplayPolicy::default(),
            protocol: DEFAULT_PROTOCOL.to_string(),
            color: false,
        }
    }
}

impl ErrorsConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.with_env_overrides(std::env::vars())
    }

    /// Applies `FAULTPAGE_*` overrides from `vars`. Unrelated keys are ignored.
    pub fn with_env_overrides<I, K, V>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                ENV_DISPLAY => {
                    self.display_errors =
                        parse_switch(value).ok_or_else(|| invalid_env(key, value))?;
                }
                ENV_REPORTING => {
                    self.reporting =
                        Some(parse_reporting(value).ok_or_else(|| invalid_env(key, value))?);
                }
                ENV_FORMAT => {
                    self.format =
                        OutputFormat::from_name(value).ok_or_else(|| invalid_env(key, value))?;
                }
                _ => {}
            }
        }
        Ok(self)
    }

    pub fn build_formatter(&self) -> Arc<dyn Formatter> {
        let reporting = self.reporting.unwrap_or(Level::ALL);
        match self.format {
            OutputFormat::Json => Arc::new(JsonFormatter::new()),
            OutputFormat::Text => Arc::new(
                TextFormatter::new()
                    .with_reporting(reporting)
                    .with_policy(self.policy)
                    .with_color(self.color),
            ),
            OutputFormat::Html => {
                let mut html = HtmlFormatter::new()
                    .with_reporting(reporting)
                    .with_policy(self.policy);
                if let Some(page) = &self.page_template {
                    html.set_page_template(PageTemplate::from(page));
                }
                for (code, template) in &self.hidden_templates {
                    html.add_hidden_template(*code, HiddenTemplate::from(template));
                }
                Arc::new(html)
            }
        }
    }

    /// Builds a registered pipeline. Hooks still have to be installed.
    pub fn build_errors(&self) -> Errors {
        let errors = Errors::with_protocol(self.protocol.clone());
        errors.register_shared(self.build_formatter(), self.display_errors);
        errors
    }
}

fn invalid_env(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" | "" => Some(false),
        _ => None,
    }
}

/// Accepts a number or level names joined by `|`, e.g.
/// `E_WARNING | E_NOTICE` or `ALL`.
fn parse_reporting(value: &str) -> Option<Level> {
    let value = value.trim();
    if let Ok(bits) = value.parse::<u32>() {
        return Some(Level::from_bits(bits));
    }
    value.split('|').try_fold(Level::NONE, |mask, part| {
        let part = part.trim();
        let name = part.strip_prefix("E_").unwrap_or(part);
        let level = match name.to_ascii_uppercase().as_str() {
            "ALL" => Level::ALL,
            "NONE" => Level::NONE,
            _ => Level::from_name(name)?,
        };
        Some(mask | level)
    })
}
