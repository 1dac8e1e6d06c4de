//! Pipeline configuration
//!
//! Every setting has a default; a TOML file only needs the values it changes:
//!
//! ```toml
//! [showcase]
//! gutter = 160
//!
//! [fonts]
//! primary = "Inter"
//! fallback = "Roboto"
//!
//! [source]
//! components = ["button", "badge"]
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Spacing and type sizes of the variant showcase
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    /// Horizontal gap between component showcases in a batch
    pub gutter: f64,
    /// Padding inside each showcase container
    pub padding: f64,
    /// Vertical gap between the title and the variant row
    pub section_spacing: f64,
    /// Horizontal gap between variant cells
    pub row_spacing: f64,
    /// Vertical gap between a cell label and its node
    pub cell_spacing: f64,
    pub title_font_size: f64,
    pub label_font_size: f64,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            gutter: 100.0,
            padding: 32.0,
            section_spacing: 24.0,
            row_spacing: 32.0,
            cell_spacing: 8.0,
            title_font_size: 24.0,
            label_font_size: 12.0,
        }
    }
}

/// Font families used for text nodes
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Family tried first, in the style picked from the weight
    pub primary: String,
    /// Family used at "Regular" when the primary cannot be loaded
    pub fallback: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            primary: "Inter".to_string(),
            fallback: "Roboto".to_string(),
        }
    }
}

/// SVG export options
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SvgConfig {
    /// Padding around the viewBox
    pub padding: f64,
    /// Whether to format output with indentation
    pub pretty_print: bool,
    /// Optional page background as `#rrggbb`
    pub background: Option<String>,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            padding: 40.0,
            pretty_print: true,
            background: None,
        }
    }
}

impl SvgConfig {
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }
}

/// Where documents live in a content store
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Component names fetched by default
    pub components: Vec<String>,
    /// Token namespaces, one document each
    pub token_namespaces: Vec<String>,
    pub tokens_dir: String,
    pub components_dir: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            components: ["button", "input", "card", "badge", "checkbox", "avatar"]
                .map(String::from)
                .to_vec(),
            token_namespaces: ["colors", "spacing", "typography"]
                .map(String::from)
                .to_vec(),
            tokens_dir: "tokens".to_string(),
            components_dir: "components".to_string(),
        }
    }
}

impl SourceConfig {
    /// Store path of a token namespace document
    pub fn token_path(&self, namespace: &str) -> String {
        join_path(&self.tokens_dir, &format!("{}.json", namespace))
    }

    /// Store path of a component document
    pub fn component_path(&self, name: &str) -> String {
        join_path(&self.components_dir, &format!("{}.json", name))
    }
}

fn join_path(dir: &str, file: &str) -> String {
    let dir = dir.trim_matches('/');
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", dir, file)
    }
}

/// Configuration for the complete pipeline
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub showcase: ShowcaseConfig,
    pub fonts: FontConfig,
    pub svg: SvgConfig,
    pub source: SourceConfig,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_showcase(mut self, showcase: ShowcaseConfig) -> Self {
        self.showcase = showcase;
        self
    }

    pub fn with_fonts(mut self, fonts: FontConfig) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn with_svg(mut self, svg: SvgConfig) -> Self {
        self.svg = svg;
        self
    }

    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = source;
        self
    }

    /// Set the gap between showcases in a batch
    pub fn with_gutter(mut self, gutter: f64) -> Self {
        self.showcase.gutter = gutter;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.showcase.gutter, 100.0);
        assert_eq!(config.fonts.primary, "Inter");
        assert_eq!(config.fonts.fallback, "Roboto");
        assert_eq!(config.source.token_namespaces, vec!["colors", "spacing", "typography"]);
        assert!(config.svg.pretty_print);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RenderConfig::from_toml(
            r#"
[showcase]
gutter = 48

[fonts]
fallback = "Arial"

[source]
components = ["button"]
"#,
        )
        .expect("Should parse");
        assert_eq!(config.showcase.gutter, 48.0);
        assert_eq!(config.showcase.padding, 32.0);
        assert_eq!(config.fonts.primary, "Inter");
        assert_eq!(config.fonts.fallback, "Arial");
        assert_eq!(config.source.components, vec!["button"]);
        assert_eq!(config.source.tokens_dir, "tokens");
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = RenderConfig::from_toml("this is not valid toml {{{{");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_document_paths() {
        let source = SourceConfig::default();
        assert_eq!(source.token_path("colors"), "tokens/colors.json");
        assert_eq!(source.component_path("button"), "components/button.json");

        let flat = SourceConfig {
            components_dir: "/".to_string(),
            ..SourceConfig::default()
        };
        assert_eq!(flat.component_path("card"), "card.json");
    }

    #[test]
    fn test_builder_pattern() {
        let config = RenderConfig::new()
            .with_gutter(20.0)
            .with_svg(SvgConfig::default().with_padding(0.0).with_pretty_print(false));
        assert_eq!(config.showcase.gutter, 20.0);
        assert_eq!(config.svg.padding, 0.0);
        assert!(!config.svg.pretty_print);
    }
}
