use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "coauthor.toml";

/// Top-level coauthor configuration, matching `coauthor.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoauthorConfig {
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub fetch: FetchSection,
    #[serde(default)]
    pub pubmed: PubMedSection,
    #[serde(default)]
    pub style: StyleSection,
    #[serde(default)]
    pub render: RenderSection,
}

impl CoauthorConfig {
    /// Read and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Reject values the collector or styler cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.max_results == 0 {
            return Err(ConfigError::Invalid(
                "search.max_results must be at least 1".into(),
            ));
        }
        if self.fetch.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "fetch.batch_size must be at least 1".into(),
            ));
        }
        if self.style.min_edge_weight == 0 {
            return Err(ConfigError::Invalid(
                "style.min_edge_weight must be at least 1".into(),
            ));
        }
        if let Some(unknown) = self
            .render
            .formats
            .iter()
            .find(|f| !crate::render::ALL_RENDERER_NAMES.contains(&f.as_str()))
        {
            return Err(ConfigError::Invalid(format!(
                "unknown render format '{unknown}' (expected one of: {})",
                crate::render::ALL_RENDERER_NAMES.join(", ")
            )));
        }
        if self.render.formats.is_empty() {
            return Err(ConfigError::Invalid(
                "render.formats must name at least one renderer".into(),
            ));
        }
        self.render.layout.canvas.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Display names of the authors to search for and emphasize.
    pub authors: Vec<String>,
    /// Cap on identifiers returned per author search.
    pub max_results: u32,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            authors: Vec::new(),
            max_results: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSection {
    pub batch_size: usize,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self { batch_size: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PubMedSection {
    pub base_url: String,
    /// Environment variable holding an NCBI API key (optional).
    pub api_key_env: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub search_delay_ms: u64,
    pub fetch_delay_ms: u64,
    pub timeout_secs: u64,
}

impl PubMedSection {
    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }
}

impl Default for PubMedSection {
    fn default() -> Self {
        Self {
            base_url: "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/".into(),
            api_key_env: "NCBI_API_KEY".into(),
            tool: None,
            email: None,
            search_delay_ms: 1000,
            fetch_delay_ms: 2000,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSection {
    pub target_color: String,
    pub default_color: String,
    pub target_size: u32,
    pub base_size: u32,
    pub degree_factor: u32,
    /// Edges lighter than this are left out of the render.
    pub min_edge_weight: u32,
}

impl Default for StyleSection {
    fn default() -> Self {
        Self {
            target_color: "red".into(),
            default_color: "#1f78b4".into(),
            target_size: 20,
            base_size: 10,
            degree_factor: 2,
            min_edge_weight: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSection {
    /// Artifact path; each renderer swaps in its own extension.
    pub output: PathBuf,
    pub formats: Vec<String>,
    pub layout: LayoutConfig,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            output: PathBuf::from("author_network.html"),
            formats: vec!["html".into()],
            layout: LayoutConfig::default(),
        }
    }
}

/// Layout direction for the hierarchical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutDirection {
    #[default]
    TopDown,
    BottomUp,
}

impl LayoutDirection {
    /// vis-network's direction code.
    pub fn code(self) -> &'static str {
        match self {
            Self::TopDown => "UD",
            Self::BottomUp => "DU",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub physics: bool,
    pub hierarchical: bool,
    pub direction: LayoutDirection,
    pub edge_smoothing: bool,
    pub canvas: CanvasConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            physics: false,
            hierarchical: true,
            direction: LayoutDirection::TopDown,
            edge_smoothing: false,
            canvas: CanvasConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub height: String,
    pub width: String,
    pub background: String,
    pub font_color: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            height: "1000px".into(),
            width: "100%".into(),
            background: "#222222".into(),
            font_color: "white".into(),
        }
    }
}

impl CanvasConfig {
    /// Canvas values are written verbatim into the page stylesheet, so each
    /// must be a plain CSS value: a length, percentage, color name, hex
    /// color or `rgb(...)` form.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("height", &self.height),
            ("width", &self.width),
            ("background", &self.background),
            ("font_color", &self.font_color),
        ] {
            if !is_css_value(value) {
                return Err(ConfigError::Invalid(format!(
                    "render.layout.canvas.{key} is not a plain CSS value: '{value}'"
                )));
            }
        }
        Ok(())
    }
}

/// Non-empty and limited to characters that cannot end a declaration or
/// leave the `<style>` element.
pub fn is_css_value(value: &str) -> bool {
    !value.trim().is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '%' | '.' | '-' | '(' | ')' | ',' | ' '))
}
