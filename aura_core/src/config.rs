//! Engine configuration management via TOML files.
//!
//! Every section is optional; missing keys take the documented defaults and
//! present keys are validated before use.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::field::DEFAULT_RESOLUTION;
use crate::seed::VARIATION_OFFSET;

/// Engine configuration loaded from a TOML file.
///
/// # Examples
///
/// ```
/// use aura_core::AuraConfig;
///
/// let config = AuraConfig::load_from_file("config/aura.toml")
///     .unwrap_or_else(|_| AuraConfig::default());
/// let (width, height) = config.render.canvas_size();
/// assert!(width > 0 && height > 0);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuraConfig {
    pub render: RenderConfig,
    pub analyzer: AnalyzerConfig,
    pub logging: LoggingConfig,
}

impl AuraConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)?;
        Self::from_str(&contents)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawAuraConfig =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;

        Ok(Self {
            render: RenderConfig::try_from(&raw.render)?,
            analyzer: AnalyzerConfig::try_from(&raw.analyzer)?,
            logging: LoggingConfig::from(&raw.logging),
        })
    }
}

/// Poster rendering parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderConfig {
    /// Side length of the square aura field grid.
    pub field_resolution: usize,
    /// Poster width in inches.
    pub width_in: f32,
    /// Poster height in inches.
    pub height_in: f32,
    /// Output resolution in dots per inch.
    pub dpi: u32,
    /// Seed offset of the second variation.
    pub variation_offset: u64,
    /// Number of poster variations per request (1 or 2).
    pub variations: usize,
}

impl RenderConfig {
    /// Canvas size in pixels as `(width, height)`, never smaller than 1×1.
    pub fn canvas_size(&self) -> (usize, usize) {
        let dpi = self.dpi as f32;
        let width = (self.width_in * dpi).round().max(1.0) as usize;
        let height = (self.height_in * dpi).round().max(1.0) as usize;
        (width, height)
    }

    fn try_from(raw: &RawRender) -> Result<Self, ConfigError> {
        if !(64..=2048).contains(&raw.field_resolution) {
            return Err(ConfigError::invalid(
                "render.field_resolution",
                "must lie in 64..=2048",
            ));
        }
        if !raw.width_in.is_finite() || raw.width_in <= 0.0 || raw.width_in > 20.0 {
            return Err(ConfigError::invalid("render.width_in", "must lie in (0, 20]"));
        }
        if !raw.height_in.is_finite() || raw.height_in <= 0.0 || raw.height_in > 20.0 {
            return Err(ConfigError::invalid("render.height_in", "must lie in (0, 20]"));
        }
        if !(72..=600).contains(&raw.dpi) {
            return Err(ConfigError::invalid("render.dpi", "must lie in 72..=600"));
        }
        if raw.variation_offset == 0 {
            return Err(ConfigError::invalid(
                "render.variation_offset",
                "must be non-zero",
            ));
        }
        if !(1..=2).contains(&raw.variations) {
            return Err(ConfigError::invalid("render.variations", "must be 1 or 2"));
        }

        Ok(Self {
            field_resolution: raw.field_resolution,
            width_in: raw.width_in,
            height_in: raw.height_in,
            dpi: raw.dpi,
            variation_offset: raw.variation_offset,
            variations: raw.variations,
        })
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            field_resolution: DEFAULT_RESOLUTION,
            width_in: default_width_in(),
            height_in: default_height_in(),
            dpi: default_dpi(),
            variation_offset: VARIATION_OFFSET,
            variations: default_variations(),
        }
    }
}

/// Remote language-model analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzerConfig {
    /// Try the remote analyzer before the local rules.
    pub remote_enabled: bool,
    pub api_base: String,
    pub model: String,
    /// Environment variable holding the API credential.
    pub api_key_env: String,
    /// Upper bound on the whole remote call.
    pub timeout_secs: f64,
    pub max_output_tokens: u32,
}

impl AnalyzerConfig {
    fn try_from(raw: &RawAnalyzer) -> Result<Self, ConfigError> {
        if !raw.api_base.starts_with("http://") && !raw.api_base.starts_with("https://") {
            return Err(ConfigError::invalid(
                "analyzer.api_base",
                "must be an http(s) URL",
            ));
        }
        if raw.model.trim().is_empty() {
            return Err(ConfigError::invalid("analyzer.model", "must not be empty"));
        }
        if raw.api_key_env.trim().is_empty() {
            return Err(ConfigError::invalid(
                "analyzer.api_key_env",
                "must not be empty",
            ));
        }
        if !raw.timeout_secs.is_finite() || raw.timeout_secs <= 0.0 || raw.timeout_secs > 120.0 {
            return Err(ConfigError::invalid(
                "analyzer.timeout_secs",
                "must lie in (0, 120]",
            ));
        }
        if raw.max_output_tokens == 0 {
            return Err(ConfigError::invalid(
                "analyzer.max_output_tokens",
                "must be positive",
            ));
        }

        Ok(Self {
            remote_enabled: raw.remote_enabled,
            api_base: raw.api_base.trim_end_matches('/').to_string(),
            model: raw.model.trim().to_string(),
            api_key_env: raw.api_key_env.trim().to_string(),
            timeout_secs: raw.timeout_secs,
            max_output_tokens: raw.max_output_tokens,
        })
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            remote_enabled: true,
            api_base: default_api_base(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

/// JSONL render log settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggingConfig {
    pub render_log: bool,
    pub dir: PathBuf,
}

impl From<&RawLogging> for LoggingConfig {
    fn from(raw: &RawLogging) -> Self {
        Self {
            render_log: raw.render_log,
            dir: raw.dir.clone(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            render_log: false,
            dir: default_log_dir(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawAuraConfig {
    #[serde(default)]
    render: RawRender,
    #[serde(default)]
    analyzer: RawAnalyzer,
    #[serde(default)]
    logging: RawLogging,
}

#[derive(Debug, Deserialize)]
struct RawRender {
    #[serde(default = "default_resolution")]
    field_resolution: usize,
    #[serde(default = "default_width_in")]
    width_in: f32,
    #[serde(default = "default_height_in")]
    height_in: f32,
    #[serde(default = "default_dpi")]
    dpi: u32,
    #[serde(default = "default_variation_offset")]
    variation_offset: u64,
    #[serde(default = "default_variations")]
    variations: usize,
}

impl Default for RawRender {
    fn default() -> Self {
        Self {
            field_resolution: default_resolution(),
            width_in: default_width_in(),
            height_in: default_height_in(),
            dpi: default_dpi(),
            variation_offset: default_variation_offset(),
            variations: default_variations(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawAnalyzer {
    #[serde(default = "default_remote_enabled")]
    remote_enabled: bool,
    #[serde(default = "default_api_base")]
    api_base: String,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default = "default_api_key_env")]
    api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: f64,
    #[serde(default = "default_max_output_tokens")]
    max_output_tokens: u32,
}

impl Default for RawAnalyzer {
    fn default() -> Self {
        Self {
            remote_enabled: default_remote_enabled(),
            api_base: default_api_base(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawLogging {
    #[serde(default)]
    render_log: bool,
    #[serde(default = "default_log_dir")]
    dir: PathBuf,
}

impl Default for RawLogging {
    fn default() -> Self {
        Self {
            render_log: false,
            dir: default_log_dir(),
        }
    }
}

fn default_resolution() -> usize {
    DEFAULT_RESOLUTION
}

fn default_width_in() -> f32 {
    4.5
}

fn default_height_in() -> f32 {
    6.5
}

fn default_dpi() -> u32 {
    150
}

fn default_variation_offset() -> u64 {
    VARIATION_OFFSET
}

fn default_variations() -> usize {
    2
}

fn default_remote_enabled() -> bool {
    true
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> f64 {
    20.0
}

fn default_max_output_tokens() -> u32 {
    600
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
