//! One-call rendering: analysis, seed, posters and the saved artefacts.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::analysis::{DreamAnalysis, DreamAnalyzer};
use crate::charts::{render_radar_png, render_spectrum_png};
use crate::config::AuraConfig;
use crate::error::AuraResult;
use crate::field::FieldStatistics;
use crate::logging::{log_render, RenderLogEntry};
use crate::poster::{compose_variations, Poster, PosterStyle};
use crate::seed::{derive_seed, digest_hex};

pub const READING_FILE: &str = "reading.json";
pub const RADAR_FILE: &str = "emotion_radar.png";
pub const SPECTRUM_FILE: &str = "aura_spectrum.png";

/// Everything produced for one dream.
#[derive(Debug, Clone)]
pub struct DreamRender {
    pub analysis: DreamAnalysis,
    pub seed: u64,
    pub fingerprint: String,
    pub field: FieldStatistics,
    pub posters: Vec<Poster>,
}

#[derive(Serialize)]
struct ReadingDocument<'a> {
    #[serde(flatten)]
    analysis: &'a DreamAnalysis,
    model_label: &'a str,
    seed: u64,
    style: String,
    poster_seeds: Vec<u64>,
}

impl DreamRender {
    pub fn poster_file_name(index: usize) -> String {
        format!("aura_poster_{}.png", index + 1)
    }

    /// Writes the posters, both charts and `reading.json` into `dir`.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> AuraResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.posters.len() + 3);

        for (index, poster) in self.posters.iter().enumerate() {
            let path = dir.join(Self::poster_file_name(index));
            poster.to_png(&path)?;
            written.push(path);
        }

        let radar = dir.join(RADAR_FILE);
        render_radar_png(&self.analysis.emotions, &radar)?;
        written.push(radar);

        let spectrum = dir.join(SPECTRUM_FILE);
        render_spectrum_png(&self.analysis.emotions, &spectrum)?;
        written.push(spectrum);

        let document = ReadingDocument {
            analysis: &self.analysis,
            model_label: self.analysis.model_used.label(),
            seed: self.seed,
            style: self
                .posters
                .first()
                .map(|poster| poster.style.to_string())
                .unwrap_or_default(),
            poster_seeds: self.posters.iter().map(|poster| poster.seed).collect(),
        };
        let reading = dir.join(READING_FILE);
        std::fs::write(&reading, serde_json::to_string_pretty(&document)?)?;
        written.push(reading);

        tracing::info!(dir = %dir.display(), files = written.len(), "saved dream render");
        Ok(written)
    }
}

/// Analyzes `text` and composes its poster variations.
///
/// # Examples
///
/// ```
/// use aura_core::{render_dream, AuraConfig, DreamAnalyzer, PosterStyle};
///
/// let mut config = AuraConfig::default();
/// config.render.field_resolution = 64;
/// config.render.dpi = 20;
/// let render = render_dream(
///     "I crossed a bridge over the ocean",
///     PosterStyle::Hybrid,
///     &config,
///     &DreamAnalyzer::rule_based(),
/// )
/// .unwrap();
/// assert_eq!(render.posters.len(), 2);
/// assert_eq!(render.posters[1].seed, render.seed + 37);
/// ```
pub fn render_dream(
    text: &str,
    style: PosterStyle,
    config: &AuraConfig,
    analyzer: &DreamAnalyzer,
) -> AuraResult<DreamRender> {
    let analysis = analyzer.analyze(text)?;
    let seed = derive_seed(text);
    let fingerprint = digest_hex(text);

    let (field, posters) = compose_variations(&analysis.emotions, style, seed, &config.render);
    let field = field.statistics();

    tracing::info!(
        seed,
        style = %style,
        model = %analysis.model_used,
        dominant = %analysis.emotions.dominant(),
        posters = posters.len(),
        "rendered dream"
    );

    if config.logging.render_log {
        for poster in &posters {
            let entry =
                RenderLogEntry::new(&fingerprint, analysis.model_used.label(), field, poster);
            if let Err(err) = log_render(&config.logging.dir, &entry) {
                tracing::warn!(error = %err, "failed to append render log");
            }
        }
    }

    Ok(DreamRender {
        analysis,
        seed,
        fingerprint,
        field,
        posters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuraError;

    fn small_config() -> AuraConfig {
        let mut config = AuraConfig::default();
        config.render.field_resolution = 48;
        config.render.width_in = 1.0;
        config.render.height_in = 1.5;
        config.render.dpi = 30;
        config
    }

    #[test]
    fn empty_text_is_an_input_error() {
        let result = render_dream("  ", PosterStyle::Hybrid, &small_config(), &DreamAnalyzer::rule_based());
        assert!(matches!(result, Err(AuraError::EmptyDream)));
    }

    #[test]
    fn render_log_is_written_when_enabled() {
        let dir = std::env::temp_dir().join(format!("aura_pipeline_{}", uuid::Uuid::new_v4()));
        let mut config = small_config();
        config.logging.render_log = true;
        config.logging.dir = dir.clone();

        let render = render_dream(
            "a door in the fog",
            PosterStyle::AuraFocus,
            &config,
            &DreamAnalyzer::rule_based(),
        )
        .unwrap();

        let log = std::fs::read_to_string(dir.join(crate::logging::RENDER_LOG_FILE)).unwrap();
        assert_eq!(log.lines().count(), render.posters.len());
        assert!(!log.contains("fog"));
        assert!(log.contains(&render.fingerprint));
        let _ = std::fs::remove_dir_all(dir);
    }
}
