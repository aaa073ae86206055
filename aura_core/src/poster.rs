//! Poster composition: aura field background plus the accent layer.
//!
//! A poster is an RGB image stored as `Array3<f32>` with shape
//! `(height, width, 3)`. The field is drawn at the style's opacity over a
//! white canvas, then accents are alpha-blended on top in draw order.

use std::fmt::{self, Display};
use std::path::Path;

use ndarray::{s, Array3, Axis, Zip};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::accents::{generate_accents, AccentShape};
use crate::config::RenderConfig;
use crate::emotion::EmotionVector;
use crate::error::{AuraError, AuraResult};
use crate::field::{AuraField, ColorRamp};
use crate::seed::variation_seeds;

const BACKGROUND: [f32; 3] = [1.0, 1.0, 1.0];

/// Visual emphasis of a poster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosterStyle {
    /// Field dominant, few accents.
    AuraFocus,
    /// Balanced field and accents.
    #[default]
    Hybrid,
    /// Accents dominant, softer field.
    GeometricFocus,
}

impl PosterStyle {
    pub const ALL: [PosterStyle; 3] = [
        PosterStyle::AuraFocus,
        PosterStyle::Hybrid,
        PosterStyle::GeometricFocus,
    ];

    /// Strict lookup ignoring case, spaces, dashes and underscores.
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "aurafocus" | "aura" => Some(PosterStyle::AuraFocus),
            "hybrid" => Some(PosterStyle::Hybrid),
            "geometricfocus" | "geometric" => Some(PosterStyle::GeometricFocus),
            _ => None,
        }
    }

    /// Lenient lookup: unrecognized selectors fall back to [`PosterStyle::Hybrid`].
    pub fn from_selector(selector: &str) -> Self {
        Self::from_name(selector).unwrap_or_else(|| {
            tracing::warn!(selector, "unknown poster style, using hybrid");
            PosterStyle::Hybrid
        })
    }

    pub fn policy(self) -> StylePolicy {
        match self {
            PosterStyle::AuraFocus => StylePolicy {
                field_alpha: 0.98,
                density_scale: 0.3,
            },
            PosterStyle::Hybrid => StylePolicy {
                field_alpha: 0.90,
                density_scale: 0.9,
            },
            PosterStyle::GeometricFocus => StylePolicy {
                field_alpha: 0.80,
                density_scale: 1.4,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PosterStyle::AuraFocus => "aura_focus",
            PosterStyle::Hybrid => "hybrid",
            PosterStyle::GeometricFocus => "geometric_focus",
        }
    }
}

impl Display for PosterStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field opacity and accent density for a style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StylePolicy {
    pub field_alpha: f32,
    pub density_scale: f32,
}

/// A composed poster image with the parameters that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Poster {
    pub style: PosterStyle,
    pub seed: u64,
    pub ramp: ColorRamp,
    pub shapes: Vec<AccentShape>,
    /// RGB in `[0, 1]`, shape `(height, width, 3)`.
    pub image: Array3<f32>,
}

impl Poster {
    /// Synthesizes the field and composes a single poster.
    pub fn compose(
        emotions: &EmotionVector,
        style: PosterStyle,
        seed: u64,
        config: &RenderConfig,
    ) -> Self {
        let field = AuraField::synthesize(emotions, config.field_resolution);
        Self::compose_on(&field, emotions, style, seed, config)
    }

    /// Composes a poster over an already synthesized field.
    pub fn compose_on(
        field: &AuraField,
        emotions: &EmotionVector,
        style: PosterStyle,
        seed: u64,
        config: &RenderConfig,
    ) -> Self {
        let policy = style.policy();
        let (width, height) = config.canvas_size();
        let shapes = generate_accents(emotions, seed, policy.density_scale);

        let mut image = Array3::<f32>::zeros((height, width, 3));
        let alpha = policy.field_alpha.clamp(0.0, 1.0);
        Zip::indexed(image.lanes_mut(Axis(2))).par_for_each(|(row, col), mut pixel| {
            let (u, v) = pixel_center(row, col, width, height);
            let color = field.color_at(u, v);
            for channel in 0..3 {
                pixel[channel] = alpha * color[channel] + (1.0 - alpha) * BACKGROUND[channel];
            }
        });

        for shape in &shapes {
            blend_shape(&mut image, shape);
        }

        tracing::debug!(
            style = %style,
            seed,
            width,
            height,
            shapes = shapes.len(),
            "composed poster"
        );

        Self {
            style,
            seed,
            ramp: field.ramp,
            shapes,
            image,
        }
    }

    /// Canvas size as `(width, height)` in pixels.
    pub fn dimensions(&self) -> (usize, usize) {
        let (rows, cols, _) = self.image.dim();
        (cols, rows)
    }

    pub fn pixel(&self, row: usize, col: usize) -> [f32; 3] {
        let p = self.image.slice(s![row, col, ..]);
        [p[0], p[1], p[2]]
    }

    /// Row-major 8-bit RGB buffer.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.image.iter().map(|value| float_to_byte(*value)).collect()
    }

    pub fn to_png<P: AsRef<Path>>(&self, path: P) -> AuraResult<()> {
        let (rows, cols, _) = self.image.dim();
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let backend = BitMapBackend::new(path, (cols as u32, rows as u32));
        let drawing_area = backend.into_drawing_area();
        drawing_area.fill(&WHITE).map_err(AuraError::render)?;

        for row in 0..rows {
            for col in 0..cols {
                let [r, g, b] = self.pixel(row, col);
                let color = RGBColor(float_to_byte(r), float_to_byte(g), float_to_byte(b));
                drawing_area
                    .draw_pixel((col as i32, row as i32), &color)
                    .map_err(AuraError::render)?;
            }
        }

        drawing_area.present().map_err(AuraError::render)
    }
}

/// Composes up to two variations sharing one field; the second uses the
/// seed shifted by `config.variation_offset`.
pub fn compose_variations(
    emotions: &EmotionVector,
    style: PosterStyle,
    seed: u64,
    config: &RenderConfig,
) -> (AuraField, Vec<Poster>) {
    let field = AuraField::synthesize(emotions, config.field_resolution);
    let count = config.variations.clamp(1, 2);
    let posters = variation_seeds(seed, config.variation_offset)
        .into_iter()
        .take(count)
        .map(|variation_seed| Poster::compose_on(&field, emotions, style, variation_seed, config))
        .collect();
    (field, posters)
}

fn pixel_center(row: usize, col: usize, width: usize, height: usize) -> (f32, f32) {
    let u = (col as f32 + 0.5) / width as f32;
    let v = 1.0 - (row as f32 + 0.5) / height as f32;
    (u, v)
}

/// Source-over blend of one shape, visiting only its bounding box.
fn blend_shape(image: &mut Array3<f32>, shape: &AccentShape) {
    let (rows, cols, _) = image.dim();
    let (x_min, y_min, x_max, y_max) = shape.bounds();

    let col_start = ((x_min * cols as f32).floor().max(0.0) as usize).min(cols);
    let col_end = ((x_max * cols as f32).ceil().max(0.0) as usize).min(cols);
    let row_start = (((1.0 - y_max) * rows as f32).floor().max(0.0) as usize).min(rows);
    let row_end = (((1.0 - y_min) * rows as f32).ceil().max(0.0) as usize).min(rows);
    let alpha = shape.alpha.clamp(0.0, 1.0);

    for row in row_start..row_end {
        for col in col_start..col_end {
            let (u, v) = pixel_center(row, col, cols, rows);
            if !shape.contains(u, v) {
                continue;
            }
            for channel in 0..3 {
                let dst = &mut image[[row, col, channel]];
                *dst = alpha * shape.color[channel] + (1.0 - alpha) * *dst;
            }
        }
    }
}

fn float_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> RenderConfig {
        RenderConfig {
            field_resolution: 48,
            width_in: 1.0,
            height_in: 1.5,
            dpi: 40,
            ..RenderConfig::default()
        }
    }

    fn vector(values: [f32; 6]) -> EmotionVector {
        EmotionVector::new(values).unwrap()
    }

    #[test]
    fn selectors_are_lenient() {
        assert_eq!(PosterStyle::from_selector("Aura Focus"), PosterStyle::AuraFocus);
        assert_eq!(
            PosterStyle::from_selector("geometric-focus"),
            PosterStyle::GeometricFocus
        );
        assert_eq!(PosterStyle::from_selector("HYBRID"), PosterStyle::Hybrid);
        assert_eq!(PosterStyle::from_selector("watercolour"), PosterStyle::Hybrid);
        assert_eq!(PosterStyle::from_name("watercolour"), None);
    }

    #[test]
    fn policies_order_density_and_opacity() {
        let aura = PosterStyle::AuraFocus.policy();
        let hybrid = PosterStyle::Hybrid.policy();
        let geometric = PosterStyle::GeometricFocus.policy();
        assert!(aura.field_alpha > hybrid.field_alpha);
        assert!(hybrid.field_alpha > geometric.field_alpha);
        assert!(aura.density_scale < hybrid.density_scale);
        assert!(hybrid.density_scale < geometric.density_scale);
        assert_eq!(hybrid, PosterStyle::default().policy());
    }

    #[test]
    fn poster_matches_canvas_size() {
        let config = small_config();
        let poster = Poster::compose(&EmotionVector::NEUTRAL, PosterStyle::Hybrid, 3, &config);
        assert_eq!(poster.dimensions(), (40, 60));
        assert_eq!(poster.to_rgb8().len(), 40 * 60 * 3);
        assert!(poster.image.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn composition_is_deterministic() {
        let config = small_config();
        let emotions = vector([0.6, 0.4, 0.1, 0.5, 0.2, 0.9]);
        let a = Poster::compose(&emotions, PosterStyle::GeometricFocus, 99, &config);
        let b = Poster::compose(&emotions, PosterStyle::GeometricFocus, 99, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn variations_share_field_and_differ_in_accents() {
        let config = small_config();
        let emotions = vector([0.7, 0.6, 0.0, 0.4, 0.2, 1.0]);
        let (field, posters) = compose_variations(&emotions, PosterStyle::GeometricFocus, 500, &config);
        assert_eq!(posters.len(), 2);
        assert_eq!(posters[0].seed, 500);
        assert_eq!(posters[1].seed, 537);
        assert_eq!(posters[0].ramp, field.ramp);
        assert_ne!(posters[0].shapes, posters[1].shapes);

        // Pixels untouched by either accent layer come from the shared field.
        let (width, height) = posters[0].dimensions();
        let mut compared = 0;
        for row in 0..height {
            for col in 0..width {
                let (u, v) = pixel_center(row, col, width, height);
                let covered = posters
                    .iter()
                    .flat_map(|poster| poster.shapes.iter())
                    .any(|shape| shape.contains(u, v));
                if !covered {
                    assert_eq!(posters[0].pixel(row, col), posters[1].pixel(row, col));
                    compared += 1;
                }
            }
        }
        assert!(compared > 0);
    }

    #[test]
    fn single_variation_when_configured() {
        let config = RenderConfig {
            variations: 1,
            ..small_config()
        };
        let (_, posters) = compose_variations(&EmotionVector::NEUTRAL, PosterStyle::Hybrid, 1, &config);
        assert_eq!(posters.len(), 1);
    }

    #[test]
    fn field_layer_is_blended_over_white() {
        let config = small_config();
        let emotions = vector([0.0; 6]);
        let field = AuraField::synthesize(&emotions, config.field_resolution);
        let poster = Poster::compose_on(&field, &emotions, PosterStyle::AuraFocus, 0, &config);

        let (width, height) = poster.dimensions();
        let (u, v) = pixel_center(0, 0, width, height);
        let covered = poster.shapes.iter().any(|shape| shape.contains(u, v));
        if !covered {
            let color = field.color_at(u, v);
            let pixel = poster.pixel(0, 0);
            for channel in 0..3 {
                let expected = 0.98 * color[channel] + 0.02;
                assert!((pixel[channel] - expected).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn writes_png_file() {
        let dir = std::env::temp_dir().join(format!("aura_poster_{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("poster.png");
        let config = small_config();
        let poster = Poster::compose(&EmotionVector::NEUTRAL, PosterStyle::Hybrid, 8, &config);
        poster.to_png(&path).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn float_to_byte_rounds_and_clamps() {
        assert_eq!(float_to_byte(-0.5), 0);
        assert_eq!(float_to_byte(0.5), 128);
        assert_eq!(float_to_byte(2.0), 255);
    }
}
