//! Aura field synthesis.
//!
//! The aura field is a square scalar grid built as a weighted sum of closed
//! form terms over the centred coordinates `(X, Y)` and their polar form
//! `(R, θ)`. Every weight is an emotion value, so the field is a pure
//! function of the [`EmotionVector`] and the grid resolution.

pub mod ramp;

use std::fmt::{self, Display};

use ndarray::{Array2, Zip};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::emotion::{Dimension, EmotionVector};
pub use ramp::ColorRamp;

/// Half-width of the square coordinate domain `[-EXTENT, EXTENT]²`.
pub const FIELD_EXTENT: f32 = 1.6;
/// Total emotional energy below which the floor glow is injected.
pub const LOW_ENERGY_THRESHOLD: f32 = 0.6;
/// Guard added to the normalization denominator.
pub const NORMALIZE_EPSILON: f32 = 1.0e-6;
pub const DEFAULT_RESOLUTION: usize = 640;
pub const MIN_RESOLUTION: usize = 2;

/// Emotion-driven coefficients of the field terms.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FieldTerms {
    fear: f32,
    desire: f32,
    calm: f32,
    mystery: f32,
    connection: f32,
    transform: f32,
    low_energy: bool,
}

impl FieldTerms {
    fn new(emotions: &EmotionVector) -> Self {
        Self {
            fear: emotions.get(Dimension::Fear),
            desire: emotions.get(Dimension::Desire),
            calm: emotions.get(Dimension::Calm),
            mystery: emotions.get(Dimension::Mystery),
            connection: emotions.get(Dimension::Connection),
            transform: emotions.get(Dimension::Transformation),
            low_energy: emotions.total() < LOW_ENERGY_THRESHOLD,
        }
    }

    fn evaluate(&self, x: f32, y: f32) -> f32 {
        let r2 = x * x + y * y;
        let r = r2.sqrt();
        let theta = y.atan2(x);

        // Fear tightens the central glow, calm widens it.
        let base = (-r2 * (1.5 + 1.5 * self.fear - 0.8 * self.calm)).exp();

        let core_desire =
            (-((x - 0.45).powi(2) + (y + 0.1).powi(2)) * (4.0 + 2.0 * self.desire)).exp();
        let core_connection =
            (-((x + 0.35).powi(2) + (y - 0.2).powi(2)) * (4.0 + 2.0 * self.connection)).exp();

        let rings = (8.0 * r - 3.0 * self.transform).cos() * (-r2 * 2.0).exp();
        let angular = (5.0 * theta + 4.0 * r).sin() * (-r2 * 1.3).exp();
        let texture = ((11.0 * x + 3.0 * y).sin() * (9.0 * y - 2.0 * x).cos()
            + 0.5 * (14.0 * r + 2.0 * theta).sin())
            * (-r2 * 0.9).exp();

        let mut value = 0.9 * base
            + 0.6 * self.desire * core_desire
            + 0.6 * self.connection * core_connection
            + 0.4 * self.transform * rings
            + 0.4 * self.mystery * angular
            + 0.08 * (self.transform + self.mystery) * texture;

        if self.low_energy {
            value += 0.2 * (-r2 * 1.2).exp();
        }
        value
    }
}

/// Normalized aura intensity grid plus the colour ramp chosen for it.
///
/// Row 0 is the top edge of the image (`y = +FIELD_EXTENT`).
///
/// # Examples
///
/// ```
/// use aura_core::{AuraField, EmotionVector};
///
/// let field = AuraField::synthesize(&EmotionVector::NEUTRAL, 64);
/// assert_eq!(field.resolution(), 64);
/// let stats = field.statistics();
/// assert!(stats.min >= 0.0 && stats.max <= 1.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuraField {
    pub values: Array2<f32>,
    pub ramp: ColorRamp,
}

impl AuraField {
    /// Synthesizes the field for `emotions` on a `resolution`² grid.
    pub fn synthesize(emotions: &EmotionVector, resolution: usize) -> Self {
        let n = resolution.max(MIN_RESOLUTION);
        let terms = FieldTerms::new(emotions);
        let step = 2.0 * FIELD_EXTENT / (n - 1) as f32;

        let mut values = Array2::<f32>::zeros((n, n));
        Zip::indexed(&mut values).par_for_each(|(row, col), value| {
            let x = -FIELD_EXTENT + col as f32 * step;
            let y = FIELD_EXTENT - row as f32 * step;
            *value = terms.evaluate(x, y);
        });
        normalize_in_place(&mut values);

        let field = Self {
            values,
            ramp: ColorRamp::choose(emotions),
        };
        tracing::debug!(
            resolution = n,
            ramp = %field.ramp,
            low_energy = terms.low_energy,
            "synthesized aura field"
        );
        field
    }

    pub fn resolution(&self) -> usize {
        self.values.nrows()
    }

    /// Nearest-cell lookup at poster coordinates `(u, v)` in `[0, 1]²`,
    /// `v` pointing up.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let n = self.resolution();
        let last = (n - 1) as f32;
        let col = (u.clamp(0.0, 1.0) * last).round() as usize;
        let row = ((1.0 - v.clamp(0.0, 1.0)) * last).round() as usize;
        self.values[[row.min(n - 1), col.min(n - 1)]]
    }

    /// Ramp colour at poster coordinates `(u, v)`.
    pub fn color_at(&self, u: f32, v: f32) -> [f32; 3] {
        self.ramp.sample(self.sample(u, v))
    }

    pub fn statistics(&self) -> FieldStatistics {
        let slice = match self.values.as_slice() {
            Some(slice) => slice,
            None => return FieldStatistics::default(),
        };
        let cells = slice.len().max(1) as f32;
        let min = slice.par_iter().cloned().reduce(|| f32::INFINITY, f32::min);
        let max = slice
            .par_iter()
            .cloned()
            .reduce(|| f32::NEG_INFINITY, f32::max);
        let mean = slice.iter().sum::<f32>() / cells;
        let variance = slice
            .iter()
            .map(|value| {
                let diff = value - mean;
                diff * diff
            })
            .sum::<f32>()
            / cells;

        FieldStatistics {
            min,
            max,
            mean,
            variance,
        }
    }
}

impl Display for AuraField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.statistics();
        write!(
            f,
            "AuraField {}x{} ramp={} mean={:.3} variance={:.5}",
            self.resolution(),
            self.resolution(),
            self.ramp,
            stats.mean,
            stats.variance,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FieldStatistics {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub variance: f32,
}

/// Scrubs non-finite cells, then rescales to `[0, 1]` with an epsilon-guarded
/// range.
fn normalize_in_place(values: &mut Array2<f32>) {
    values.par_mapv_inplace(|value| if value.is_finite() { value } else { 0.0 });
    let min = values.iter().cloned().fold(f32::INFINITY, f32::min);
    let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    if !min.is_finite() || !max.is_finite() {
        return;
    }
    let denominator = (max - min) + NORMALIZE_EPSILON;
    values.par_mapv_inplace(|value| ((value - min) / denominator).clamp(0.0, 1.0));
}
