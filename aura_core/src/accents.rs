//! Seeded geometric accents drawn over the aura field.
//!
//! All draws come from a [`StdRng`] created from the seed for each call, so
//! identical `(emotions, seed, density_scale)` always give the same shapes.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::emotion::{Dimension, EmotionVector};

/// Candidate shapes per unit of density before the Transformation bonus.
pub const BASE_CANDIDATES: f32 = 6.0;
/// Extra candidates per unit of Transformation × density.
pub const EXTRA_PER_TRANSFORMATION: f32 = 10.0;
/// Smallest width or height a shape may have, in poster units.
pub const MIN_SHAPE_SIZE: f32 = 0.01;

/// Accent colours: soft pink, light blue, gentle green, peach, lavender.
pub const PALETTE: [[f32; 3]; 5] = [
    [0.96, 0.74, 0.80],
    [0.80, 0.86, 0.97],
    [0.88, 0.90, 0.78],
    [0.98, 0.88, 0.70],
    [0.86, 0.80, 0.92],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
}

/// One semi-transparent accent in poster coordinates (`[0, 1]²`, y up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccentShape {
    pub kind: ShapeKind,
    pub center: [f32; 2],
    pub width: f32,
    pub height: f32,
    pub color: [f32; 3],
    pub alpha: f32,
}

impl AccentShape {
    /// Whether poster point `(x, y)` lies inside the shape.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dx = (x - self.center[0]) / (self.width * 0.5);
        let dy = (y - self.center[1]) / (self.height * 0.5);
        match self.kind {
            ShapeKind::Rectangle => dx.abs() <= 1.0 && dy.abs() <= 1.0,
            ShapeKind::Ellipse => dx * dx + dy * dy <= 1.0,
        }
    }

    /// Axis-aligned bounds `(x_min, y_min, x_max, y_max)`.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        let hw = self.width * 0.5;
        let hh = self.height * 0.5;
        (
            self.center[0] - hw,
            self.center[1] - hh,
            self.center[0] + hw,
            self.center[1] + hh,
        )
    }
}

/// Number of candidate shapes before the calm-driven skipping.
pub fn candidate_count(emotions: &EmotionVector, density_scale: f32) -> usize {
    let density = sanitize_density(density_scale);
    let transform = emotions.get(Dimension::Transformation);
    let base = (BASE_CANDIDATES * density).floor() as usize;
    let extra = (EXTRA_PER_TRANSFORMATION * transform * density).floor() as usize;
    base + extra
}

/// Generates the accent layer for `emotions` from `seed`.
///
/// # Examples
///
/// ```
/// use aura_core::{generate_accents, EmotionVector};
///
/// let emotions = EmotionVector::new([0.5, 0.5, 0.0, 0.2, 0.1, 1.0]).unwrap();
/// let a = generate_accents(&emotions, 7, 1.4);
/// let b = generate_accents(&emotions, 7, 1.4);
/// assert_eq!(a, b);
/// ```
pub fn generate_accents(
    emotions: &EmotionVector,
    seed: u64,
    density_scale: f32,
) -> Vec<AccentShape> {
    let mut rng = StdRng::seed_from_u64(seed);

    let fear = emotions.get(Dimension::Fear);
    let desire = emotions.get(Dimension::Desire);
    let calm = emotions.get(Dimension::Calm);
    let mystery = emotions.get(Dimension::Mystery);

    let candidates = candidate_count(emotions, density_scale);
    let skip_probability = 0.3 + 0.3 * calm;
    let ellipse_probability = (0.2 + 0.5 * mystery) as f64;
    let base_size = 0.08 + 0.12 * (fear + desire);
    let alpha = (0.06 + 0.22 * (fear + desire)).clamp(0.0, 1.0);

    let mut shapes = Vec::with_capacity(candidates);
    for _ in 0..candidates {
        if rng.gen::<f32>() < skip_probability {
            continue;
        }

        let cx = rng.gen_range(0.1f32..0.9);
        let cy = rng.gen_range(0.1f32..0.9);
        let width = (base_size * rng.gen_range(0.7f32..1.4)).max(MIN_SHAPE_SIZE);
        let height = (base_size * rng.gen_range(0.6f32..1.4)).max(MIN_SHAPE_SIZE);
        let color = *PALETTE.choose(&mut rng).unwrap_or(&PALETTE[0]);
        let kind = if rng.gen_bool(ellipse_probability.clamp(0.0, 1.0)) {
            ShapeKind::Ellipse
        } else {
            ShapeKind::Rectangle
        };

        shapes.push(AccentShape {
            kind,
            center: [cx, cy],
            width,
            height,
            color,
            alpha,
        });
    }

    tracing::debug!(
        seed,
        candidates,
        drawn = shapes.len(),
        "generated accent layer"
    );
    shapes
}

fn sanitize_density(density_scale: f32) -> f32 {
    if density_scale.is_finite() {
        density_scale.max(0.0)
    } else {
        0.0
    }
}
