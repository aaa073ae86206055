//! Colour ramps applied to the normalized aura field.
//!
//! Each ramp is a fixed piecewise-linear sequence of sRGB stops sampled
//! analytically, so the same field value always maps to the same colour on
//! every platform.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::emotion::{Dimension, EmotionVector};

/// Share of total energy above which Fear + Mystery select the cool/dark ramp.
pub const SHADOW_SHARE: f32 = 0.5;
/// Share of total energy above which Desire + Connection select the warm ramp.
pub const WARM_SHARE: f32 = 0.5;
/// Share of total energy above which Calm selects the clean cool ramp.
pub const CALM_SHARE: f32 = 0.4;

const SHARE_EPSILON: f32 = 1.0e-6;

type Stop = (f32, [f32; 3]);

const TWILIGHT: &[Stop] = &[
    (0.00, [0.886, 0.851, 0.888]),
    (0.15, [0.620, 0.700, 0.800]),
    (0.30, [0.370, 0.494, 0.737]),
    (0.45, [0.255, 0.215, 0.460]),
    (0.55, [0.184, 0.078, 0.212]),
    (0.70, [0.460, 0.170, 0.320]),
    (0.85, [0.694, 0.325, 0.341]),
    (1.00, [0.886, 0.851, 0.888]),
];

const PLASMA: &[Stop] = &[
    (0.00, [0.050, 0.030, 0.528]),
    (0.25, [0.494, 0.012, 0.658]),
    (0.50, [0.798, 0.280, 0.470]),
    (0.75, [0.973, 0.585, 0.252]),
    (1.00, [0.940, 0.975, 0.131]),
];

const VIRIDIS: &[Stop] = &[
    (0.00, [0.267, 0.005, 0.329]),
    (0.25, [0.229, 0.322, 0.546]),
    (0.50, [0.128, 0.567, 0.551]),
    (0.75, [0.369, 0.789, 0.383]),
    (1.00, [0.993, 0.906, 0.144]),
];

const MAGMA: &[Stop] = &[
    (0.00, [0.001, 0.000, 0.014]),
    (0.25, [0.232, 0.060, 0.437]),
    (0.50, [0.716, 0.215, 0.475]),
    (0.75, [0.994, 0.624, 0.427]),
    (1.00, [0.987, 0.991, 0.750]),
];

/// Colour ramp chosen from the dominant emotion group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRamp {
    /// Cool and dark; Fear + Mystery dominate.
    Twilight,
    /// Warm; Desire + Connection dominate.
    Plasma,
    /// Clean and cool; Calm dominates.
    Viridis,
    /// Mixed state.
    Magma,
}

impl ColorRamp {
    /// Discrete decision table over sum-normalized emotion shares, checked
    /// in priority order: shadow, warm, calm, then the mixed default.
    pub fn choose(emotions: &EmotionVector) -> Self {
        let total = emotions.total() + SHARE_EPSILON;
        let share = |dimension: Dimension| emotions.get(dimension) / total;

        if share(Dimension::Fear) + share(Dimension::Mystery) > SHADOW_SHARE {
            ColorRamp::Twilight
        } else if share(Dimension::Desire) + share(Dimension::Connection) > WARM_SHARE {
            ColorRamp::Plasma
        } else if share(Dimension::Calm) > CALM_SHARE {
            ColorRamp::Viridis
        } else {
            ColorRamp::Magma
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorRamp::Twilight => "twilight",
            ColorRamp::Plasma => "plasma",
            ColorRamp::Viridis => "viridis",
            ColorRamp::Magma => "magma",
        }
    }

    fn stops(self) -> &'static [Stop] {
        match self {
            ColorRamp::Twilight => TWILIGHT,
            ColorRamp::Plasma => PLASMA,
            ColorRamp::Viridis => VIRIDIS,
            ColorRamp::Magma => MAGMA,
        }
    }

    /// Samples the ramp at `t`, clamped to `[0, 1]`; NaN samples the start.
    pub fn sample(self, t: f32) -> [f32; 3] {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let stops = self.stops();

        for pair in stops.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            if t <= t1 {
                let span = (t1 - t0).max(f32::EPSILON);
                let w = ((t - t0) / span).clamp(0.0, 1.0);
                return [
                    c0[0] * (1.0 - w) + c1[0] * w,
                    c0[1] * (1.0 - w) + c1[1] * w,
                    c0[2] * (1.0 - w) + c1[2] * w,
                ];
            }
        }

        stops.last().map(|(_, color)| *color).unwrap_or([0.0; 3])
    }
}

impl Display for ColorRamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
