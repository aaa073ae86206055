//! # Aura Tarot Core
//!
//! A deterministic engine that turns a short dream description into a
//! six-dimensional emotion profile, procedural "aura" posters and a
//! tarot-style reading. Identical text always yields the identical seed,
//! field and accents.
//!
//! ## Quick Start
//!
//! ```rust
//! use aura_core::{derive_seed, extract_emotions, Poster, PosterStyle, RenderConfig};
//!
//! let text = "I was falling toward a dark ocean, but a light pulled me up";
//! let emotions = extract_emotions(text);
//! let seed = derive_seed(text);
//!
//! let config = RenderConfig {
//!     field_resolution: 64,
//!     dpi: 20,
//!     ..RenderConfig::default()
//! };
//! let poster = Poster::compose(&emotions, PosterStyle::Hybrid, seed, &config);
//! println!("dominant: {}, ramp: {}", emotions.dominant(), poster.ramp);
//! ```
//!
//! ## Core Modules
//!
//! - [`emotion`] - Keyword scoring into an [`EmotionVector`]
//! - [`seed`] - SHA-256 seed derivation
//! - [`field`] - Aura field synthesis and colour ramps
//! - [`accents`] - Seeded geometric accent layer
//! - [`poster`] - Composition, styles and PNG export
//! - [`narrative`] - Symbols and the Shadow / Energy / Guidance reading
//! - [`analysis`] - Remote analysis with local fallback
//! - [`charts`] - Emotion radar and spectrum bar
//! - [`pipeline`] - One-call rendering
//! - [`config`] - Engine configuration via TOML
//! - [`logging`] - JSON line-delimited render log

pub mod accents;
pub mod analysis;
pub mod charts;
pub mod config;
pub mod emotion;
pub mod error;
pub mod field;
pub mod logging;
pub mod narrative;
pub mod pipeline;
pub mod poster;
pub mod seed;

pub use accents::{generate_accents, AccentShape, ShapeKind};
pub use analysis::{
    DreamAnalysis, DreamAnalyzer, ModelUsed, OpenAiResponsesAnalyzer, RemoteAnalysis,
    RemoteAnalyzer, RemoteFailure,
};
pub use charts::{radar_polygon, render_radar_png, render_spectrum_png, spectrum_segments};
pub use config::{AnalyzerConfig, AuraConfig, ConfigError, LoggingConfig, RenderConfig};
pub use emotion::{extract as extract_emotions, Dimension, EmotionScores, EmotionVector};
pub use error::{AuraError, AuraResult};
pub use field::{AuraField, ColorRamp, FieldStatistics};
pub use narrative::{detect_symbols, narrate, summarize, NarrativeReading, Symbol};
pub use pipeline::{render_dream, DreamRender};
pub use poster::{compose_variations, Poster, PosterStyle, StylePolicy};
pub use seed::{derive_seed, digest_hex, variation_seeds, VARIATION_OFFSET};
