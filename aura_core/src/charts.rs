//! Emotion charts: the radar polygon and the aura energy spectrum bar.
//!
//! Geometry is computed in plain `f32` math so it can be tested on its own;
//! the PNG renderers only map it to pixels.

use std::f32::consts::TAU;
use std::path::Path;

use plotters::prelude::*;
use serde::Serialize;

use crate::emotion::{Dimension, EmotionVector};
use crate::error::{AuraError, AuraResult};

pub const RADAR_SIZE: (u32, u32) = (600, 600);
pub const SPECTRUM_SIZE: (u32, u32) = (900, 160);

const SPECTRUM_EPSILON: f32 = 1.0e-6;
const RADAR_RINGS: usize = 4;
const RADAR_MARGIN: f32 = 40.0;
const RADAR_COLOR: RGBColor = RGBColor(120, 80, 200);

/// Radar vertices, one per dimension in axis order. Axis `k` points at angle
/// `2πk/6` (y up) and its vertex sits at `radius · value` from `center`.
pub fn radar_polygon(
    emotions: &EmotionVector,
    center: (f32, f32),
    radius: f32,
) -> Vec<(f32, f32)> {
    emotions
        .iter()
        .map(|(dimension, value)| {
            let (sin, cos) = axis_angle(dimension).sin_cos();
            (
                center.0 + radius * value * cos,
                center.1 + radius * value * sin,
            )
        })
        .collect()
}

fn axis_angle(dimension: Dimension) -> f32 {
    TAU * dimension.index() as f32 / Dimension::COUNT as f32
}

/// One coloured span of the spectrum bar, in `[0, 1]` bar units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectrumSegment {
    pub dimension: Dimension,
    pub start: f32,
    pub width: f32,
}

/// Splits the unit bar proportionally to each value over `Σ + 1e-6`.
pub fn spectrum_segments(emotions: &EmotionVector) -> Vec<SpectrumSegment> {
    let total = emotions.total() + SPECTRUM_EPSILON;
    let mut start = 0.0;
    emotions
        .iter()
        .map(|(dimension, value)| {
            let width = value / total;
            let segment = SpectrumSegment {
                dimension,
                start,
                width,
            };
            start += width;
            segment
        })
        .collect()
}

pub fn render_radar_png<P: AsRef<Path>>(emotions: &EmotionVector, path: P) -> AuraResult<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let (width, height) = RADAR_SIZE;
    let center = (width as f32 / 2.0, height as f32 / 2.0);
    let radius = width.min(height) as f32 / 2.0 - RADAR_MARGIN;
    let to_pixel = |(x, y): (f32, f32)| (x.round() as i32, (height as f32 - y).round() as i32);

    let root = BitMapBackend::new(path, RADAR_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(AuraError::render)?;

    let full = EmotionVector::clamped([1.0; Dimension::COUNT]);
    for ring in 1..=RADAR_RINGS {
        let scale = radius * ring as f32 / RADAR_RINGS as f32;
        let mut outline: Vec<(i32, i32)> = radar_polygon(&full, center, scale)
            .into_iter()
            .map(to_pixel)
            .collect();
        if let Some(first) = outline.first().copied() {
            outline.push(first);
        }
        root.draw(&PathElement::new(outline, BLACK.mix(0.15).stroke_width(1)))
            .map_err(AuraError::render)?;
    }
    for vertex in radar_polygon(&full, center, radius) {
        root.draw(&PathElement::new(
            vec![to_pixel(center), to_pixel(vertex)],
            BLACK.mix(0.2).stroke_width(1),
        ))
        .map_err(AuraError::render)?;
    }

    let points: Vec<(i32, i32)> = radar_polygon(emotions, center, radius)
        .into_iter()
        .map(to_pixel)
        .collect();
    root.draw(&Polygon::new(points.clone(), RADAR_COLOR.mix(0.25).filled()))
        .map_err(AuraError::render)?;
    let mut closed = points;
    if let Some(first) = closed.first().copied() {
        closed.push(first);
    }
    root.draw(&PathElement::new(closed.clone(), RADAR_COLOR.stroke_width(3)))
        .map_err(AuraError::render)?;
    for point in closed {
        root.draw(&Circle::new(point, 4, RADAR_COLOR.filled()))
            .map_err(AuraError::render)?;
    }

    root.present().map_err(AuraError::render)?;
    tracing::debug!(path = %path.display(), "wrote emotion radar");
    Ok(())
}

pub fn render_spectrum_png<P: AsRef<Path>>(emotions: &EmotionVector, path: P) -> AuraResult<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let (width, height) = SPECTRUM_SIZE;
    let root = BitMapBackend::new(path, SPECTRUM_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(AuraError::render)?;

    let span = width as f32;
    let top = (height / 4) as i32;
    let bottom = (height - height / 4) as i32;
    for segment in spectrum_segments(emotions) {
        let x0 = (segment.start * span).round() as i32;
        let x1 = ((segment.start + segment.width) * span).round() as i32;
        if x1 <= x0 {
            continue;
        }
        let [r, g, b] = segment.dimension.spectrum_rgb();
        root.draw(&Rectangle::new(
            [(x0, top), (x1, bottom)],
            RGBColor(r, g, b).filled(),
        ))
        .map_err(AuraError::render)?;
    }

    root.present().map_err(AuraError::render)?;
    tracing::debug!(path = %path.display(), "wrote aura spectrum");
    Ok(())
}

fn ensure_parent(path: &Path) -> AuraResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(values: [f32; 6]) -> EmotionVector {
        EmotionVector::new(values).unwrap()
    }

    #[test]
    fn radar_vertices_stay_within_radius() {
        let emotions = vector([0.9, 0.1, 0.4, 1.0, 0.0, 0.6]);
        let points = radar_polygon(&emotions, (10.0, -5.0), 3.0);
        assert_eq!(points.len(), Dimension::COUNT);
        for ((x, y), (_, value)) in points.iter().zip(emotions.iter()) {
            let distance = ((x - 10.0).powi(2) + (y + 5.0).powi(2)).sqrt();
            assert!(distance <= 3.0 + 1e-5);
            assert!((distance - 3.0 * value).abs() < 1e-5);
        }
    }

    #[test]
    fn first_axis_points_right_and_second_rotates_counterclockwise() {
        let points = radar_polygon(&EmotionVector::clamped([1.0; 6]), (0.0, 0.0), 1.0);
        assert!((points[0].0 - 1.0).abs() < 1e-6 && points[0].1.abs() < 1e-6);
        assert!((points[1].0 - 0.5).abs() < 1e-6);
        assert!(points[1].1 > 0.8);
    }

    #[test]
    fn spectrum_widths_sum_to_one() {
        let segments = spectrum_segments(&vector([0.3, 0.1, 0.9, 0.0, 0.5, 0.2]));
        let total: f32 = segments.iter().map(|s| s.width).sum();
        assert!((total - 1.0).abs() < 1e-4);
        for pair in segments.windows(2) {
            assert!((pair[0].start + pair[0].width - pair[1].start).abs() < 1e-6);
        }
        assert_eq!(segments[3].width, 0.0);
    }

    #[test]
    fn segments_serialize_with_dimension_names() {
        let segments = spectrum_segments(&EmotionVector::NEUTRAL);
        let json = serde_json::to_value(&segments).unwrap();
        assert_eq!(json[0]["dimension"], "Fear");
        assert_eq!(json[5]["dimension"], "Transformation");
        assert!(json[2]["width"].is_number());
    }

    #[test]
    fn zero_vector_spectrum_is_empty_not_nan() {
        let segments = spectrum_segments(&vector([0.0; 6]));
        assert!(segments.iter().all(|s| s.width == 0.0 && s.start == 0.0));
    }

    #[test]
    fn renders_chart_files() {
        let dir = std::env::temp_dir().join(format!("aura_charts_{}", uuid::Uuid::new_v4()));
        let emotions = vector([0.2, 0.8, 0.4, 0.6, 0.1, 0.9]);
        render_radar_png(&emotions, dir.join("radar.png")).unwrap();
        render_spectrum_png(&emotions, dir.join("spectrum.png")).unwrap();
        for name in ["radar.png", "spectrum.png"] {
            assert!(std::fs::metadata(dir.join(name)).unwrap().len() > 0);
        }
        let _ = std::fs::remove_dir_all(dir);
    }
}
