use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::field::FieldStatistics;
use crate::poster::Poster;

pub const RENDER_LOG_FILE: &str = "renders.jsonl";

fn append_json_line<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    serde_json::to_writer(&mut file, value)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    file.write_all(b"\n")
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderLogEntry {
    pub timestamp_ms: u128,
    /// SHA-256 hex digest of the dream text; the text itself is never logged.
    pub fingerprint: String,
    pub seed: u64,
    pub style: String,
    pub ramp: String,
    pub model: String,
    pub field: FieldStatistics,
    pub shapes: usize,
}

impl RenderLogEntry {
    pub fn new(fingerprint: &str, model: &str, field: FieldStatistics, poster: &Poster) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis(),
            fingerprint: fingerprint.to_string(),
            seed: poster.seed,
            style: poster.style.to_string(),
            ramp: poster.ramp.to_string(),
            model: model.to_string(),
            field,
            shapes: poster.shapes.len(),
        }
    }
}

/// Appends `entry` to `<dir>/renders.jsonl`, creating `dir` if needed.
pub fn log_render<P: AsRef<Path>>(dir: P, entry: &RenderLogEntry) -> io::Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(RENDER_LOG_FILE);
    append_json_line(&path, entry)?;
    Ok(path)
}
