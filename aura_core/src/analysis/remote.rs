//! Remote language-model analysis.
//!
//! The remote collaborator receives fixed instructions plus the dream text
//! and must answer with one JSON object. Every way that can go wrong is a
//! [`RemoteFailure`]; the caller decides what to do with it.

use std::time::Duration;

use serde_json::{json, Value};

use crate::config::AnalyzerConfig;
use crate::emotion::{Dimension, EmotionVector};
use crate::narrative::NarrativeReading;

pub const SYSTEM_INSTRUCTIONS: &str = r#"You are a dream analysis assistant for an art-and-data project.

Given a short dream description, output ONLY a valid JSON object with this structure:

{
  "symbolic_summary": "2-4 sentences explaining the main symbols and themes in the dream.",
  "emotions": {
    "Fear": 0.0-1.0,
    "Desire": 0.0-1.0,
    "Calm": 0.0-1.0,
    "Mystery": 0.0-1.0,
    "Connection": 0.0-1.0,
    "Transformation": 0.0-1.0
  },
  "tarot_shadow": "2-4 sentences describing the subconscious message of the dream.",
  "tarot_energy": "1-3 sentences describing the current aura energy.",
  "tarot_guidance": "1-3 sentences giving gentle, non-fatalistic advice."
}

Rules:
- All emotion values must be floating-point numbers between 0.0 and 1.0.
- The JSON must be syntactically valid (no trailing commas, no comments).
- Do NOT include any text outside the JSON.
- Tone: reflective, supportive, slightly poetic but still clear."#;

/// Timeout used when the configured one is not a valid duration.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Why a remote analysis was not usable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteFailure {
    #[error("no API credential in ${0}")]
    MissingCredential(String),
    #[error("remote call timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("remote returned HTTP {0}")]
    HttpStatus(u16),
    #[error("remote response contained no text")]
    EmptyResponse,
    #[error("remote response is not the expected JSON: {0}")]
    MalformedJson(String),
    #[error("remote response is missing field `{0}`")]
    MissingField(&'static str),
    #[error("remote response is missing emotion {0}")]
    MissingEmotion(Dimension),
    #[error("emotion {dimension} = {value} is outside [0, 1]")]
    EmotionOutOfRange { dimension: Dimension, value: f64 },
}

/// A validated remote answer.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteAnalysis {
    pub symbolic_summary: String,
    pub emotions: EmotionVector,
    pub reading: NarrativeReading,
}

/// A remote service that can analyze a dream once.
pub trait RemoteAnalyzer: Send + Sync {
    /// Human-readable model label, e.g. for display next to the reading.
    fn label(&self) -> String;

    fn analyze(&self, dream_text: &str) -> Result<RemoteAnalysis, RemoteFailure>;
}

/// Validates the JSON text produced by the remote model.
pub fn parse_remote_payload(payload: &str) -> Result<RemoteAnalysis, RemoteFailure> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(RemoteFailure::EmptyResponse);
    }

    let value: Value =
        serde_json::from_str(payload).map_err(|err| RemoteFailure::MalformedJson(err.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| RemoteFailure::MalformedJson("top level is not an object".into()))?;

    let text_field = |name: &'static str| -> Result<String, RemoteFailure> {
        object
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(RemoteFailure::MissingField(name))
    };

    let symbolic_summary = text_field("symbolic_summary")?;
    let emotions = object
        .get("emotions")
        .and_then(Value::as_object)
        .ok_or(RemoteFailure::MissingField("emotions"))?;

    let mut values = [0.0f32; Dimension::COUNT];
    for dimension in Dimension::ALL {
        let raw = emotions
            .get(dimension.name())
            .ok_or(RemoteFailure::MissingEmotion(dimension))?;
        let number = raw.as_f64().ok_or_else(|| {
            RemoteFailure::MalformedJson(format!("emotion {dimension} is not a number"))
        })?;
        if !number.is_finite() || !(0.0..=1.0).contains(&number) {
            return Err(RemoteFailure::EmotionOutOfRange {
                dimension,
                value: number,
            });
        }
        values[dimension.index()] = number as f32;
    }

    Ok(RemoteAnalysis {
        symbolic_summary,
        emotions: EmotionVector::clamped(values),
        reading: NarrativeReading {
            shadow: text_field("tarot_shadow")?,
            energy: text_field("tarot_energy")?,
            guidance: text_field("tarot_guidance")?,
        },
    })
}

/// OpenAI Responses API client. One blocking request per analysis, no retry.
#[derive(Debug, Clone)]
pub struct OpenAiResponsesAnalyzer {
    api_base: String,
    model: String,
    api_key_env: String,
    api_key: Option<String>,
    timeout: Duration,
    max_output_tokens: u32,
}

impl OpenAiResponsesAnalyzer {
    /// Builds the client, reading the credential from `config.api_key_env`.
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self::with_key(config, api_key)
    }

    pub fn with_key(config: &AnalyzerConfig, api_key: Option<String>) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key_env: config.api_key_env.clone(),
            api_key,
            timeout: request_timeout(config.timeout_secs),
            max_output_tokens: config.max_output_tokens,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/responses", self.api_base)
    }

    fn request_body(&self, dream_text: &str) -> Value {
        json!({
            "model": self.model,
            "input": [
                { "role": "developer", "content": SYSTEM_INSTRUCTIONS },
                { "role": "user", "content": dream_text },
            ],
            "max_output_tokens": self.max_output_tokens,
        })
    }
}

impl RemoteAnalyzer for OpenAiResponsesAnalyzer {
    fn label(&self) -> String {
        format!("OpenAI {} (Responses API)", self.model)
    }

    fn analyze(&self, dream_text: &str) -> Result<RemoteAnalysis, RemoteFailure> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RemoteFailure::MissingCredential(self.api_key_env.clone()))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| RemoteFailure::Transport(err.to_string()))?;

        let response = client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&self.request_body(dream_text))
            .send()
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteFailure::HttpStatus(status.as_u16()));
        }

        let body = response.text().map_err(classify_transport)?;
        let envelope: Value = serde_json::from_str(&body)
            .map_err(|err| RemoteFailure::MalformedJson(err.to_string()))?;
        let text = output_text(&envelope).ok_or(RemoteFailure::EmptyResponse)?;
        parse_remote_payload(&text)
    }
}

/// Converts the configured timeout; values that are not a valid positive
/// duration fall back to [`DEFAULT_TIMEOUT`].
fn request_timeout(secs: f64) -> Duration {
    match Duration::try_from_secs_f64(secs) {
        Ok(timeout) if !timeout.is_zero() => timeout,
        _ => {
            tracing::warn!(secs, "invalid analyzer timeout, using default");
            DEFAULT_TIMEOUT
        }
    }
}

fn classify_transport(err: reqwest::Error) -> RemoteFailure {
    if err.is_timeout() {
        RemoteFailure::Timeout
    } else {
        RemoteFailure::Transport(err.to_string())
    }
}

/// The model's text: `output_text` when present, otherwise every
/// `output[].content[].text` concatenated.
fn output_text(envelope: &Value) -> Option<String> {
    if let Some(text) = envelope.get("output_text").and_then(Value::as_str) {
        if !text.trim().is_empty() {
            return Some(text.to_string());
        }
    }

    let text: String = envelope
        .get("output")?
        .as_array()?
        .iter()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter_map(|content| content.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "symbolic_summary": "The ocean holds what you have not said.",
        "emotions": {
            "Fear": 0.1, "Desire": 0.4, "Calm": 0.9,
            "Mystery": 0.6, "Connection": 0.3, "Transformation": 0.2
        },
        "tarot_shadow": "Something waits below.",
        "tarot_energy": "Quiet and deep.",
        "tarot_guidance": "Rest near water."
    }"#;

    #[test]
    fn parses_valid_payload() {
        let analysis = parse_remote_payload(VALID).unwrap();
        assert_eq!(analysis.emotions.get(Dimension::Calm), 0.9);
        assert_eq!(analysis.reading.guidance, "Rest near water.");
        assert!(analysis.symbolic_summary.starts_with("The ocean"));
    }

    #[test]
    fn rejects_non_json_and_empty_text() {
        assert!(matches!(
            parse_remote_payload("Sure! Here is your analysis"),
            Err(RemoteFailure::MalformedJson(_))
        ));
        assert_eq!(parse_remote_payload("  "), Err(RemoteFailure::EmptyResponse));
        assert!(matches!(
            parse_remote_payload("[1, 2]"),
            Err(RemoteFailure::MalformedJson(_))
        ));
    }

    #[test]
    fn rejects_missing_emotion_key() {
        let payload = VALID.replace("\"Connection\": 0.3, ", "");
        assert_eq!(
            parse_remote_payload(&payload),
            Err(RemoteFailure::MissingEmotion(Dimension::Connection))
        );
    }

    #[test]
    fn rejects_out_of_range_emotion() {
        let payload = VALID.replace("\"Fear\": 0.1", "\"Fear\": 1.5");
        assert_eq!(
            parse_remote_payload(&payload),
            Err(RemoteFailure::EmotionOutOfRange {
                dimension: Dimension::Fear,
                value: 1.5
            })
        );
    }

    #[test]
    fn rejects_missing_text_fields() {
        let payload = VALID.replace("\"tarot_energy\"", "\"energy\"");
        assert_eq!(
            parse_remote_payload(&payload),
            Err(RemoteFailure::MissingField("tarot_energy"))
        );
    }

    #[test]
    fn output_text_prefers_top_level_then_concatenates() {
        let direct = json!({ "output_text": "{}" });
        assert_eq!(output_text(&direct).as_deref(), Some("{}"));

        let nested = json!({
            "output": [
                { "type": "message", "content": [
                    { "type": "output_text", "text": "{\"a\":" },
                    { "type": "output_text", "text": " 1}" }
                ]}
            ]
        });
        assert_eq!(output_text(&nested).as_deref(), Some("{\"a\": 1}"));
        assert_eq!(output_text(&json!({ "output": [] })), None);
    }

    #[test]
    fn missing_credential_fails_without_network() {
        let analyzer = OpenAiResponsesAnalyzer::with_key(&AnalyzerConfig::default(), None);
        assert!(!analyzer.has_credential());
        assert_eq!(
            analyzer.analyze("I was flying"),
            Err(RemoteFailure::MissingCredential("OPENAI_API_KEY".into()))
        );
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_failure() {
        let config = AnalyzerConfig {
            api_base: "http://127.0.0.1:9".into(),
            timeout_secs: 2.0,
            ..AnalyzerConfig::default()
        };
        let analyzer = OpenAiResponsesAnalyzer::with_key(&config, Some("test-key".into()));
        let failure = analyzer.analyze("I was flying").unwrap_err();
        assert!(matches!(
            failure,
            RemoteFailure::Transport(_) | RemoteFailure::Timeout
        ));
    }

    #[test]
    fn invalid_timeouts_fall_back_to_default() {
        for secs in [-1.0, 0.0, f64::NAN, f64::INFINITY, 1e300] {
            let config = AnalyzerConfig {
                timeout_secs: secs,
                ..AnalyzerConfig::default()
            };
            let analyzer = OpenAiResponsesAnalyzer::with_key(&config, None);
            assert_eq!(analyzer.timeout, DEFAULT_TIMEOUT);
        }
        assert_eq!(request_timeout(2.5), Duration::from_millis(2500));
    }

    #[test]
    fn request_body_carries_instructions_and_text() {
        let analyzer =
            OpenAiResponsesAnalyzer::with_key(&AnalyzerConfig::default(), Some("k".into()));
        let body = analyzer.request_body("a red door");
        assert_eq!(body["model"], "gpt-4.1-mini");
        assert_eq!(body["input"][0]["content"], SYSTEM_INSTRUCTIONS);
        assert_eq!(body["input"][1]["content"], "a red door");
        assert_eq!(body["max_output_tokens"], 600);
        assert_eq!(analyzer.endpoint(), "https://api.openai.com/v1/responses");
    }
}
