//! Dream analysis: remote model first when configured, local rules always
//! available as the fallback.

pub mod remote;

use std::fmt::{self, Display};

use serde::Serialize;

use crate::config::AnalyzerConfig;
use crate::emotion::{self, EmotionVector};
use crate::error::{AuraError, AuraResult};
use crate::narrative::{self, NarrativeReading, Symbol};
pub use remote::{
    parse_remote_payload, OpenAiResponsesAnalyzer, RemoteAnalysis, RemoteAnalyzer, RemoteFailure,
    SYSTEM_INSTRUCTIONS,
};

pub const RULE_BASED_LABEL: &str = "Rule-based fallback model";

/// Which path produced an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelUsed {
    Remote { model: String },
    RuleBased,
}

impl ModelUsed {
    pub fn label(&self) -> &str {
        match self {
            ModelUsed::Remote { model } => model,
            ModelUsed::RuleBased => RULE_BASED_LABEL,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ModelUsed::Remote { .. })
    }
}

impl Display for ModelUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Complete analysis of one dream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DreamAnalysis {
    pub symbolic_summary: String,
    pub emotions: EmotionVector,
    pub reading: NarrativeReading,
    pub symbols: Vec<Symbol>,
    pub model_used: ModelUsed,
}

/// Runs the remote analyzer once when present and falls back to the local
/// extractor and narrative on any failure.
#[derive(Default)]
pub struct DreamAnalyzer {
    remote: Option<Box<dyn RemoteAnalyzer>>,
}

impl DreamAnalyzer {
    /// Local rules only.
    pub fn rule_based() -> Self {
        Self { remote: None }
    }

    pub fn with_remote(remote: Box<dyn RemoteAnalyzer>) -> Self {
        Self {
            remote: Some(remote),
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        if config.remote_enabled {
            Self::with_remote(Box::new(OpenAiResponsesAnalyzer::from_config(config)))
        } else {
            Self::rule_based()
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Analyzes `text`; only empty input is an error.
    pub fn analyze(&self, text: &str) -> AuraResult<DreamAnalysis> {
        if text.trim().is_empty() {
            return Err(AuraError::EmptyDream);
        }

        let symbols = narrative::detect_symbols(text);

        if let Some(remote) = &self.remote {
            match remote.analyze(text) {
                Ok(answer) => {
                    let model = remote.label();
                    tracing::info!(model = %model, "remote analysis succeeded");
                    return Ok(DreamAnalysis {
                        symbolic_summary: answer.symbolic_summary,
                        emotions: answer.emotions,
                        reading: answer.reading,
                        symbols,
                        model_used: ModelUsed::Remote { model },
                    });
                }
                Err(failure) => {
                    tracing::warn!(%failure, "remote analysis failed, using rule-based fallback");
                }
            }
        }

        Ok(analyze_locally(text, symbols))
    }
}

impl fmt::Debug for DreamAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DreamAnalyzer")
            .field("remote", &self.remote.as_ref().map(|remote| remote.label()))
            .finish()
    }
}

fn analyze_locally(text: &str, symbols: Vec<Symbol>) -> DreamAnalysis {
    let emotions = emotion::extract(text);
    DreamAnalysis {
        symbolic_summary: narrative::summarize(&emotions, &symbols),
        reading: narrative::narrate(&emotions, &symbols),
        emotions,
        symbols,
        model_used: ModelUsed::RuleBased,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedRemote {
        outcome: Result<String, RemoteFailure>,
        calls: Arc<AtomicUsize>,
    }

    impl RemoteAnalyzer for ScriptedRemote {
        fn label(&self) -> String {
            "scripted-model".to_string()
        }

        fn analyze(&self, _dream_text: &str) -> Result<RemoteAnalysis, RemoteFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Ok(payload) => parse_remote_payload(payload),
                Err(failure) => Err(failure.clone()),
            }
        }
    }

    fn scripted(outcome: Result<String, RemoteFailure>) -> (DreamAnalyzer, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let remote = ScriptedRemote {
            outcome,
            calls: Arc::clone(&calls),
        };
        (DreamAnalyzer::with_remote(Box::new(remote)), calls)
    }

    const DREAM: &str = "I was falling into a dark ocean with my friend";

    #[test]
    fn empty_text_is_rejected_before_any_call() {
        let (analyzer, calls) = scripted(Err(RemoteFailure::Timeout));
        assert!(matches!(analyzer.analyze("   \n"), Err(AuraError::EmptyDream)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn rule_based_analysis_is_labelled() {
        let analysis = DreamAnalyzer::rule_based().analyze(DREAM).unwrap();
        assert_eq!(analysis.model_used, ModelUsed::RuleBased);
        assert_eq!(analysis.model_used.label(), "Rule-based fallback model");
        assert_eq!(analysis.emotions, emotion::extract(DREAM));
        assert!(!analysis.reading.shadow.is_empty());
        assert!(analysis.symbols.iter().any(|symbol| symbol.name == "ocean"));
    }

    #[test]
    fn every_failure_kind_falls_back_after_one_call() {
        let failures = [
            RemoteFailure::MissingCredential("OPENAI_API_KEY".into()),
            RemoteFailure::Timeout,
            RemoteFailure::Transport("connection reset".into()),
            RemoteFailure::HttpStatus(503),
            RemoteFailure::EmptyResponse,
            RemoteFailure::MalformedJson("eof".into()),
            RemoteFailure::MissingField("tarot_shadow"),
            RemoteFailure::MissingEmotion(crate::Dimension::Calm),
        ];
        let local = DreamAnalyzer::rule_based().analyze(DREAM).unwrap();
        for failure in failures {
            let (analyzer, calls) = scripted(Err(failure));
            let analysis = analyzer.analyze(DREAM).unwrap();
            assert_eq!(calls.load(Ordering::SeqCst), 1);
            assert_eq!(analysis, local);
        }
    }

    #[test]
    fn missing_emotion_key_in_payload_falls_back() {
        let payload = r#"{"symbolic_summary": "s", "emotions": {"Fear": 0.5},
            "tarot_shadow": "a", "tarot_energy": "b", "tarot_guidance": "c"}"#;
        let (analyzer, _) = scripted(Ok(payload.to_string()));
        let analysis = analyzer.analyze(DREAM).unwrap();
        assert_eq!(analysis.model_used, ModelUsed::RuleBased);
    }

    #[test]
    fn valid_remote_answer_is_used() {
        let payload = r#"{"symbolic_summary": "Deep water.",
            "emotions": {"Fear": 0.7, "Desire": 0.1, "Calm": 0.2, "Mystery": 0.8,
                         "Connection": 0.4, "Transformation": 0.3},
            "tarot_shadow": "a", "tarot_energy": "b", "tarot_guidance": "c"}"#;
        let (analyzer, calls) = scripted(Ok(payload.to_string()));
        let analysis = analyzer.analyze(DREAM).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(analysis.model_used.is_remote());
        assert_eq!(analysis.model_used.label(), "scripted-model");
        assert_eq!(analysis.symbolic_summary, "Deep water.");
        assert_eq!(analysis.reading.energy, "b");
        assert!(!analysis.symbols.is_empty());
    }

    #[test]
    fn disabled_remote_builds_rule_based_analyzer() {
        let config = AnalyzerConfig {
            remote_enabled: false,
            ..AnalyzerConfig::default()
        };
        assert!(!DreamAnalyzer::from_config(&config).has_remote());
    }

    #[test]
    fn analysis_serializes_with_model_tag() {
        let analysis = DreamAnalyzer::rule_based().analyze(DREAM).unwrap();
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["model_used"]["kind"], "rule_based");
        assert!(json["emotions"]["Fear"].is_number());
        assert!(json["reading"]["guidance"].is_string());
    }
}
