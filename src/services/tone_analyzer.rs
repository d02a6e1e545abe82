//! Tone Analyzer V3

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::auth::CredentialKind;
use crate::error::WatsonError;
use crate::execution::HttpMethod;
use crate::options::ServiceOptions;
use crate::params::validate_required;
use crate::service::{Endpoint, ServiceCore, ServiceInfo};
use crate::types::FileValue;

const TONE: Endpoint = Endpoint::new(HttpMethod::Post, "/v3/tone", &[]);

/// Content to analyze.
#[derive(Debug, Clone, PartialEq)]
pub enum ToneInput {
    /// Sent as `{"text": ...}` with `application/json`.
    Text(String),
    /// Sent as `text/plain;charset=utf-8`.
    Plain(String),
    /// Sent as `text/html;charset=utf-8`; tags are stripped by the service.
    Html(String),
}

impl ToneInput {
    fn content(&self) -> &str {
        match self {
            Self::Text(s) | Self::Plain(s) | Self::Html(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneScore {
    pub score: f64,
    pub tone_id: String,
    pub tone_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    #[serde(default)]
    pub tones: Vec<ToneScore>,
    #[serde(default)]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceAnalysis {
    pub sentence_id: u64,
    pub text: String,
    #[serde(default)]
    pub tones: Vec<ToneScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneAnalysis {
    pub document_tone: DocumentAnalysis,
    #[serde(default)]
    pub sentences_tone: Vec<SentenceAnalysis>,
    #[serde(default)]
    pub warning: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct ToneOptions {
    /// Analyze individual sentences too (service default: true).
    pub sentences: Option<bool>,
    pub tones: Option<Vec<String>>,
    pub content_language: Option<String>,
    pub accept_language: Option<String>,
}

/// Tone Analyzer client.
#[derive(Debug, Clone)]
pub struct ToneAnalyzerV3 {
    core: ServiceCore,
}

impl ToneAnalyzerV3 {
    pub const INFO: ServiceInfo = ServiceInfo {
        name: "tone_analyzer",
        default_url: "https://gateway.watsonplatform.net/tone-analyzer/api",
        credential_kind: CredentialKind::UsernamePassword,
        versioned: true,
    };

    /// Requires `version` (e.g. `2017-09-21`).
    pub fn new(options: ServiceOptions) -> Result<Self, WatsonError> {
        Ok(Self {
            core: ServiceCore::new(Self::INFO, options)?,
        })
    }

    pub fn core(&self) -> &ServiceCore {
        &self.core
    }

    /// Analyze general purpose tone.
    pub async fn tone(
        &self,
        input: ToneInput,
        options: &ToneOptions,
    ) -> Result<ToneAnalysis, WatsonError> {
        validate_required(Some(&json!({ "tone_input": input.content() })), &["tone_input"])?;

        let mut request = TONE
            .request()
            .query_opt("sentences", options.sentences)
            .query_opt("tones", options.tones.as_ref().map(|t| t.join(",")));
        if let Some(language) = &options.content_language {
            request = request.header("Content-Language", language.as_str());
        }
        if let Some(language) = &options.accept_language {
            request = request.header("Accept-Language", language.as_str());
        }

        let request = match input {
            ToneInput::Text(text) => request.json(json!({ "text": text })),
            ToneInput::Plain(text) => request.raw(
                FileValue::Text(text),
                Some("text/plain;charset=utf-8".to_string()),
            ),
            ToneInput::Html(html) => request.raw(
                FileValue::Text(html),
                Some("text/html;charset=utf-8".to_string()),
            ),
        };
        self.core.call(request, TONE.required).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialResolver;

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let tone = ToneAnalyzerV3::new(
            ServiceOptions::new()
                .version("2017-09-21")
                .basic_auth("u", "p")
                .url("http://127.0.0.1:9")
                .credential_resolver(CredentialResolver::empty()),
        )
        .unwrap();
        let err = tone
            .tone(ToneInput::Plain(String::new()), &ToneOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, WatsonError::missing_parameters(["tone_input"]));
    }
}
