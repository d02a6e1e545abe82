//! Speech to Text V1
//!
//! Models and sessionless recognition. Audio is sent as the raw request
//! body, streamed from disk for file-backed values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::CredentialKind;
use crate::error::WatsonError;
use crate::execution::HttpMethod;
use crate::options::ServiceOptions;
use crate::service::{Endpoint, ServiceCore, ServiceInfo};
use crate::types::FileValue;

const LIST_MODELS: Endpoint = Endpoint::new(HttpMethod::Get, "/v1/models", &[]);
const GET_MODEL: Endpoint = Endpoint::new(HttpMethod::Get, "/v1/models/{model_id}", &["model_id"]);
const RECOGNIZE: Endpoint = Endpoint::new(HttpMethod::Post, "/v1/recognize", &[]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechModel {
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub rate: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub supported_features: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechModels {
    #[serde(default)]
    pub models: Vec<SpeechModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechAlternative {
    pub transcript: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechResult {
    #[serde(rename = "final", default)]
    pub is_final: bool,
    #[serde(default)]
    pub alternatives: Vec<SpeechAlternative>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRecognitionResults {
    #[serde(default)]
    pub result_index: Option<u64>,
    #[serde(default)]
    pub results: Vec<SpeechResult>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Query options for [`SpeechToTextV1::recognize`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecognizeOptions {
    pub model: Option<String>,
    pub customization_id: Option<String>,
    pub inactivity_timeout: Option<i64>,
    pub keywords: Option<Vec<String>>,
    pub keywords_threshold: Option<f64>,
    pub max_alternatives: Option<u32>,
    pub word_confidence: Option<bool>,
    pub timestamps: Option<bool>,
    pub profanity_filter: Option<bool>,
    pub smart_formatting: Option<bool>,
    pub speaker_labels: Option<bool>,
}

/// Speech to Text client.
#[derive(Debug, Clone)]
pub struct SpeechToTextV1 {
    core: ServiceCore,
}

impl SpeechToTextV1 {
    pub const INFO: ServiceInfo = ServiceInfo {
        name: "speech_to_text",
        default_url: "https://stream.watsonplatform.net/speech-to-text/api",
        credential_kind: CredentialKind::UsernamePassword,
        versioned: false,
    };

    pub fn new(options: ServiceOptions) -> Result<Self, WatsonError> {
        Ok(Self {
            core: ServiceCore::new(Self::INFO, options)?,
        })
    }

    pub fn core(&self) -> &ServiceCore {
        &self.core
    }

    pub async fn list_models(&self) -> Result<SpeechModels, WatsonError> {
        self.core.call(LIST_MODELS.request(), LIST_MODELS.required).await
    }

    pub async fn get_model(&self, model_id: &str) -> Result<SpeechModel, WatsonError> {
        let request = GET_MODEL.request().path_param("model_id", model_id);
        self.core.call(request, GET_MODEL.required).await
    }

    /// Transcribe audio. Without `content_type` the type is sniffed from the
    /// audio (FLAC, WAV, Ogg, MP3 and WebM signatures) or the file extension.
    pub async fn recognize(
        &self,
        audio: impl Into<FileValue>,
        content_type: Option<&str>,
        options: &RecognizeOptions,
    ) -> Result<SpeechRecognitionResults, WatsonError> {
        let request = RECOGNIZE
            .request()
            .raw(audio.into(), content_type.map(str::to_string))
            .query_from(options)?;
        self.core.call(request, RECOGNIZE.required).await
    }
}
