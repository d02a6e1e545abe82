//! Visual Recognition V3
//!
//! Authenticates with an `api_key` query parameter or IAM.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::CredentialKind;
use crate::error::WatsonError;
use crate::execution::HttpMethod;
use crate::options::ServiceOptions;
use crate::service::{Endpoint, ServiceCore, ServiceInfo};
use crate::types::FileParam;

const CLASSIFY: Endpoint = Endpoint::new(HttpMethod::Post, "/v3/classify", &[]);
const DETECT_FACES: Endpoint = Endpoint::new(HttpMethod::Post, "/v3/detect_faces", &[]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassResult {
    pub class: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub type_hierarchy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierResult {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub classifier_id: Option<String>,
    #[serde(default)]
    pub classes: Vec<ClassResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedImage {
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub resolved_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub classifiers: Vec<ClassifierResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedImages {
    #[serde(default)]
    pub custom_classes: Option<u64>,
    #[serde(default)]
    pub images_processed: Option<u64>,
    #[serde(default)]
    pub images: Vec<ClassifiedImage>,
    #[serde(default)]
    pub warnings: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageWithFaces {
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub faces: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFaces {
    #[serde(default)]
    pub images_processed: Option<u64>,
    #[serde(default)]
    pub images: Vec<ImageWithFaces>,
    #[serde(default)]
    pub warnings: Vec<Value>,
}

/// Input for [`VisualRecognitionV3::classify`] and [`VisualRecognitionV3::detect_faces`].
#[derive(Debug, Default)]
pub struct ImagesParams {
    /// An image, or a `.zip` of images.
    pub images_file: Option<FileParam>,
    /// JSON parameters such as `url`, `classifier_ids`, `owners`, `threshold`.
    pub parameters: Option<Value>,
    /// Language of the returned class names; `classify` only.
    pub accept_language: Option<String>,
}

/// Visual Recognition client.
#[derive(Debug, Clone)]
pub struct VisualRecognitionV3 {
    core: ServiceCore,
}

impl VisualRecognitionV3 {
    pub const INFO: ServiceInfo = ServiceInfo {
        name: "visual_recognition",
        default_url: "https://gateway-a.watsonplatform.net/visual-recognition/api",
        credential_kind: CredentialKind::ApiKey,
        versioned: true,
    };

    /// Requires `version` and either `api_key` or IAM credentials.
    pub fn new(options: ServiceOptions) -> Result<Self, WatsonError> {
        Ok(Self {
            core: ServiceCore::new(Self::INFO, options)?,
        })
    }

    pub fn core(&self) -> &ServiceCore {
        &self.core
    }

    /// Classify images with the built-in or custom classifiers.
    pub async fn classify(&self, params: ImagesParams) -> Result<ClassifiedImages, WatsonError> {
        let mut request = CLASSIFY.request();
        if let Some(language) = params.accept_language {
            request = request.header("Accept-Language", language);
        }
        let request = with_images(request, params.images_file, params.parameters);
        self.core.call(request, CLASSIFY.required).await
    }

    /// Detect faces in images.
    pub async fn detect_faces(&self, params: ImagesParams) -> Result<DetectedFaces, WatsonError> {
        let request = with_images(DETECT_FACES.request(), params.images_file, params.parameters);
        self.core.call(request, DETECT_FACES.required).await
    }
}

fn with_images(
    request: crate::execution::ServiceRequest,
    images_file: Option<FileParam>,
    parameters: Option<Value>,
) -> crate::execution::ServiceRequest {
    let parameters = parameters.map(|p| match p {
        Value::String(s) => Value::String(s),
        other => Value::String(other.to_string()),
    });
    request
        .multipart_file_opt("images_file", images_file)
        .multipart_value_opt("parameters", parameters)
}
