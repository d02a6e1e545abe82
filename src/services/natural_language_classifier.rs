//! Natural Language Classifier V1
//!
//! Classifies short texts against classifiers trained from CSV data.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::CredentialKind;
use crate::error::WatsonError;
use crate::execution::{HttpMethod, ServiceResponse};
use crate::options::ServiceOptions;
use crate::service::{Endpoint, ServiceCore, ServiceInfo};
use crate::types::FileParam;

const CLASSIFY: Endpoint = Endpoint::new(
    HttpMethod::Post,
    "/v1/classifiers/{classifier_id}/classify",
    &["classifier_id", "text"],
);
const CLASSIFY_COLLECTION: Endpoint = Endpoint::new(
    HttpMethod::Post,
    "/v1/classifiers/{classifier_id}/classify_collection",
    &["classifier_id", "collection"],
);
const CREATE_CLASSIFIER: Endpoint = Endpoint::new(
    HttpMethod::Post,
    "/v1/classifiers",
    &["training_metadata", "training_data"],
);
const DELETE_CLASSIFIER: Endpoint = Endpoint::new(
    HttpMethod::Delete,
    "/v1/classifiers/{classifier_id}",
    &["classifier_id"],
);
const GET_CLASSIFIER: Endpoint = Endpoint::new(
    HttpMethod::Get,
    "/v1/classifiers/{classifier_id}",
    &["classifier_id"],
);
const LIST_CLASSIFIERS: Endpoint = Endpoint::new(HttpMethod::Get, "/v1/classifiers", &[]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedClass {
    pub class_name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub classifier_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub top_class: Option<String>,
    #[serde(default)]
    pub classes: Vec<ClassifiedClass>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionItem {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub top_class: Option<String>,
    #[serde(default)]
    pub classes: Vec<ClassifiedClass>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationCollection {
    #[serde(default)]
    pub classifier_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub collection: Vec<CollectionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
    #[serde(default)]
    pub status: Option<String>,
    pub classifier_id: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub status_description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierList {
    #[serde(default)]
    pub classifiers: Vec<Classifier>,
}

/// Parameters for [`NaturalLanguageClassifierV1::create_classifier`].
#[derive(Debug)]
pub struct CreateClassifierParams {
    /// JSON with `language` and optionally `name`.
    pub training_metadata: FileParam,
    /// CSV training data.
    pub training_data: FileParam,
}

/// Natural Language Classifier client.
#[derive(Debug, Clone)]
pub struct NaturalLanguageClassifierV1 {
    core: ServiceCore,
}

impl NaturalLanguageClassifierV1 {
    pub const INFO: ServiceInfo = ServiceInfo {
        name: "natural_language_classifier",
        default_url: "https://gateway.watsonplatform.net/natural-language-classifier/api",
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

    /// Classify a phrase.
    pub async fn classify(
        &self,
        classifier_id: &str,
        text: &str,
    ) -> Result<Classification, WatsonError> {
        let request = CLASSIFY
            .request()
            .path_param("classifier_id", classifier_id)
            .json(json!({ "text": text }));
        self.core.call(request, CLASSIFY.required).await
    }

    /// Classify up to 30 texts in one call.
    pub async fn classify_collection(
        &self,
        classifier_id: &str,
        texts: &[&str],
    ) -> Result<ClassificationCollection, WatsonError> {
        let collection: Vec<_> = texts.iter().map(|t| json!({ "text": t })).collect();
        let mut body = json!({});
        if !collection.is_empty() {
            body["collection"] = json!(collection);
        }
        let request = CLASSIFY_COLLECTION
            .request()
            .path_param("classifier_id", classifier_id)
            .json(body);
        self.core.call(request, CLASSIFY_COLLECTION.required).await
    }

    /// Start training a classifier.
    pub async fn create_classifier(
        &self,
        params: CreateClassifierParams,
    ) -> Result<Classifier, WatsonError> {
        let request = CREATE_CLASSIFIER
            .request()
            .multipart_file(
                "training_metadata",
                params.training_metadata.with_default_content_type("application/json"),
            )
            .multipart_file(
                "training_data",
                params.training_data.with_default_content_type("text/csv"),
            );
        self.core.call(request, CREATE_CLASSIFIER.required).await
    }

    pub async fn delete_classifier(&self, classifier_id: &str) -> Result<ServiceResponse, WatsonError> {
        let request = DELETE_CLASSIFIER
            .request()
            .path_param("classifier_id", classifier_id);
        self.core.execute(request, DELETE_CLASSIFIER.required).await
    }

    pub async fn get_classifier(&self, classifier_id: &str) -> Result<Classifier, WatsonError> {
        let request = GET_CLASSIFIER
            .request()
            .path_param("classifier_id", classifier_id);
        self.core.call(request, GET_CLASSIFIER.required).await
    }

    pub async fn list_classifiers(&self) -> Result<ClassifierList, WatsonError> {
        self.core
            .call(LIST_CLASSIFIERS.request(), LIST_CLASSIFIERS.required)
            .await
    }
}
