//! Discovery V1
//!
//! Environments, collections, document ingestion and queries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::CredentialKind;
use crate::error::WatsonError;
use crate::execution::HttpMethod;
use crate::options::ServiceOptions;
use crate::service::{Endpoint, ServiceCore, ServiceInfo};
use crate::types::FileParam;

const LIST_ENVIRONMENTS: Endpoint = Endpoint::new(HttpMethod::Get, "/v1/environments", &[]);
const GET_ENVIRONMENT: Endpoint = Endpoint::new(
    HttpMethod::Get,
    "/v1/environments/{environment_id}",
    &["environment_id"],
);
const CREATE_COLLECTION: Endpoint = Endpoint::new(
    HttpMethod::Post,
    "/v1/environments/{environment_id}/collections",
    &["environment_id", "name"],
);
const ADD_DOCUMENT: Endpoint = Endpoint::new(
    HttpMethod::Post,
    "/v1/environments/{environment_id}/collections/{collection_id}/documents",
    &["environment_id", "collection_id"],
);
const QUERY: Endpoint = Endpoint::new(
    HttpMethod::Get,
    "/v1/environments/{environment_id}/collections/{collection_id}/query",
    &["environment_id", "collection_id"],
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub environment_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub read_only: Option<bool>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEnvironmentsResponse {
    #[serde(default)]
    pub environments: Vec<Environment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub collection_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub configuration_id: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAccepted {
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notices: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub matching_results: Option<u64>,
    #[serde(default)]
    pub results: Vec<Map<String, Value>>,
    #[serde(default)]
    pub aggregations: Vec<Value>,
    #[serde(default)]
    pub passages: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateCollectionParams {
    #[serde(skip_serializing)]
    pub environment_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Default)]
pub struct AddDocumentParams {
    pub environment_id: String,
    pub collection_id: String,
    /// Document content (JSON, HTML, PDF or Word).
    pub file: Option<FileParam>,
    /// Arbitrary metadata, sent as a JSON string.
    pub metadata: Option<Value>,
}

/// Query-string options for [`DiscoveryV1::query`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryParams {
    #[serde(skip_serializing)]
    pub environment_id: String,
    #[serde(skip_serializing)]
    pub collection_id: String,
    pub filter: Option<String>,
    pub query: Option<String>,
    pub natural_language_query: Option<String>,
    pub passages: Option<bool>,
    pub aggregation: Option<String>,
    pub count: Option<u32>,
    #[serde(rename = "return")]
    pub return_fields: Option<Vec<String>>,
    pub offset: Option<u32>,
    pub sort: Option<Vec<String>>,
    pub highlight: Option<bool>,
    pub deduplicate: Option<bool>,
}

/// Discovery client.
#[derive(Debug, Clone)]
pub struct DiscoveryV1 {
    core: ServiceCore,
}

impl DiscoveryV1 {
    pub const INFO: ServiceInfo = ServiceInfo {
        name: "discovery",
        default_url: "https://gateway.watsonplatform.net/discovery/api",
        credential_kind: CredentialKind::UsernamePassword,
        versioned: true,
    };

    /// Requires `version` (e.g. `2017-11-07`).
    pub fn new(options: ServiceOptions) -> Result<Self, WatsonError> {
        Ok(Self {
            core: ServiceCore::new(Self::INFO, options)?,
        })
    }

    pub fn core(&self) -> &ServiceCore {
        &self.core
    }

    /// List environments, optionally filtered by exact name.
    pub async fn list_environments(
        &self,
        name: Option<&str>,
    ) -> Result<ListEnvironmentsResponse, WatsonError> {
        let request = LIST_ENVIRONMENTS.request().query_opt("name", name);
        self.core.call(request, LIST_ENVIRONMENTS.required).await
    }

    pub async fn get_environment(&self, environment_id: &str) -> Result<Environment, WatsonError> {
        let request = GET_ENVIRONMENT
            .request()
            .path_param("environment_id", environment_id);
        self.core.call(request, GET_ENVIRONMENT.required).await
    }

    pub async fn create_collection(
        &self,
        params: CreateCollectionParams,
    ) -> Result<Collection, WatsonError> {
        let request = CREATE_COLLECTION
            .request()
            .path_param("environment_id", params.environment_id.as_str())
            .json_from(&params)?;
        self.core.call(request, CREATE_COLLECTION.required).await
    }

    /// Upload a document for ingestion. At least one of `file` or
    /// `metadata` is expected by the service.
    pub async fn add_document(
        &self,
        params: AddDocumentParams,
    ) -> Result<DocumentAccepted, WatsonError> {
        let metadata = params.metadata.map(|m| Value::String(m.to_string()));
        let request = ADD_DOCUMENT
            .request()
            .path_param("environment_id", params.environment_id)
            .path_param("collection_id", params.collection_id)
            .multipart_file_opt("file", params.file)
            .multipart_value_opt("metadata", metadata);
        self.core.call(request, ADD_DOCUMENT.required).await
    }

    pub async fn query(&self, params: QueryParams) -> Result<QueryResponse, WatsonError> {
        let request = QUERY
            .request()
            .path_param("environment_id", params.environment_id.as_str())
            .path_param("collection_id", params.collection_id.as_str())
            .query_from(&params)?;
        self.core.call(request, QUERY.required).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialResolver;

    fn options() -> ServiceOptions {
        ServiceOptions::new()
            .basic_auth("u", "p")
            .credential_resolver(CredentialResolver::empty())
    }

    #[test]
    fn construction_requires_version() {
        let err = DiscoveryV1::new(options()).unwrap_err();
        assert_eq!(err.to_string(), "Argument error: version was not specified");
        assert!(DiscoveryV1::new(options().version("2017-11-07")).is_ok());
    }

    #[test]
    fn create_collection_body_omits_path_fields() {
        let params = CreateCollectionParams {
            environment_id: "env".into(),
            name: "docs".into(),
            language: Some("en".into()),
            ..Default::default()
        };
        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(body, serde_json::json!({"name": "docs", "language": "en"}));
    }

    #[tokio::test]
    async fn query_requires_collection() {
        let discovery = DiscoveryV1::new(options().version("v").url("http://127.0.0.1:9")).unwrap();
        let err = discovery
            .query(QueryParams {
                environment_id: "env".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err, WatsonError::missing_parameters(["collection_id"]));
    }
}
