//! GitHub GraphQL boundary: repository resolution and branch publication.
//!
//! Two operations, each modeled as a typed request/response pair rather
//! than untyped JSON bodies:
//! - query `repository(owner, name) { id }`
//! - mutation `createRef(input: { repositoryId, name, oid })`
//!
//! Publication is not retried and success is not asserted server-side;
//! the receipt carries whatever the server said, duplicate-ref errors
//! included.

use async_trait::async_trait;
use fuzz_triage_core::{BranchRequest, RepositoryId, Result, TriageError};
use serde::{Deserialize, Serialize};
use tracing::debug;

const REPOSITORY_ID_QUERY: &str =
    "query($owner: String!, $name: String!) { repository(owner: $owner, name: $name) { id } }";

const CREATE_REF_MUTATION: &str =
    "mutation($input: CreateRefInput!) { createRef(input: $input) { ref { name } } }";

/// GraphQL request envelope.
#[derive(Debug, Serialize)]
struct GraphqlRequest<'a, V: Serialize> {
    query: &'a str,
    variables: V,
}

/// Error entry attached to a GraphQL response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<D> {
    data: Option<D>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Serialize)]
struct RepositoryIdVars<'a> {
    owner: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct RepositoryIdData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
struct RepositoryNode {
    id: String,
}

#[derive(Debug, Serialize)]
struct CreateRefVars<'a> {
    input: CreateRefInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRefInput<'a> {
    repository_id: &'a str,
    name: String,
    oid: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateRefData {
    #[serde(rename = "createRef")]
    create_ref: Option<CreateRefPayload>,
}

#[derive(Debug, Deserialize)]
struct CreateRefPayload {
    #[serde(rename = "ref")]
    reference: Option<RefNode>,
}

#[derive(Debug, Deserialize)]
struct RefNode {
    name: String,
}

/// What the server said about one branch-creation attempt.
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    /// Fully qualified ref name echoed back when creation succeeded.
    pub created_ref: Option<String>,

    /// GraphQL errors attached to the response; a duplicate ref lands here.
    pub errors: Vec<GraphqlError>,
}

impl PublishReceipt {
    pub fn created(&self) -> bool {
        self.created_ref.is_some() && self.errors.is_empty()
    }

    /// Joined error messages, when the server reported any.
    pub fn error_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Seam between the orchestrator and the remote repository API.
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    /// Resolve the stable repository identifier for `owner/name`.
    ///
    /// A response without a repository payload is a misconfiguration, not
    /// a transient failure; it fails the run with no retry.
    async fn resolve_repository_id(&self, owner: &str, name: &str) -> Result<RepositoryId>;

    /// Attempt to create the branch described by `request`.
    async fn create_branch(&self, request: &BranchRequest) -> Result<PublishReceipt>;
}

/// GraphQL client for a GitHub-compatible endpoint.
pub struct GithubClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl GithubClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("fuzz-triage/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        GithubClient {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    async fn post<V, D>(&self, query: &'static str, variables: V) -> Result<GraphqlResponse<D>>
    where
        V: Serialize + Send,
        D: for<'de> Deserialize<'de>,
    {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&GraphqlRequest { query, variables })
            .send()
            .await
            .map_err(|e| TriageError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TriageError::Http(format!(
                "GraphQL endpoint returned {status}"
            )));
        }

        response
            .json::<GraphqlResponse<D>>()
            .await
            .map_err(|e| TriageError::Http(format!("malformed GraphQL response: {e}")))
    }
}

fn repository_id_from_response(
    response: GraphqlResponse<RepositoryIdData>,
    owner: &str,
    name: &str,
) -> Result<RepositoryId> {
    let errors = response.errors;
    response
        .data
        .and_then(|d| d.repository)
        .map(|r| RepositoryId(r.id))
        .ok_or_else(|| {
            let detail = if errors.is_empty() {
                "response contained no repository".to_string()
            } else {
                errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            TriageError::RepositoryResolution(format!("{owner}/{name}: {detail}"))
        })
}

#[async_trait]
impl RemoteRepository for GithubClient {
    async fn resolve_repository_id(&self, owner: &str, name: &str) -> Result<RepositoryId> {
        let response: GraphqlResponse<RepositoryIdData> = self
            .post(REPOSITORY_ID_QUERY, RepositoryIdVars { owner, name })
            .await?;
        let id = repository_id_from_response(response, owner, name)?;
        debug!(%id, owner, name, "resolved repository id");
        Ok(id)
    }

    async fn create_branch(&self, request: &BranchRequest) -> Result<PublishReceipt> {
        let vars = CreateRefVars {
            input: CreateRefInput {
                repository_id: request.repository_id.as_str(),
                name: request.qualified_ref(),
                oid: &request.oid,
            },
        };
        let response: GraphqlResponse<CreateRefData> =
            self.post(CREATE_REF_MUTATION, vars).await?;

        Ok(PublishReceipt {
            created_ref: response
                .data
                .and_then(|d| d.create_ref)
                .and_then(|p| p.reference)
                .map(|r| r.name),
            errors: response.errors,
        })
    }
}
