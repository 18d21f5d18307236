//! Toggl Track v9 API client.
//!
//! A stateless request/response wrapper over the handful of endpoints the
//! scheduler needs: account identity, workspaces, projects, tasks, and
//! time entry creation.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use tgl_core::entry::TimeEntry;
use tgl_core::types::{ProjectId, TaskId, WorkspaceId};

const BASE_URL: &str = "https://api.track.toggl.com/api/v9";

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Toggl client errors.
#[derive(Debug, thiserror::Error)]
pub enum TogglError {
    /// The provided API token was invalid.
    #[error("invalid API token: {reason}")]
    InvalidToken { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned a non-success status.
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Toggl API client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across tasks. Each clone shares
/// the underlying HTTP connection pool, and every method may be called
/// concurrently.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_token: String,
    base_url: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given API token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_token: impl Into<String>) -> Result<Self, TogglError> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(TogglError::InvalidToken {
                reason: "API token cannot be empty",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(TogglError::ClientBuild)?;

        Ok(Self {
            http,
            api_token,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Points the client at a different base URL, for tests against a
    /// local server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns the authenticated account.
    pub async fn me(&self) -> Result<Me, TogglError> {
        self.get_json(format!("{}/me", self.base_url)).await
    }

    /// Lists the account's workspaces.
    pub async fn workspaces(&self) -> Result<Vec<Workspace>, TogglError> {
        self.get_json(format!("{}/workspaces", self.base_url)).await
    }

    /// Lists active projects in a workspace.
    pub async fn projects(&self, workspace: WorkspaceId) -> Result<Vec<Project>, TogglError> {
        self.get_json(format!(
            "{}/workspaces/{workspace}/projects?active=true",
            self.base_url
        ))
        .await
    }

    /// Lists tasks for a project.
    pub async fn tasks(
        &self,
        workspace: WorkspaceId,
        project: ProjectId,
    ) -> Result<Vec<Task>, TogglError> {
        self.get_json(format!(
            "{}/workspaces/{workspace}/projects/{project}/tasks",
            self.base_url
        ))
        .await
    }

    /// Creates a time entry in a workspace.
    pub async fn create_time_entry(
        &self,
        workspace: WorkspaceId,
        entry: &TimeEntry,
    ) -> Result<(), TogglError> {
        let url = format!("{}/workspaces/{workspace}/time_entries", self.base_url);
        let response = self
            .http
            .post(url)
            .basic_auth(&self.api_token, Some("api_token"))
            .json(entry)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, TogglError> {
        let response = self
            .http
            .get(url)
            .basic_auth(&self.api_token, Some("api_token"))
            .send()
            .await?;
        let body = check_status(response).await?;
        serde_json::from_str(&body).map_err(|err| TogglError::InvalidResponse(err.to_string()))
    }
}

/// Reads the body and maps non-2xx statuses to `TogglError::Api`.
async fn check_status(response: reqwest::Response) -> Result<String, TogglError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(TogglError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

/// The authenticated account, from `GET /me`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Me {
    pub id: i64,
    pub email: String,
    pub fullname: String,
    pub default_workspace_id: WorkspaceId,
}

/// A workspace, from `GET /workspaces`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
}

/// A project, from `GET /workspaces/{id}/projects`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub active: bool,
}

/// A task, from `GET /workspaces/{id}/projects/{id}/tasks`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub active: bool,
}
