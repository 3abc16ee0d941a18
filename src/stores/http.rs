use super::{AgentStore, EmbedSettingsStore, RemoteAgentFields, RemotePlatform, WorkspaceStore};
use crate::agents::{AgentConfig, EmbedSettings, WorkspaceAssignment};
use crate::errors::StoreError;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status.as_u16() == 404 {
        return Err(StoreError::NotFound);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Upstream {
        status: status.as_u16(),
        message,
    })
}

// ============================================================================
// Agent Store
// ============================================================================

pub struct HttpAgentStore {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpAgentStore {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            base_url,
            api_key,
            client: Client::new(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: String,
}

#[async_trait]
impl AgentStore for HttpAgentStore {
    async fn create(&self, config: &AgentConfig) -> Result<String, StoreError> {
        let response = self
            .request(reqwest::Method::POST, "/agents")
            .json(config)
            .send()
            .await?;
        let created: CreatedResponse = check_status(response).await?.json().await?;
        Ok(created.id)
    }

    async fn update(&self, id: &str, config: &AgentConfig) -> Result<AgentConfig, StoreError> {
        let response = self
            .request(reqwest::Method::PUT, &format!("/agents/{id}"))
            .json(config)
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/agents/{id}"))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<AgentConfig, StoreError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/agents/{id}"))
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn list(&self) -> Result<Vec<AgentConfig>, StoreError> {
        let response = self.request(reqwest::Method::GET, "/agents").send().await?;
        Ok(check_status(response).await?.json().await?)
    }
}

// ============================================================================
// Workspace Assignment Store
// ============================================================================

pub struct HttpWorkspaceStore {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpWorkspaceStore {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            base_url,
            api_key,
            client: Client::new(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }
}

#[async_trait]
impl WorkspaceStore for HttpWorkspaceStore {
    async fn replace(&self, agent_id: &str, workspace_ids: &[String]) -> Result<(), StoreError> {
        let assignment = WorkspaceAssignment {
            agent_id: agent_id.to_string(),
            workspace_ids: workspace_ids.to_vec(),
        };
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/agents/{agent_id}/workspaces"),
            )
            .json(&assignment)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn list(&self, agent_id: &str) -> Result<Vec<String>, StoreError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/agents/{agent_id}/workspaces"),
            )
            .send()
            .await?;
        let assignment: WorkspaceAssignment = check_status(response).await?.json().await?;
        Ok(assignment.workspace_ids)
    }
}

// ============================================================================
// Embed Settings Store
// ============================================================================

pub struct HttpEmbedStore {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpEmbedStore {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            base_url,
            api_key,
            client: Client::new(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }
}

#[async_trait]
impl EmbedSettingsStore for HttpEmbedStore {
    async fn update(
        &self,
        agent_id: &str,
        settings: &EmbedSettings,
    ) -> Result<EmbedSettings, StoreError> {
        let response = self
            .request(reqwest::Method::PUT, &format!("/agents/{agent_id}/embed"))
            .json(settings)
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn get(&self, agent_id: &str) -> Result<EmbedSettings, StoreError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/agents/{agent_id}/embed"))
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }
}

// ============================================================================
// Remote Platform Client
// ============================================================================

pub struct HttpRemotePlatform {
    base_url: String,
    api_key: String,
    client: Client,
}

impl HttpRemotePlatform {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url,
            api_key,
            client: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RemoteCreated {
    #[serde(rename = "agentId")]
    agent_id: String,
}

#[async_trait]
impl RemotePlatform for HttpRemotePlatform {
    async fn create_agent(&self, fields: &RemoteAgentFields) -> Result<String, StoreError> {
        let response = self
            .client
            .post(format!("{}/v1/agents", self.base_url))
            .bearer_auth(&self.api_key)
            .json(fields)
            .send()
            .await?;
        let created: RemoteCreated = check_status(response).await?.json().await?;
        Ok(created.agent_id)
    }

    async fn update_agent(
        &self,
        remote_id: &str,
        fields: &RemoteAgentFields,
    ) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(format!("{}/v1/agents/{remote_id}", self.base_url))
            .bearer_auth(&self.api_key)
            .json(fields)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
