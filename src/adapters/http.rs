use crate::config::ClientSettings;
use crate::core::params::QueryParams;
use crate::domain::ports::HttpSession;
use crate::utils::error::ConfigError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// [`HttpSession`] over a `reqwest::Client`.
///
/// Hand in a client that already carries whatever cookies or headers the
/// upstream expects; this adapter only issues the requests.
#[derive(Debug, Clone)]
pub struct ReqwestSession {
    client: Client,
}

impl ReqwestSession {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        if let Some(user_agent) = &settings.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        Ok(Self::new(builder.build()?))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl HttpSession for ReqwestSession {
    type Error = reqwest::Error;

    async fn get_json(
        &self,
        url: &str,
        params: &QueryParams,
    ) -> Result<serde_json::Value, reqwest::Error> {
        let response = self.client.get(url).query(params).send().await?;
        tracing::debug!("Response status from {}: {}", url, response.status());

        response.error_for_status()?.json().await
    }
}
