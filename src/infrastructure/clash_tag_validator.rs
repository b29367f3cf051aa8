use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url, header};
use tracing::{debug, warn};

use crate::domain::{
    error::DomainError, models::player_profile::PlayerTag,
    services::tag_validation_service::PlayerTagValidator,
};

pub const DEFAULT_CLASH_API_BASE_URL: &str = "https://api.clashofclans.com";

/// Player directory lookup against the Clash of Clans public API.
///
/// Only the status code of `GET /v1/players/%23{tag}` is consumed. There is
/// no retry and no caching; every call goes to the API.
#[derive(Clone)]
pub struct ClashApiTagValidator {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl ClashApiTagValidator {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// `{base}/v1/players/%23{TAG}`; the path segment encoder turns `#` into `%23`.
    fn player_url(&self, tag: &PlayerTag) -> Result<Url, DomainError> {
        let segment = tag.to_string();
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DomainError::GatewayUnreachable(format!("invalid base url {}", self.base_url)))?
            .pop_if_empty()
            .extend(["v1", "players", segment.as_str()]);
        Ok(url)
    }
}

#[async_trait]
impl PlayerTagValidator for ClashApiTagValidator {
    async fn exists(&self, tag: &PlayerTag) -> Result<bool, DomainError> {
        let url = self.player_url(tag)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(%tag, error = %e, "player directory request failed");
                DomainError::GatewayUnreachable(e.to_string())
            })?;

        let status = response.status();
        debug!(%tag, %status, "player directory answered");
        Ok(status.is_success())
    }
}
