use std::time::Duration;

use reqwest::Client;

use super::{ReactionOutcome, ReactionRequest, ReactionResolver, ResolverError};

/// HTTP JSON resolver. POSTs the request to `{base_url}/reaction` and expects
/// `{"dialogue": "...", "effect": "HIT" | "DODGE" | "TORN" | "FLY"}` back.
#[derive(Clone)]
pub struct RemoteResolver {
    client: Client,
    base_url: String,
}

impl RemoteResolver {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout) // Hard network-level timeout
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/reaction", self.base_url)
    }
}

impl ReactionResolver for RemoteResolver {
    async fn resolve(&self, request: ReactionRequest) -> Result<ReactionOutcome, ResolverError> {
        let response = self.client.post(self.endpoint())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResolverError::Status(response.status().as_u16()));
        }

        let outcome: ReactionOutcome = response.json().await?;
        Ok(outcome)
    }
}
