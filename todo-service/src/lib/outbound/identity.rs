use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::domain::auth::errors::ProviderError;
use crate::domain::auth::models::ProviderIdentity;
use crate::domain::auth::ports::IdentityProvider;

/// Google identity provider backed by the OpenID Connect userinfo endpoint.
pub struct GoogleIdentityProvider {
    client: reqwest::Client,
    userinfo_url: String,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    email: Option<String>,
    email_verified: Option<bool>,
    name: Option<String>,
}

impl GoogleIdentityProvider {
    pub fn new(userinfo_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            userinfo_url: userinfo_url.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn fetch_identity(&self, access_token: &str) -> Result<ProviderIdentity, ProviderError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProviderError::Rejected(status.to_string()));
        }
        if !status.is_success() {
            return Err(ProviderError::Unavailable(status.to_string()));
        }

        let user_info: UserInfoResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        // an unverified address is not vouched for
        if user_info.email_verified == Some(false) {
            return Err(ProviderError::MissingEmail);
        }

        let email = user_info.email.ok_or(ProviderError::MissingEmail)?;
        tracing::debug!(email = %email, "Identity provider vouched for email");

        Ok(ProviderIdentity {
            email,
            name: user_info.name,
        })
    }
}
