//! REST client for the admin permission endpoints.
//!
//! Loads and saves the two permission collections for a target user, or
//! for the default profile applied to unauthenticated sessions when no
//! target is given.

use chargen_core::permissions::{CharacterPermission, ModelPermissionSet};
use chargen_core::types::UserId;

use crate::error::{self, ApiError};

/// HTTP client for the admin-facing API of one service instance.
pub struct AdminApi {
    client: reqwest::Client,
    base_url: String,
}

impl AdminApi {
    /// Create a new API client.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://host:5000`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Model permission endpoint for `target`; `None` addresses the
    /// default profile.
    fn models_url(&self, target: Option<UserId>) -> String {
        match target {
            Some(id) => format!("{}/admin/api/user/{id}/models", self.base_url),
            None => format!("{}/admin/api/default-models", self.base_url),
        }
    }

    /// Character permission endpoint for `target`; `None` addresses the
    /// default profile.
    fn characters_url(&self, target: Option<UserId>) -> String {
        match target {
            Some(id) => format!("{}/admin/api/user/{id}/characters", self.base_url),
            None => format!("{}/admin/api/default-characters", self.base_url),
        }
    }

    /// Fetch the model permission collections for `target`.
    pub async fn model_permissions(
        &self,
        target: Option<UserId>,
    ) -> Result<ModelPermissionSet, ApiError> {
        let response = self.client.get(self.models_url(target)).send().await?;
        error::parse_response(response).await
    }

    /// Replace the model permission collections for `target`.
    pub async fn save_model_permissions(
        &self,
        target: Option<UserId>,
        models: &ModelPermissionSet,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.models_url(target))
            .json(models)
            .send()
            .await?;

        error::check_status(response).await
    }

    /// Fetch the character permission collection for `target`.
    pub async fn character_permissions(
        &self,
        target: Option<UserId>,
    ) -> Result<Vec<CharacterPermission>, ApiError> {
        let response = self.client.get(self.characters_url(target)).send().await?;
        error::parse_response(response).await
    }

    /// Replace the character permission collection for `target`.
    pub async fn save_character_permissions(
        &self,
        target: Option<UserId>,
        characters: &[CharacterPermission],
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.characters_url(target))
            .json(&characters)
            .send()
            .await?;

        error::check_status(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_target_addresses_user_scoped_endpoints() {
        let api = AdminApi::new("http://localhost:5000".to_string());
        assert_eq!(
            api.models_url(Some(7)),
            "http://localhost:5000/admin/api/user/7/models"
        );
        assert_eq!(
            api.characters_url(Some(7)),
            "http://localhost:5000/admin/api/user/7/characters"
        );
    }

    #[test]
    fn missing_target_addresses_default_profile_endpoints() {
        let api = AdminApi::new("http://localhost:5000".to_string());
        assert_eq!(
            api.models_url(None),
            "http://localhost:5000/admin/api/default-models"
        );
        assert_eq!(
            api.characters_url(None),
            "http://localhost:5000/admin/api/default-characters"
        );
    }
}
