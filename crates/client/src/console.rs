//! REST client for the generation console endpoints.
//!
//! Wraps the model/seed/workflow configuration endpoints, the four
//! generation submission endpoints (multipart), and the file-browser
//! endpoints using [`reqwest`].

use serde::Deserialize;
use serde_json::json;

use chargen_core::browse::FileEntry;
use chargen_core::options::{AvailableModels, GenerationOptions};

use crate::error::{self, ApiError};

/// HTTP client for the console-facing API of one service instance.
pub struct ConsoleApi {
    client: reqwest::Client,
    base_url: String,
}

/// Generation submission modes, one per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// A fresh image with a newly drawn prompt.
    NewRandom,
    /// Re-run the previous prompt.
    Regenerate,
    /// User-supplied prompt text, used verbatim.
    Manual,
    /// User-supplied prompt text, enhanced server-side before use.
    Enhanced,
}

impl GenerationMode {
    /// The endpoint path this mode submits to.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::NewRandom => "/generate_new_image",
            Self::Regenerate => "/regenerate_image",
            Self::Manual => "/manual_generation",
            Self::Enhanced => "/enhanced_generation",
        }
    }

    /// Whether submissions in this mode carry free-text prompt content.
    pub fn takes_prompt(self) -> bool {
        matches!(self, Self::Manual | Self::Enhanced)
    }
}

/// Plain `{"success": bool}` acknowledgement body.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub success: bool,
}

/// Response of the last-seed endpoint.
#[derive(Debug, Deserialize)]
struct LastSeedResponse {
    seed: i64,
}

/// Session-level flags of the current user.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPermissions {
    /// Whether the file browser may delete files.
    #[serde(default)]
    pub can_delete_files: bool,
}

/// The user's most recent prompt and image, if any.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestContent {
    pub prompt: Option<String>,
    pub image_url: Option<String>,
}

impl ConsoleApi {
    /// Create a new API client.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://host:5000`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across surfaces).
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Fetch the model names the backend offers, split by kind.
    ///
    /// Sends a `GET /api/available-models` request.
    pub async fn available_models(&self) -> Result<AvailableModels, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/available-models", self.base_url))
            .send()
            .await?;

        error::parse_response(response).await
    }

    /// Fetch the seed of the most recent generation run.
    ///
    /// Sends a `GET /api/last-seed` request. The backend reports `-1`
    /// when no run has happened yet.
    pub async fn last_seed(&self) -> Result<i64, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/last-seed", self.base_url))
            .send()
            .await?;

        let parsed: LastSeedResponse = error::parse_response(response).await?;
        Ok(parsed.seed)
    }

    /// Fetch a character's default workflow graph.
    ///
    /// Sends a `GET /api/get-default-workflow?character=<name>` request
    /// and returns the raw node graph; parameter extraction is a
    /// `chargen_core::workflow` concern.
    pub async fn default_workflow(&self, character: &str) -> Result<serde_json::Value, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/get-default-workflow", self.base_url))
            .query(&[("character", character)])
            .send()
            .await?;

        error::parse_response(response).await
    }

    /// Push the current option set for a character.
    ///
    /// Sends a `POST /api/workflow-options` request. A 2xx response with
    /// `success: false` still means the backend rejected the update, so
    /// the caller must inspect the returned body.
    pub async fn push_workflow_options(
        &self,
        character: &str,
        options: &GenerationOptions,
    ) -> Result<StatusResponse, ApiError> {
        let body = json!({
            "character": character,
            "options": options,
        });

        let response = self
            .client
            .post(format!("{}/api/workflow-options", self.base_url))
            .json(&body)
            .send()
            .await?;

        error::parse_response(response).await
    }

    /// Submit a generation request.
    ///
    /// Sends a multipart `POST` to the endpoint selected by `mode`, with
    /// the character, the JSON-encoded option set as `advancedOptions`,
    /// and the prompt text as `manual_prompt` when one is given.
    pub async fn generate(
        &self,
        mode: GenerationMode,
        character: &str,
        prompt: Option<&str>,
        options: &GenerationOptions,
    ) -> Result<StatusResponse, ApiError> {
        let advanced_options =
            serde_json::to_string(options).expect("GenerationOptions is always serialisable");

        let mut form = reqwest::multipart::Form::new()
            .text("character", character.to_string())
            .text("advancedOptions", advanced_options);
        if let Some(prompt) = prompt {
            form = form.text("manual_prompt", prompt.to_string());
        }

        let response = self
            .client
            .post(format!("{}{}", self.base_url, mode.endpoint()))
            .multipart(form)
            .send()
            .await?;

        error::parse_response(response).await
    }

    /// Fetch the directory listing at `path`.
    ///
    /// Sends a `GET /api/files?path=<path>` request.
    pub async fn list_files(&self, path: &str) -> Result<Vec<FileEntry>, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/files", self.base_url))
            .query(&[("path", path)])
            .send()
            .await?;

        error::parse_response(response).await
    }

    /// Delete the named files under `path`.
    ///
    /// Sends a `POST /api/delete-files` request.
    pub async fn delete_files(&self, path: &str, files: &[String]) -> Result<(), ApiError> {
        let body = json!({
            "path": path,
            "files": files,
        });

        let response = self
            .client
            .post(format!("{}/api/delete-files", self.base_url))
            .json(&body)
            .send()
            .await?;

        error::check_status(response).await
    }

    /// Fetch the session-level permission flags of the current user.
    ///
    /// Sends a `GET /api/user/permissions` request.
    pub async fn user_permissions(&self) -> Result<UserPermissions, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/user/permissions", self.base_url))
            .send()
            .await?;

        error::parse_response(response).await
    }

    /// Fetch the user's most recent prompt and image.
    ///
    /// Sends a `GET /api/user/latest-content` request.
    pub async fn latest_content(&self) -> Result<LatestContent, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/user/latest-content", self.base_url))
            .send()
            .await?;

        error::parse_response(response).await
    }
}
